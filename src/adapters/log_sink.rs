//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A network telemetry adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | mode={}", mode.as_str());
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {} -> {}", from.as_str(), to.as_str());
            }
            AppEvent::HeatStateChanged { from, to } => {
                info!("HEAT  | {} -> {}", from.as_str(), to.as_str());
            }
            AppEvent::SetpointChanged(setpoint_c) => {
                info!("CONF  | setpoint={:.1}\u{00b0}C", setpoint_c);
            }
            AppEvent::HysteresisChanged(hysteresis_c) => {
                info!("CONF  | hysteresis={:.1}\u{00b0}C", hysteresis_c);
            }
            AppEvent::CredentialsSaved => {
                info!("PROV  | credentials saved, restart pending");
            }
            AppEvent::JoinFailed => {
                warn!("NET   | station join failed, provisioning fallback");
            }
            AppEvent::SleepRequested { awake_secs } => {
                info!("POWER | awake {}s elapsed, deep sleep requested", awake_secs);
            }
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | mode={} | heat={} | T={} | set={:.1}\u{00b0}C \u{00b1}{:.2} | hist={}",
                    t.mode.as_str(),
                    t.heat_state.as_str(),
                    match t.temperature_c {
                        Some(c) => format!("{:.2}\u{00b0}C", c),
                        None => "missing".to_string(),
                    },
                    t.setpoint_c,
                    t.hysteresis_c / 2.0,
                    t.history_len,
                );
            }
        }
    }
}
