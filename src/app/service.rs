//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode machine, the debouncers, the history
//! ring, and the cadence timers.  It exposes a clean, hardware-agnostic
//! API; all I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────┐ ──▶ IndicatorPort
//!   InputPort  ──▶ │        AppService        │ ──▶ EventSink
//!                  │  ModeMachine · decide()  │
//!  StoragePort ◀──▶│  History · Debounce      │──▶ ServerPort / Wi-Fi
//!                  └──────────────────────────┘     (via ModeEffects)
//! ```
//!
//! Each service-loop iteration runs one [`tick`](AppService::tick) with a
//! fixed internal order: poll inputs → recompute the decision → evaluate
//! mode and sleep triggers → ingest the temperature sample on its 1 s
//! cadence.  A button press and a temperature read in the same iteration
//! are therefore both reflected consistently before the next iteration.

use log::{info, warn};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{
    ConfigPort, ConnectivityPort, EventSink, IndicatorPort, InputPort, SensorPort, ServerPort,
    StoragePort,
};
use crate::config::{SETPOINT_STEP_C, ThermostatConfig, WifiCredentials};
use crate::control::hysteresis::{HeatState, decide};
use crate::drivers::button::{AdjustButton, LongPressTracker};
use crate::fsm::context::ModeContext;
use crate::fsm::states::build_mode_table;
use crate::fsm::{DeviceMode, ModeMachine};
use crate::history::TemperatureHistory;
use crate::power::AwakeScheduler;
use crate::scheduler::Periodic;

// ───────────────────────────────────────────────────────────────
// Boot-mode decision
// ───────────────────────────────────────────────────────────────

/// Decide the boot mode before the service loop starts.
///
/// An empty stored SSID means unprovisioned: provisioning mode with *no*
/// join attempt.  Otherwise one bounded join decides — success enters
/// normal mode, failure falls back to provisioning.  Never fatal, never
/// retried beyond the single bounded attempt.
pub fn boot_mode(
    credentials: &WifiCredentials,
    net: &mut impl ConnectivityPort,
    timeout_secs: u32,
    sink: &mut impl EventSink,
) -> DeviceMode {
    if !credentials.is_provisioned() {
        info!("boot: no stored credentials, entering provisioning");
        return DeviceMode::Provisioning;
    }

    info!("boot: joining '{}' (timeout {}s)", credentials.ssid, timeout_secs);
    match net.join(&credentials.ssid, &credentials.password, timeout_secs) {
        Ok(()) => DeviceMode::Normal,
        Err(e) => {
            warn!("boot: join failed ({}), falling back to provisioning", e);
            sink.emit(&AppEvent::JoinFailed);
            DeviceMode::Provisioning
        }
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    machine: ModeMachine,
    ctx: ModeContext,
    history: TemperatureHistory,

    up_button: AdjustButton,
    down_button: AdjustButton,
    mode_button: LongPressTracker,

    /// 1 s temperature sampling / history ingest cadence.
    sampler: Periodic,
    /// Telemetry emission cadence.
    telemetry: Periodic,
    /// Awake-window tracker; armed in normal mode only.
    awake: AwakeScheduler,

    sleep_pending: bool,
    restart_pending: bool,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration, the loaded history, and
    /// the boot mode chosen by [`boot_mode`].
    ///
    /// Does **not** run the initial mode entry — call [`start`] next.
    ///
    /// [`start`]: AppService::start
    pub fn new(
        config: ThermostatConfig,
        history: TemperatureHistory,
        initial: DeviceMode,
    ) -> Self {
        let sampler = Periodic::new(u64::from(config.sample_interval_ms));
        let telemetry = Periodic::new(u64::from(config.telemetry_interval_secs) * 1000);
        let awake = AwakeScheduler::new(config.awake_duration_secs);
        let ctx = ModeContext::new(config);
        let machine = ModeMachine::new(build_mode_table(), initial);

        Self {
            machine,
            ctx,
            history,
            up_button: AdjustButton::new(),
            down_button: AdjustButton::new(),
            mode_button: LongPressTracker::new(),
            sampler,
            telemetry,
            awake,
            sleep_pending: false,
            restart_pending: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial mode entry.  Arms the awake window when starting
    /// in normal mode; provisioning never auto-sleeps.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.machine.start(&mut self.ctx);
        if self.mode() == DeviceMode::Normal {
            self.awake.arm(now_ms);
        }
        sink.emit(&AppEvent::Started(self.mode()));
        info!("AppService started in {:?}", self.mode());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies [`SensorPort`], [`InputPort`] and
    /// [`IndicatorPort`] together — one adapter owns all the pins, and a
    /// single generic bound avoids a three-way mutable borrow.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + InputPort + IndicatorPort),
        storage: &mut (impl StoragePort + ConfigPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Poll inputs.  Only normal mode's button logic set is live;
        //    in provisioning the trackers still run so no stale edge or
        //    half-tracked hold carries across a mode switch.
        let levels = hw.read_levels();
        let now32 = now_ms as u32;
        let up_fired = self.up_button.tick(now32, levels.up);
        let down_fired = self.down_button.tick(now32, levels.down);
        let hold_fired = self.mode_button.tick(now32, levels.mode);

        if self.mode() == DeviceMode::Normal {
            if up_fired {
                self.handle_command(AppCommand::AdjustSetpoint(SETPOINT_STEP_C), storage, sink);
            }
            if down_fired {
                self.handle_command(AppCommand::AdjustSetpoint(-SETPOINT_STEP_C), storage, sink);
            }
            if hold_fired {
                self.ctx.long_press_pending = true;
            }
        }

        // 2. Recompute the decision from the latest sample.
        let decided = decide(
            self.ctx.latest_sample,
            self.ctx.config.setpoint_c,
            self.ctx.config.hysteresis_c,
        );
        if decided != self.ctx.heat_state {
            sink.emit(&AppEvent::HeatStateChanged {
                from: self.ctx.heat_state,
                to: decided,
            });
        }
        self.ctx.heat_state = decided;
        hw.show_heat_state(decided);

        // 3. Mode machine, then the sleep trigger.
        let prev_mode = self.mode();
        self.machine.tick(&mut self.ctx);
        let new_mode = self.mode();
        if new_mode != prev_mode {
            sink.emit(&AppEvent::ModeChanged {
                from: prev_mode,
                to: new_mode,
            });
            match new_mode {
                DeviceMode::Normal => self.awake.arm(now_ms),
                DeviceMode::Provisioning => self.awake.disarm(),
            }
        }
        if self.awake.tick(now_ms) {
            self.sleep_pending = true;
            sink.emit(&AppEvent::SleepRequested {
                awake_secs: self.ctx.config.awake_duration_secs,
            });
        }

        // 4. Temperature sampling + durable history ingest, on the 1 s
        //    cadence, in normal mode only.
        if new_mode == DeviceMode::Normal && self.sampler.tick(now_ms) {
            let sample = hw.read_temperature();
            self.ctx.latest_sample = sample;
            if let Err(e) = self.history.append(sample, storage) {
                warn!("history persist failed: {}", e);
            }
        }

        if self.telemetry.tick(now_ms) {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    /// Apply the side effects raised by the last tick (or by `start`).
    ///
    /// Fixed order: drop the station link, bring up the access point,
    /// then swap the route table — always tearing the previous set down
    /// before the next is installed, so the two sets are never
    /// simultaneously active.
    pub fn apply_effects(
        &mut self,
        server: &mut impl ServerPort,
        net: &mut impl ConnectivityPort,
        ap_ssid: &str,
    ) {
        let fx = self.ctx.take_effects();
        if fx.is_empty() {
            return;
        }

        if fx.drop_station_link {
            server.teardown();
            net.disconnect();
        }
        if fx.start_access_point {
            match net.start_access_point(ap_ssid) {
                Ok(ap) => info!("provisioning AP '{}' up at {}", ap_ssid, ap.address),
                Err(e) => warn!("access point start failed: {}", e),
            }
        }
        if let Some(set) = fx.install_routes {
            server.teardown();
            server.install_routes(set);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button edge or web route).  Every
    /// config mutation is persisted before returning, so the next
    /// decision cycle always observes durable state.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        storage: &mut (impl StoragePort + ConfigPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::AdjustSetpoint(delta) => {
                let target = self.ctx.config.setpoint_c + delta;
                if self.ctx.config.set_setpoint(target) {
                    self.persist_config(storage);
                    sink.emit(&AppEvent::SetpointChanged(self.ctx.config.setpoint_c));
                }
            }
            AppCommand::SetSetpoint(value) => {
                if self.ctx.config.set_setpoint(value) {
                    self.persist_config(storage);
                    sink.emit(&AppEvent::SetpointChanged(self.ctx.config.setpoint_c));
                }
            }
            AppCommand::SetHysteresis(value) => {
                if self.ctx.config.set_hysteresis(value) {
                    self.persist_config(storage);
                    sink.emit(&AppEvent::HysteresisChanged(self.ctx.config.hysteresis_c));
                }
            }
            AppCommand::SaveCredentials(creds) => match creds.save(storage) {
                Ok(()) => {
                    self.restart_pending = true;
                    sink.emit(&AppEvent::CredentialsSaved);
                }
                Err(e) => warn!("credential store failed: {}", e),
            },
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current device mode.
    pub fn mode(&self) -> DeviceMode {
        self.machine.current_mode()
    }

    /// Latest decision engine output.
    pub fn heat_state(&self) -> HeatState {
        self.ctx.heat_state
    }

    /// Latest temperature sample (`None` = missing).
    pub fn latest_sample(&self) -> Option<f32> {
        self.ctx.latest_sample
    }

    /// Clone of the live configuration (for the status route).
    pub fn current_config(&self) -> ThermostatConfig {
        self.ctx.config.clone()
    }

    /// Read-only view of the temperature history.
    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Whether a credential save has requested a restart.
    pub fn restart_pending(&self) -> bool {
        self.restart_pending
    }

    /// Consume a pending restart request.
    pub fn take_restart_request(&mut self) -> bool {
        core::mem::take(&mut self.restart_pending)
    }

    /// Consume a pending deep-sleep request.
    pub fn take_sleep_request(&mut self) -> bool {
        core::mem::take(&mut self.sleep_pending)
    }

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            mode: self.mode(),
            heat_state: self.ctx.heat_state,
            temperature_c: self.ctx.latest_sample,
            setpoint_c: self.ctx.config.setpoint_c,
            hysteresis_c: self.ctx.config.hysteresis_c,
            history_len: self.history.len(),
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn persist_config(&self, storage: &mut impl ConfigPort) {
        if let Err(e) = storage.save_config(&self.ctx.config) {
            warn!("config persist failed: {}", e);
        }
    }
}
