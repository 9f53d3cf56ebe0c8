//! Awake-time tracking and the deep-sleep power manager.
//!
//! The device serves for a bounded awake window (60 s in the reference
//! configuration) and then deep-sleeps until the mode button is pressed.
//! Deep sleep is an excursion, not a mode: execution context is lost and
//! the firmware resumes at boot, re-entering normal mode if credentials
//! are still valid.
//!
//! [`AwakeScheduler`] is pure timing logic with an injected clock; the
//! [`PowerManager`] adapter owns the irreversible halt and restart calls.

use log::info;

use crate::app::ports::{PowerPort, WakeLevel};

// ───────────────────────────────────────────────────────────────
// Awake scheduler
// ───────────────────────────────────────────────────────────────

/// Raises a single sleep request once the awake window expires.
///
/// Armed on entry to normal mode; never armed in provisioning, so a
/// device waiting for setup keeps its access point up indefinitely.
#[derive(Debug, Clone, Copy)]
pub struct AwakeScheduler {
    awake_duration_ms: u64,
    /// `awake_start` timestamp; `None` while disarmed (provisioning).
    armed_at_ms: Option<u64>,
    fired: bool,
}

impl AwakeScheduler {
    pub fn new(awake_duration_secs: u32) -> Self {
        Self {
            awake_duration_ms: u64::from(awake_duration_secs) * 1000,
            armed_at_ms: None,
            fired: false,
        }
    }

    /// Start (or restart) the awake window at `now_ms`.
    pub fn arm(&mut self, now_ms: u64) {
        self.armed_at_ms = Some(now_ms);
        self.fired = false;
    }

    /// Stop tracking; `tick` is inert until the next `arm`.
    pub fn disarm(&mut self) {
        self.armed_at_ms = None;
        self.fired = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Poll with the current time.  Returns `true` exactly once per armed
    /// window, when the elapsed awake time crosses the configured duration.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(start) = self.armed_at_ms else {
            return false;
        };
        if !self.fired && now_ms.saturating_sub(start) >= self.awake_duration_ms {
            self.fired = true;
            return true;
        }
        false
    }
}

// ───────────────────────────────────────────────────────────────
// Power manager
// ───────────────────────────────────────────────────────────────

/// Owns the irreversible power transitions.
///
/// On ESP-IDF the halt arms an EXT0 wake on the mode button and enters
/// deep sleep; neither call returns in-process.  The simulation backend
/// records the requests so host tests can assert on them.
pub struct PowerManager {
    #[cfg(not(target_os = "espidf"))]
    halted: Option<(i32, WakeLevel)>,
    #[cfg(not(target_os = "espidf"))]
    restarts: u32,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerManager {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            halted: None,
            #[cfg(not(target_os = "espidf"))]
            restarts: 0,
        }
    }

    /// Simulation: the recorded halt request, if any.
    #[cfg(not(target_os = "espidf"))]
    pub fn last_halt(&self) -> Option<(i32, WakeLevel)> {
        self.halted
    }

    /// Simulation: number of restart requests.
    #[cfg(not(target_os = "espidf"))]
    pub fn restart_count(&self) -> u32 {
        self.restarts
    }
}

impl PowerPort for PowerManager {
    #[cfg(target_os = "espidf")]
    fn halt_until_wake(&mut self, wake_gpio: i32, level: WakeLevel) {
        info!("power: deep sleep, wake on GPIO{} {:?}", wake_gpio, level);
        let wake_level = match level {
            WakeLevel::Low => 0,
            WakeLevel::High => 1,
        };
        // SAFETY: both calls are single-threaded main-context ESP-IDF
        // sleep APIs; esp_deep_sleep_start does not return.
        unsafe {
            esp_idf_svc::sys::esp_sleep_enable_ext0_wakeup(wake_gpio, wake_level);
            esp_idf_svc::sys::esp_deep_sleep_start();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn halt_until_wake(&mut self, wake_gpio: i32, level: WakeLevel) {
        info!("power(sim): halt requested, wake on GPIO{} {:?}", wake_gpio, level);
        self.halted = Some((wake_gpio, level));
    }

    #[cfg(target_os = "espidf")]
    fn restart(&mut self) {
        info!("power: restarting");
        // SAFETY: esp_restart is the canonical software reset; no return.
        unsafe {
            esp_idf_svc::sys::esp_restart();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self) {
        info!("power(sim): restart requested");
        self.restarts += 1;
    }
}
