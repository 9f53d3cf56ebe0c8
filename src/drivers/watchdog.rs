//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the service loop stalls for more than 10 seconds
//! (two orders of magnitude above the 100 ms control tick).  The loop
//! must call `feed()` on every iteration; the bounded station join at
//! boot happens before subscription so it cannot trip the timer.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT configuration and subscription from the single
            // main-task context, before the service loop starts.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: WATCHDOG_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("watchdog: reconfigure returned {} (may already be set up)", ret);
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("watchdog: subscribed ({} ms, panic on trigger)", WATCHDOG_TIMEOUT_MS);
                } else {
                    log::warn!("watchdog: subscribe failed ({})", ret);
                }

                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("watchdog(sim): no-op");
            Self {}
        }
    }

    /// Feed the watchdog.  Must be called at least every 10 seconds.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: reset of this task's own TWDT entry.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
