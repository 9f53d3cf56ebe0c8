//! Fixed-interval cadence timers.
//!
//! The service loop runs at the 100 ms control tick, but several duties
//! run on slower wall-clock cadences: temperature sampling / history
//! ingest at 1 s, telemetry at 60 s.  [`Periodic`] tracks one such
//! cadence with an injected clock, so tests drive time explicitly instead
//! of sleeping.
//!
//! ```text
//!   control tick (100 ms):  ┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃┃
//!   sampler   (1000 ms):    ┃         ┃         ┃         ┃
//!   telemetry (60 s):       ┃                              …
//! ```

/// A recurring wall-clock cadence.
///
/// `tick(now_ms)` returns `true` whenever the interval has elapsed since
/// the last firing.  The first tick after construction fires immediately,
/// so a boot-time sample lands in slot zero of the history ring.
#[derive(Debug, Clone, Copy)]
pub struct Periodic {
    interval_ms: u64,
    last_fire_ms: Option<u64>,
}

impl Periodic {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// Poll with the current time; `true` means the cadence fired.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let due = self
            .last_fire_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms);
        if due {
            self.last_fire_ms = Some(now_ms);
        }
        due
    }

    /// Forget the last firing; the next `tick` fires immediately.
    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}
