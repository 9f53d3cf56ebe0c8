//! Polled button debouncing and long-press detection.
//!
//! ## Hardware
//!
//! Three active-low momentary switches with external pull-ups.  No GPIO
//! interrupts: the service loop polls the raw levels every control tick
//! and feeds them through these small state machines, so no edge is ever
//! lost between polls and no ISR plumbing is needed.
//!
//! ## Gesture detection
//!
//! | Input         | Condition                                  | Result            |
//! |---------------|--------------------------------------------|-------------------|
//! | Adjust button | rising edge, > 150 ms since last trigger   | one adjust event  |
//! | Adjust button | held                                       | no repeat events  |
//! | Mode button   | held continuously >= 10 s                  | one mode switch   |
//!
//! Both adjust buttons are independent; simultaneous presses may fire in
//! the same poll.  Timestamps are `u32` milliseconds with wrapping
//! arithmetic, good for 49-day uptimes.

/// Minimum gap between adjust events on one button.
pub const DEBOUNCE_MS: u32 = 150;

/// Continuous hold required to switch the device mode.
pub const LONG_PRESS_MS: u32 = 10_000;

// ---------------------------------------------------------------------------
// Adjust button (edge-triggered, debounced)
// ---------------------------------------------------------------------------

/// Edge detector for one setpoint adjustment button.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustButton {
    /// A press has been registered and not yet released.
    pressed: bool,
    /// Time of the last event that fired, for the debounce window.
    last_trigger_ms: Option<u32>,
}

impl AdjustButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll with the current time and raw pressed level.
    /// Returns `true` exactly once per debounced rising edge.
    pub fn tick(&mut self, now_ms: u32, down_now: bool) -> bool {
        if down_now {
            let past_debounce = self
                .last_trigger_ms
                .is_none_or(|t| now_ms.wrapping_sub(t) > DEBOUNCE_MS);
            if !self.pressed && past_debounce {
                self.pressed = true;
                self.last_trigger_ms = Some(now_ms);
                return true;
            }
        } else {
            // Release re-arms the edge; the next press fires as soon as
            // the debounce window has passed.
            self.pressed = false;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Long-press tracker (mode button)
// ---------------------------------------------------------------------------

/// Detects a continuous >= 10 s hold of the mode button.
///
/// Fires at most once per hold: after firing, the button must be released
/// and pressed again before another event is possible.  Releasing before
/// the threshold resets the timer with no carry-over.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongPressTracker {
    /// Time of the rising edge, `None` while released.
    press_start_ms: Option<u32>,
    /// The current hold already produced its event.
    fired: bool,
}

impl LongPressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll with the current time and raw pressed level.
    /// Returns `true` exactly once when the hold crosses the threshold.
    pub fn tick(&mut self, now_ms: u32, down_now: bool) -> bool {
        if down_now {
            match self.press_start_ms {
                None => self.press_start_ms = Some(now_ms),
                Some(start) => {
                    if !self.fired && now_ms.wrapping_sub(start) >= LONG_PRESS_MS {
                        self.fired = true;
                        return true;
                    }
                }
            }
        } else {
            self.press_start_ms = None;
            self.fired = false;
        }
        false
    }

    /// Whether a press is currently being tracked.
    pub fn is_held(&self) -> bool {
        self.press_start_ms.is_some()
    }
}
