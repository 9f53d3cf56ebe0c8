//! Function-pointer device-mode state machine.
//!
//! Classic embedded FSM pattern expressed in safe Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  ModeTable                                             │
//! │  ┌──────────────┬──────────┬─────────┬───────────────┐ │
//! │  │ DeviceMode   │ on_enter │ on_exit │ on_update     │ │
//! │  ├──────────────┼──────────┼─────────┼───────────────┤ │
//! │  │ Provisioning │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Opt  │ │
//! │  │ Normal       │ fn(ctx)  │ fn(ctx) │ fn(ctx)->Opt  │ │
//! │  └──────────────┴──────────┴─────────┴───────────────┘ │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** mode.  If it
//! returns `Some(next)`, the engine runs `on_exit` for the current mode,
//! then `on_enter` for the next, and updates the current pointer.  All
//! functions receive `&mut ModeContext`, which holds the latest sample,
//! config, input signals, and the side-effect block the service applies
//! through its ports after the tick.
//!
//! Exactly one mode is active at a time, and each mode owns an exclusive
//! route/button-logic set — the enter/exit handlers raise the effects that
//! tear one set down before the other is installed.  The deep-sleep
//! excursion is *not* a mode: execution resumes at boot, so the service
//! executes the halt directly.

pub mod context;
pub mod states;

use context::ModeContext;
use log::info;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// Enumeration of the device operating modes.
/// Must stay in sync with the table built in [`states::build_mode_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DeviceMode {
    /// Advertising the setup access point; serving the provisioning routes.
    Provisioning = 0,
    /// Joined to the stored network; serving the thermostat routes.
    Normal = 1,
}

impl DeviceMode {
    /// Total number of modes — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert a `u8` index back to `DeviceMode`.  Panics on out-of-range
    /// in debug builds; returns `Provisioning` in release (the locally
    /// recoverable mode is the safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Provisioning,
            1 => Self::Normal,
            _ => {
                debug_assert!(false, "invalid mode index: {idx}");
                Self::Provisioning
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "PROVISIONING",
            Self::Normal => "NORMAL",
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type ModeActionFn = fn(&mut ModeContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type ModeUpdateFn = fn(&mut ModeContext) -> Option<DeviceMode>;

// ---------------------------------------------------------------------------
// Mode descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single device mode.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct ModeDescriptor {
    pub id: DeviceMode,
    pub name: &'static str,
    pub on_enter: Option<ModeActionFn>,
    pub on_exit: Option<ModeActionFn>,
    pub on_update: ModeUpdateFn,
}

// ---------------------------------------------------------------------------
// Mode machine engine
// ---------------------------------------------------------------------------

/// The device-mode state machine engine.
///
/// Owns the mode table (array of [`ModeDescriptor`]) and is driven by the
/// service, which threads a mutable [`ModeContext`] through every call.
pub struct ModeMachine {
    /// Fixed-size table indexed by `DeviceMode as usize`.
    table: [ModeDescriptor; DeviceMode::COUNT],
    /// Index of the currently active mode.
    current: usize,
    /// Monotonically increasing tick counter (wraps at u64::MAX).
    tick_count: u64,
    /// Tick at which the current mode was entered.
    mode_entry_tick: u64,
}

impl ModeMachine {
    /// Construct a new machine with the given table, starting in `initial`.
    /// The initial mode is decided at boot: empty stored SSID means
    /// `Provisioning` without a join attempt; otherwise a bounded join
    /// picks `Normal` on success and falls back to `Provisioning`.
    pub fn new(table: [ModeDescriptor; DeviceMode::COUNT], initial: DeviceMode) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            mode_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ModeContext) {
        info!("mode machine starting in: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the machine by one tick.
    ///
    /// 1. Call `on_update` for the current mode.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut ModeContext) {
        self.tick_count += 1;
        ctx.ticks_in_mode = self.tick_count - self.mode_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (test hook; the service never needs
    /// this in production because all transitions flow through `on_update`).
    pub fn force_transition(&mut self, next: DeviceMode, ctx: &mut ModeContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current mode's identity.
    pub fn current_mode(&self) -> DeviceMode {
        DeviceMode::from_index(self.current)
    }

    /// How many ticks the machine has been in the current mode.
    pub fn ticks_in_current_mode(&self) -> u64 {
        self.tick_count - self.mode_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: DeviceMode, ctx: &mut ModeContext) {
        let next_idx = next_id as usize;

        info!(
            "mode transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current mode
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.mode_entry_tick = self.tick_count;
        ctx.ticks_in_mode = 0;

        // Enter new mode
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
