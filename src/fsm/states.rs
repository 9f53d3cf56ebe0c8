//! Concrete mode handler functions and table builder.
//!
//! Each mode is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.  This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  boot, empty ssid ─────────────▶ PROVISIONING ◀──[10 s mode-button hold]
//!  boot, join ok ────▶ NORMAL ────────────────────────────┘
//!  boot, join failed ────────────▶ PROVISIONING
//!
//!  PROVISIONING ──[credentials saved + reboot]──▶ NORMAL
//!  NORMAL ──[awake timeout]──▶ deep sleep (resumes at boot, not a mode)
//! ```
//!
//! The provisioning → normal edge is intentionally absent from the table:
//! it is only realized across a reboot, after the save-credentials route
//! has persisted a non-empty SSID.

use super::context::ModeContext;
use super::{DeviceMode, ModeDescriptor};
use crate::web::RouteSet;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static mode table.  Called once at startup.
pub fn build_mode_table() -> [ModeDescriptor; DeviceMode::COUNT] {
    [
        // Index 0 — Provisioning
        ModeDescriptor {
            id: DeviceMode::Provisioning,
            name: "Provisioning",
            on_enter: Some(provisioning_enter),
            on_exit: None,
            on_update: provisioning_update,
        },
        // Index 1 — Normal
        ModeDescriptor {
            id: DeviceMode::Normal,
            name: "Normal",
            on_enter: Some(normal_enter),
            on_exit: Some(normal_exit),
            on_update: normal_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROVISIONING mode — advertising the setup access point
// ═══════════════════════════════════════════════════════════════════════════

fn provisioning_enter(ctx: &mut ModeContext) {
    // The station link (if any) must be gone before the AP comes up, and
    // the provisioning routes replace the thermostat routes wholesale.
    ctx.effects.drop_station_link = true;
    ctx.effects.start_access_point = true;
    ctx.effects.install_routes = Some(RouteSet::Provisioning);

    // No sampling happens in this mode; clearing the sample keeps the
    // decision engine at its fail-safe output.
    ctx.latest_sample = None;

    info!("PROVISIONING: advertising setup access point");
}

fn provisioning_update(ctx: &mut ModeContext) -> Option<DeviceMode> {
    // The mode button has no function here; swallow any latched hold so a
    // stale signal cannot fire on the next entry into normal mode.
    ctx.long_press_pending = false;

    // The only exit is a reboot after credentials are saved.
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL mode — thermostat control and status serving
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter(ctx: &mut ModeContext) {
    ctx.effects.install_routes = Some(RouteSet::Normal);
    info!(
        "NORMAL: thermostat active (setpoint {:.1}°C, deadband {:.1}°C)",
        ctx.config.setpoint_c, ctx.config.hysteresis_c
    );
}

fn normal_exit(ctx: &mut ModeContext) {
    info!(
        "NORMAL: leaving after {:.0}s, thermostat control suspended",
        ctx.secs_in_mode()
    );
}

fn normal_update(ctx: &mut ModeContext) -> Option<DeviceMode> {
    // A completed 10 s hold of the mode button sends the device back into
    // provisioning.  The latch fires at most once per continuous hold.
    if ctx.long_press_pending {
        ctx.long_press_pending = false;
        info!("NORMAL: mode button held, switching to provisioning");
        return Some(DeviceMode::Provisioning);
    }

    None
}
