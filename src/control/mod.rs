//! Control algorithms — the hysteresis decision engine.

pub mod hysteresis;
