//! Sensor subsystem.
//!
//! One sensor: the NTC thermistor.  Multi-sensor support is explicitly
//! out of scope, so there is no aggregating hub — the hardware adapter
//! owns the driver directly.

pub mod temperature;
