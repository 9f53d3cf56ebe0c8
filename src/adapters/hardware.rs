//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the thermistor driver and the status LEDs, and reads the three
//! button pins, exposing everything through [`SensorPort`], [`InputPort`]
//! and [`IndicatorPort`].  This is the only module in the system that
//! touches actual pins.  On non-espidf targets, the underlying drivers
//! use cfg-gated simulation stubs (all buttons read released).

use crate::app::ports::{IndicatorPort, InputLevels, InputPort, SensorPort};
use crate::control::hysteresis::HeatState;
use crate::drivers::hw_init;
use crate::drivers::status_led::StatusLeds;
use crate::pins;
use crate::sensors::temperature::TemperatureSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor: TemperatureSensor,
    leds: StatusLeds,
}

impl HardwareAdapter {
    pub fn new(sensor: TemperatureSensor, leds: StatusLeds) -> Self {
        Self { sensor, leds }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_temperature(&mut self) -> Option<f32> {
        self.sensor.read()
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    fn read_levels(&mut self) -> InputLevels {
        // Active-low with pull-ups: a low pin level means "held down".
        InputLevels {
            up: !hw_init::gpio_read(pins::BUTTON_UP_GPIO),
            down: !hw_init::gpio_read(pins::BUTTON_DOWN_GPIO),
            mode: !hw_init::gpio_read(pins::BUTTON_MODE_GPIO),
        }
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl IndicatorPort for HardwareAdapter {
    fn show_heat_state(&mut self, state: HeatState) {
        self.leds.show(state);
    }

    fn all_off(&mut self) {
        self.leds.off();
    }
}
