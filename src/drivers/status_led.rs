//! Heat/cool status LEDs.
//!
//! Two discrete active-high LEDs driven purely from the decision engine's
//! output: heat LED while HEATING, cool LED while COOLING, both dark when
//! ONTARGET (or during provisioning / pre-sleep shutdown).  On non-espidf
//! targets the last written state is cached for test assertions.

use crate::control::hysteresis::HeatState;
use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLeds {
    heat_on: bool,
    cool_on: bool,
}

impl Default for StatusLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLeds {
    pub fn new() -> Self {
        Self {
            heat_on: false,
            cool_on: false,
        }
    }

    /// Render a heat state onto the two LEDs.
    pub fn show(&mut self, state: HeatState) {
        let (heat, cool) = match state {
            HeatState::Heating => (true, false),
            HeatState::Cooling => (false, true),
            HeatState::OnTarget => (false, false),
        };
        self.set(heat, cool);
    }

    /// Both LEDs dark.
    pub fn off(&mut self) {
        self.set(false, false);
    }

    fn set(&mut self, heat: bool, cool: bool) {
        if heat != self.heat_on {
            hw_init::gpio_write(pins::LED_HEAT_GPIO, heat);
            self.heat_on = heat;
        }
        if cool != self.cool_on {
            hw_init::gpio_write(pins::LED_COOL_GPIO, cool);
            self.cool_on = cool;
        }
    }

    /// Current LED levels `(heat, cool)` — used by tests and telemetry.
    pub fn levels(&self) -> (bool, bool) {
        (self.heat_on, self.cool_on)
    }
}
