//! GPIO / peripheral pin assignments for the HomeStat main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// User buttons (active-low momentary switches with external pull-ups)
// ---------------------------------------------------------------------------

/// Setpoint increment button (+0.5 °C per debounced press).
pub const BUTTON_UP_GPIO: i32 = 5;
/// Setpoint decrement button (-0.5 °C per debounced press).
pub const BUTTON_DOWN_GPIO: i32 = 6;
/// Mode button.  A 10 s hold switches the device back into provisioning
/// mode; its falling edge is also the deep-sleep wake source, so this pin
/// must be RTC-capable (GPIO 0-21 on the ESP32-S3).
pub const BUTTON_MODE_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Temperature sensor — NTC thermistor on ADC1
// ---------------------------------------------------------------------------

/// NTC thermistor — 10 kΩ @ 25 °C, voltage-divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Status LEDs (discrete, active HIGH)
// ---------------------------------------------------------------------------

/// Lit while the decision engine reports HEATING.
pub const LED_HEAT_GPIO: i32 = 11;
/// Lit while the decision engine reports COOLING.
pub const LED_COOL_GPIO: i32 = 12;

// ---------------------------------------------------------------------------
// UART debug
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
