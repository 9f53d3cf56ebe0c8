//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements        | Connects to               |
//! |-------------|-------------------|---------------------------|
//! | `hardware`  | SensorPort        | ESP32 ADC (thermistor)    |
//! |             | InputPort         | ESP32 GPIO (3 buttons)    |
//! |             | IndicatorPort     | ESP32 GPIO (2 LEDs)       |
//! | `http`      | ServerPort        | HTTP request queue        |
//! | `log_sink`  | EventSink         | Serial log output         |
//! | `nvs`       | StoragePort       | NVS / in-memory store     |
//! |             | ConfigPort        |                           |
//! | `time`      | (uptime source)   | ESP32 system timer        |
//! | `wifi`      | ConnectivityPort  | ESP-IDF Wi-Fi STA / AP    |

pub mod device_id;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod time;
pub mod wifi;
