//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                      | Connects to                |
//! |-------------|---------------------------------|----------------------------|
//! | `hardware`  | SensorPort, ActuatorPort        | ESP32 ADC, GPIO, LEDC      |
//! | `time`      | Clock                           | ESP32 system timer         |
//! | `log_sink`  | NotificationSink                | Serial log output          |
//! | `channels`  | CommandChannel, NotificationSink| Chat transport task        |
//! | `wifi`      | ConnectivityPort                | ESP-IDF WiFi STA + ping    |

pub mod channels;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub(super) mod utils;
pub mod wifi;
