//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                         | Connects to               |
//! |------------|------------------------------------|---------------------------|
//! | `hardware` | IndicatorPort, FanPort, StrobePort | LEDC PWM via drivers      |
//! |            | PlatformPort, DelayNs              | platform + delay provider |
//! | `log_sink` | MachineObserver                    | Serial log output         |
//! | `platform` | PlatformPort                       | FreeRTOS, sleep controller|
//! | `time`     | Clock                              | ESP32 system timer        |

pub mod hardware;
pub mod log_sink;
pub mod platform;
pub mod time;
