//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements            | Connects to                |
//! |------------|-----------------------|----------------------------|
//! | `hardware` | MotorPort             | H-bridge GPIO lines        |
//! |            | AdcPort               | Oneshot converter unit     |
//! |            | SwitchPort, LedPort   | Selector GPIO, status LEDs |
//! |            | AnalogPort            | Blocking reads / scan data |
//! | `delay`    | embedded-hal DelayNs  | ROM spin loop / host sleep |
//! | `log_sink` | EventSink             | Serial log + history ring  |

pub mod delay;
pub mod hardware;
pub mod log_sink;
