//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter      | Implements        | Connects to                    |
//! |--------------|-------------------|--------------------------------|
//! | `hardware`   | ButtonPort        | debounced GPIO buttons         |
//! |              | ClockPort         | `SoftClock`                    |
//! |              | MoisturePort      | soil probe ADC                 |
//! |              | PumpPort          | relay GPIO                     |
//! |              | DisplayPort       | `LogDisplay`                   |
//! |              | HostLinkPort      | `HostLink`                     |
//! | `host_link`  | HostLinkPort      | line mailbox + UART TX         |
//! | `display`    | DisplayPort       | serial log                     |
//! | `log_sink`   | EventSink         | serial log                     |
//! | `time`       | ClockPort         | ESP32 system timer / `Instant` |

pub mod display;
pub mod hardware;
pub mod host_link;
pub mod log_sink;
pub mod time;
