//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (front-panel
//! buttons, the supervisory host) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.
//! The per-tick loop feeds its own polled inputs through the same path.

use crate::fsm::ButtonEvent;
use crate::protocol::LineBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// One debounced button press.
    Button(ButtonEvent),

    /// One complete line received from the host.
    HostLine(LineBuf),
}
