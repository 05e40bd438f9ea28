//! Polled, debounced front-panel buttons.
//!
//! ## Hardware
//!
//! Five active-low momentary switches with pull-ups (MODE, UP, DOWN,
//! LEFT, RIGHT).  The main loop scans them once per control tick; a level
//! must hold for the debounce time before it counts.  One event is
//! produced per press, on the debounced falling edge.  Holding a button
//! does not repeat.
//!
//! ```text
//!   raw    ‾‾‾‾|_|‾|____________________|‾‾‾‾
//!   stable ‾‾‾‾‾‾‾‾‾‾‾‾‾|________________‾‾‾‾‾‾‾‾
//!                       ▲ press event
//! ```

use embedded_hal::digital::InputPin;
use heapless::Deque;
use log::debug;

use crate::fsm::ButtonEvent;

/// Pending presses held between scans and polls.
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Internal debounce state for one switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Debounce {
    Stable { pressed: bool },
    Settling { pressed: bool, since_ms: u64 },
}

/// One debounced switch bound to the event it produces.
pub struct DebouncedButton<P> {
    pin: P,
    event: ButtonEvent,
    state: Debounce,
    debounce_ms: u64,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, event: ButtonEvent, debounce_ms: u32) -> Self {
        Self {
            pin,
            event,
            state: Debounce::Stable { pressed: false },
            debounce_ms: debounce_ms as u64,
        }
    }

    pub fn event(&self) -> ButtonEvent {
        self.event
    }

    /// Sample the pin.  Returns the button's event on a debounced press.
    /// A failed pin read counts as released.
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let raw = self.pin.is_low().unwrap_or(false);

        match self.state {
            Debounce::Stable { pressed } if raw != pressed => {
                self.state = Debounce::Settling {
                    pressed: raw,
                    since_ms: now_ms,
                };
                None
            }
            Debounce::Stable { .. } => None,
            Debounce::Settling { pressed, .. } if raw != pressed => {
                // Bounced back before settling.
                self.state = Debounce::Stable { pressed: raw };
                None
            }
            Debounce::Settling { pressed, since_ms } => {
                if now_ms.saturating_sub(since_ms) < self.debounce_ms {
                    return None;
                }
                self.state = Debounce::Stable { pressed };
                pressed.then_some(self.event)
            }
        }
    }
}

/// The five front-panel buttons plus a small queue of pending presses.
pub struct ButtonBank<P> {
    buttons: [DebouncedButton<P>; 5],
    queue: Deque<ButtonEvent, EVENT_QUEUE_DEPTH>,
    overflowed: u32,
}

impl<P: InputPin> ButtonBank<P> {
    /// Pins in MODE, UP, DOWN, LEFT, RIGHT order.
    pub fn new(pins: [P; 5], debounce_ms: u32) -> Self {
        let [mode, up, down, left, right] = pins;
        Self {
            buttons: [
                DebouncedButton::new(mode, ButtonEvent::Mode, debounce_ms),
                DebouncedButton::new(up, ButtonEvent::Up, debounce_ms),
                DebouncedButton::new(down, ButtonEvent::Down, debounce_ms),
                DebouncedButton::new(left, ButtonEvent::Left, debounce_ms),
                DebouncedButton::new(right, ButtonEvent::Right, debounce_ms),
            ],
            queue: Deque::new(),
            overflowed: 0,
        }
    }

    /// Sample every button once, queueing any presses.
    pub fn scan(&mut self, now_ms: u64) {
        for b in &mut self.buttons {
            if let Some(ev) = b.poll(now_ms) {
                debug!("button {:?} pressed", ev);
                if self.queue.push_back(ev).is_err() {
                    self.overflowed = self.overflowed.wrapping_add(1);
                }
            }
        }
    }

    pub fn pop(&mut self) -> Option<ButtonEvent> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Presses lost because the queue was full.
    pub fn overflowed(&self) -> u32 {
        self.overflowed
    }
}
