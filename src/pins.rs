//! GPIO / peripheral pin assignments for the irrigator controller board.
//!
//! Single source of truth; `main` opens peripherals by these numbers and
//! nothing else hard-codes a pin.  Targets the ESP32-C3 DevKitM-1.

// ---------------------------------------------------------------------------
// Front-panel buttons (active-low, internal pull-ups)
// ---------------------------------------------------------------------------

pub const BUTTON_MODE_GPIO: i32 = 4;
pub const BUTTON_UP_GPIO: i32 = 5;
pub const BUTTON_DOWN_GPIO: i32 = 6;
pub const BUTTON_LEFT_GPIO: i32 = 7;
pub const BUTTON_RIGHT_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output to the relay module input.
pub const PUMP_RELAY_GPIO: i32 = 3;
/// Relay board energises on a LOW input.
pub const PUMP_RELAY_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// Soil moisture probe (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive probe analog output on GPIO0, which is ADC1 channel 0 on the C3.
pub const SOIL_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Host UART
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 21;
pub const UART_RX_GPIO: i32 = 20;
