//! Irrigator Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                              LogEventSink     │
//! │  (Buttons · Clock · Moisture · Pump ·         (EventSink)      │
//! │   Display · HostLink)                                          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  UI FSM · Schedule · Moisture band · Host session      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  UART reader thread ──► LineMailbox ──► HostLink               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io;
use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Input, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver, UartTxDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_sys::*;

use irrigator::adapters::hardware::HardwareAdapter;
use irrigator::adapters::host_link::HostLink;
use irrigator::adapters::log_sink::LogEventSink;
use irrigator::adapters::time::{SoftClock, SystemUptime};
use irrigator::app::service::AppService;
use irrigator::config::SystemConfig;
use irrigator::drivers::button::ButtonBank;
use irrigator::drivers::pump::{Polarity, RelayPump};
use irrigator::error::{Error, SensorError};
use irrigator::pins;
use irrigator::protocol::LineMailbox;
use irrigator::sensors::soil::{RawAdc, SoilSensor};

/// Filled by the UART reader thread, drained by the control loop.
static HOST_RX: LineMailbox = LineMailbox::new();

// ── Soil probe ADC (oneshot, ADC1) ────────────────────────────

struct OneshotSoilAdc {
    handle: adc_oneshot_unit_handle_t,
    channel: adc_channel_t,
}

impl OneshotSoilAdc {
    fn new(channel: adc_channel_t) -> core::result::Result<Self, Error> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: `handle` outlives the call; the driver fills it on success.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("ADC1 unit"));
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `handle` was just created by `adc_oneshot_new_unit`.
        let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            // SAFETY: the unit is not used again.
            unsafe {
                adc_oneshot_del_unit(handle);
            }
            return Err(Error::Init("soil probe ADC channel"));
        }

        info!("ADC1 channel {} configured for soil probe", channel);
        Ok(Self { handle, channel })
    }
}

impl RawAdc for OneshotSoilAdc {
    fn read_raw(&mut self) -> core::result::Result<u16, SensorError> {
        let mut raw: i32 = 0;
        // SAFETY: the unit handle is valid for the lifetime of `self`.
        let ret = unsafe { adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(raw.clamp(0, i32::from(u16::MAX)) as u16)
    }
}

impl Drop for OneshotSoilAdc {
    fn drop(&mut self) {
        // SAFETY: the handle is released exactly once.
        unsafe {
            adc_oneshot_del_unit(self.handle);
        }
    }
}

// ── Host UART transmit ────────────────────────────────────────

struct UartTx(UartTxDriver<'static>);

impl io::Write for UartTx {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.wait_done(BLOCK).map_err(io::Error::other)
    }
}

fn button(gpio: i32) -> Result<PinDriver<'static, AnyIOPin, Input>> {
    // SAFETY: each GPIO number in `pins` is claimed exactly once.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(pin)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Irrigator v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::from_build_env();

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let buttons = ButtonBank::new(
        [
            button(pins::BUTTON_MODE_GPIO)?,
            button(pins::BUTTON_UP_GPIO)?,
            button(pins::BUTTON_DOWN_GPIO)?,
            button(pins::BUTTON_LEFT_GPIO)?,
            button(pins::BUTTON_RIGHT_GPIO)?,
        ],
        config.button_debounce_ms,
    );

    // SAFETY: the relay GPIO is not used anywhere else.
    let relay = PinDriver::output(unsafe { AnyOutputPin::new(pins::PUMP_RELAY_GPIO) })?;
    let polarity = if pins::PUMP_RELAY_ACTIVE_LOW {
        Polarity::ActiveLow
    } else {
        Polarity::ActiveHigh
    };
    let pump = RelayPump::new(relay, polarity).map_err(Error::from)?;

    let soil = SoilSensor::new(
        OneshotSoilAdc::new(pins::SOIL_ADC_CHANNEL)?,
        config.moisture_sample_count,
    );

    let uart = UartDriver::new(
        peripherals.uart1,
        // SAFETY: UART pins are claimed once, here.
        unsafe { AnyIOPin::new(pins::UART_TX_GPIO) },
        unsafe { AnyIOPin::new(pins::UART_RX_GPIO) },
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.uart_baud)),
    )?;
    let (tx, rx) = uart.into_split();
    info!("host UART up at {} baud", config.uart_baud);

    // ── 4. UART reader ────────────────────────────────────────
    std::thread::Builder::new()
        .name("host-rx".into())
        .stack_size(4096)
        .spawn(move || {
            let mut chunk = [0u8; 32];
            loop {
                match rx.read(&mut chunk, BLOCK) {
                    Ok(n) => {
                        HOST_RX.push_bytes(&chunk[..n]);
                    }
                    Err(e) => {
                        warn!("host UART read failed ({}), discarding partial line", e);
                        HOST_RX.overrun();
                    }
                }
            }
        })?;

    // ── 5. Compose and run ────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        buttons,
        pump,
        soil,
        SoftClock::new(SystemUptime::new()),
        HostLink::new(&HOST_RX, UartTx(tx)),
    );
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(&config);
    app.start(&mut sink);

    let interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    loop {
        app.tick(&mut hw, &mut sink);

        if app.tick_count() % 600 == 0 {
            let (lines_in, lines_out) = hw.host().counters();
            info!(
                "alive: {} mode, pump {}, clock {}, host {} in / {} out",
                app.mode(),
                if hw.pump_running() { "ON" } else { "OFF" },
                if hw.clock_synced() { "synced" } else { "free-running" },
                lines_in,
                lines_out
            );
            if app.health().is_degraded() {
                error!("degraded peripherals: {:?}", app.health());
            }
        }

        std::thread::sleep(interval);
    }
}
