//! FaderFlow - Multi-channel Volume Controller Firmware
//!
//! Main firmware binary for RP2040-based controllers. Each channel pairs a
//! fader, a rotary encoder with push button and a small display; a desktop
//! companion assigns applications and volumes over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc};
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use faderflow_core::channel::ChannelMap;
use faderflow_core::identity::{IdentitySource, IdentityStore};
use faderflow_core::input::{EncoderPins, FaderSampler};
use faderflow_core::link::Link;
use faderflow_hal::SerialConfig;
use faderflow_hal_rp2040::flash::FlashStorage;
use faderflow_hal_rp2040::gpio::EncoderLine;
use faderflow_hal_rp2040::uart::uart_config;
use faderflow_protocol::DeviceIdentity;

use crate::channels::DISPLAY_DIRTY;
use crate::config::{board_defaults, ConfigPersistence};
use crate::controller::{Controller, SharedController};
use crate::tasks::ChannelInputs;

mod channels;
mod config;
mod controller;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
// RX holds a full icon burst between reads
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

static CONTROLLER: StaticCell<SharedController> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("FaderFlow firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Tunables and identity share the flash partition
    let flash_storage = FlashStorage::new(p.FLASH, p.DMA_CH0);
    let mut persistence = ConfigPersistence::new(flash_storage);
    let config = persistence.load_or(board_defaults()).await;

    let identity = load_identity(IdentityStore::new(persistence.into_storage())).await;

    // Setup UART for the host link
    let serial = SerialConfig::default();
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config(&serial));
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!(
        "UART initialized at {} baud ({} us/byte)",
        serial.baudrate,
        serial.byte_time_us()
    );

    // Fader wipers: channel 0 on GPIO26, channel 1 on GPIO27
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let wiper0 = adc::Channel::new_pin(p.PIN_26, Pull::None);
    let wiper1 = adc::Channel::new_pin(p.PIN_27, Pull::None);

    // Encoders: CLK, DT, SW with pull-ups (button pulls low)
    let encoder0 = EncoderPins::new(
        EncoderLine::new(Input::new(p.PIN_2, Pull::Up)),
        EncoderLine::new(Input::new(p.PIN_3, Pull::Up)),
        EncoderLine::new(Input::new(p.PIN_4, Pull::Up)),
    );
    let encoder1 = EncoderPins::new(
        EncoderLine::new(Input::new(p.PIN_5, Pull::Up)),
        EncoderLine::new(Input::new(p.PIN_6, Pull::Up)),
        EncoderLine::new(Input::new(p.PIN_7, Pull::Up)),
    );

    let inputs = [
        ChannelInputs {
            encoder: encoder0,
            fader: FaderSampler::new(0, config.fader),
            wiper: wiper0,
        },
        ChannelInputs {
            encoder: encoder1,
            fader: FaderSampler::new(1, config.fader),
            wiper: wiper1,
        },
    ];

    info!("ADC and encoder inputs initialized");

    let controller = CONTROLLER.init(Mutex::new(Controller {
        channels: ChannelMap::new(config.encoder),
        link: Link::new(identity, config.link),
    }));

    // First paint of every screen
    DISPLAY_DIRTY.signal(());

    // Spawn tasks
    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::serial_rx_task(rx, controller)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::inputs_task(adc, inputs, controller)).unwrap();
    spawner.spawn(tasks::display_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Load the device identity, generating it on first boot
///
/// Runs with a zero identifier if flash is unusable so the device still
/// answers the host.
async fn load_identity(mut store: IdentityStore<FlashStorage<'static>>) -> DeviceIdentity {
    let mut rng = RoscRng;

    match store.load_or_generate(&mut rng).await {
        Ok((identity, IdentitySource::Stored)) => {
            info!("Device identity loaded: {:02x}", identity.as_bytes());
            identity
        }
        Ok((identity, IdentitySource::Generated)) => {
            info!("Device identity generated: {:02x}", identity.as_bytes());
            identity
        }
        Err(e) => {
            error!("Identity storage failed: {:?}", e);
            DeviceIdentity::default()
        }
    }
}
