//! bit2ascii firmware for the nRF52840.
//!
//! Four buttons enter a string bit by bit; four LEDs show progress. A
//! confirmed string is written to the USB serial port.
//!
//! Task layout:
//! - `main` - samples the buttons and runs the state machine every 1 ms
//! - `usb_task` - USB enumeration and bus servicing
//! - `serial_task` - writes transmitted strings to the CDC-ACM port

#![no_std]
#![no_main]

mod board;
mod usb;

use bit2ascii::buttons::ButtonBank;
use bit2ascii::config;
use bit2ascii::{Io, Machine};
use defmt::info;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::pwm::SimplePwm;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::UsbDevice;
use {defmt_rtt as _, panic_probe as _};

use board::{ChannelSink, EmbassyClock, PwmLeds, Text};
use usb::serial::UsbDriver;

/// Strings handed from the tick loop to the serial writer.
static TRANSMIT_CHANNEL: Channel<CriticalSectionRawMutex, Text, { config::TRANSMIT_QUEUE_DEPTH }> =
    Channel::new();

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    usb::serial::run_usb_device(device).await
}

#[embassy_executor::task]
async fn serial_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    usb::serial::serial_writer_task(class, TRANSMIT_CHANNEL.receiver()).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());

    info!("Binary ASCII entry starting");
    info!("Button 1: enter 0 | Button 2: enter 1 | Button 3: clear | Button 4: save/send");
    info!("Hold buttons 1 and 2 for 3 s to enter standby");

    // ── USB serial ──────────────────────────────────────────────────
    let serial = usb::serial::init(p.USBD);
    spawner.must_spawn(usb_task(serial.device));
    spawner.must_spawn(serial_task(serial.class));

    // ── Buttons (active-low, internal pull-ups) ─────────────────────
    let buttons = ButtonBank::active_low(
        [
            Input::new(p.P0_11, Pull::Up),
            Input::new(p.P0_12, Pull::Up),
            Input::new(p.P0_24, Pull::Up),
            Input::new(p.P0_25, Pull::Up),
        ],
        config::BUTTON_DEBOUNCE_TICKS,
    );

    // ── LEDs on PWM0, channel order matches `Led` ───────────────────
    let pwm = SimplePwm::new_4ch(p.PWM0, p.P0_13, p.P0_14, p.P0_15, p.P0_16);
    let leds = PwmLeds::new(pwm);

    let sink = ChannelSink::new(TRANSMIT_CHANNEL.sender());

    let mut machine = Machine::new(Io::new(buttons, leds, sink), EmbassyClock);
    machine.init();

    let mut ticker = Ticker::every(Duration::from_millis(config::TICK_PERIOD_MS));
    loop {
        machine.io_mut().buttons.sample();
        machine.tick();
        ticker.next().await;
    }
}
