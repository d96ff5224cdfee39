//! USB CDC-ACM serial port.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and forwards transmitted strings from the state machine to
//! the host.

use bit2ascii::config;
use bit2ascii::transmit::transmission_line;
use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Receiver;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::board::Text;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static CDC_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Build result containing the USB device runner and the serial class.
pub struct UsbSerial {
    pub device: UsbDevice<'static, UsbDriver>,
    pub class: CdcAcmClass<'static, UsbDriver>,
}

/// Initialise the USB stack and create the CDC-ACM device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbSerial {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Required for Windows to bind the CDC driver to the IAD.
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let state = CDC_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, config::USB_SERIAL_PACKET_SIZE);

    let device = builder.build();

    info!("USB CDC-ACM serial device initialised");

    UsbSerial { device, class }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Serial forwarding task - frames each transmitted string and writes it
/// to the host once a terminal has the port open.
///
/// Strings confirmed while no terminal is attached are dropped.
pub async fn serial_writer_task(
    mut class: CdcAcmClass<'static, UsbDriver>,
    text_rx: Receiver<'static, CriticalSectionRawMutex, Text, { config::TRANSMIT_QUEUE_DEPTH }>,
) -> ! {
    info!("Serial writer task started - waiting for strings");

    loop {
        let text = text_rx.receive().await;

        if !class.dtr() {
            warn!("No terminal attached, dropping \"{=[u8]:a}\"", text.as_slice());
            continue;
        }

        let line = transmission_line(&text);
        if let Err(e) = write_line(&mut class, &line).await {
            warn!("USB serial write failed: {}", e);
        }
    }
}

/// Write `line` in max-size packets, closing with a zero-length packet when
/// the last one is full so the host flushes it.
async fn write_line(
    class: &mut CdcAcmClass<'static, UsbDriver>,
    line: &[u8],
) -> Result<(), EndpointError> {
    let packet_size = usize::from(class.max_packet_size());
    for chunk in line.chunks(packet_size) {
        class.write_packet(chunk).await?;
    }
    if line.len() % packet_size == 0 {
        class.write_packet(&[]).await?;
    }
    Ok(())
}
