//! nRF52840 glue: PWM-driven LEDs, the embassy tick clock and the channel
//! that hands transmitted strings to the USB task.

use bit2ascii::config::{LED_ACTIVE_LOW, PWM_MAX, STRING_CAPACITY, TRANSMIT_QUEUE_DEPTH};
use bit2ascii::{Clock, Led, Leds, Level, Tick, TransmitSink};
use defmt::warn;
use embassy_nrf::peripherals;
use embassy_nrf::pwm::{Prescaler, SimplePwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::Instant;

/// A transmitted string on its way to the serial task.
pub type Text = heapless::Vec<u8, STRING_CAPACITY>;

/// Counter top for the PWM peripheral; one percent is 100 counts.
const PWM_TOP: u16 = 10_000;

/// The four LEDs on one PWM instance, channel `n` driving `Led` index `n`.
pub struct PwmLeds {
    pwm: SimplePwm<'static, peripherals::PWM0>,
}

impl PwmLeds {
    pub fn new(mut pwm: SimplePwm<'static, peripherals::PWM0>) -> Self {
        // 16 MHz / 16 / 10_000 = 100 Hz, fast enough to avoid visible flicker.
        pwm.set_prescaler(Prescaler::Div16);
        pwm.set_max_duty(PWM_TOP);
        let mut leds = Self { pwm };
        leds.all_off();
        leds
    }

    fn write(&mut self, led: Led, percent: u8) {
        let on = u32::from(percent.min(PWM_MAX)) * u32::from(PWM_TOP) / u32::from(PWM_MAX);
        let on = on as u16;
        // SimplePwm counts the "low" share of the period.
        let duty = if LED_ACTIVE_LOW { on } else { PWM_TOP - on };
        self.pwm.set_duty(led.index(), duty);
    }
}

impl Leds for PwmLeds {
    fn set_level(&mut self, led: Led, level: Level) {
        let percent = match level {
            Level::On => PWM_MAX,
            Level::Off => 0,
        };
        self.write(led, percent);
    }

    fn set_duty(&mut self, led: Led, percent: u8) {
        self.write(led, percent);
    }
}

/// Milliseconds since boot, truncated to the 32-bit tick counter.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> Tick {
        Tick(Instant::now().as_millis() as u32)
    }
}

/// Queues transmitted strings for the USB serial task.
///
/// Never blocks the tick loop: when the queue is full the string is dropped
/// with a warning.
pub struct ChannelSink {
    tx: Sender<'static, CriticalSectionRawMutex, Text, TRANSMIT_QUEUE_DEPTH>,
}

impl ChannelSink {
    pub fn new(tx: Sender<'static, CriticalSectionRawMutex, Text, TRANSMIT_QUEUE_DEPTH>) -> Self {
        Self { tx }
    }
}

impl TransmitSink for ChannelSink {
    fn emit(&mut self, text: &[u8]) {
        let mut queued = Text::new();
        let _ = queued.extend_from_slice(&text[..text.len().min(STRING_CAPACITY)]);
        if self.tx.try_send(queued).is_err() {
            warn!("Transmit queue full, string dropped");
        }
    }
}
