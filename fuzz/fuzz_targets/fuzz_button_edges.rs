//! Fuzz target: button edges → `ButtonGestures` → `Machine`
//!
//! Each input byte encodes one edge: bit 0 = button, bit 1 = level,
//! bits 2..8 = gap to the previous edge in 50 ms units.  Verifies:
//! - No panics under arbitrary edge streams
//! - Fan level never leaves 0..=100
//! - `ShutDown` is never left once entered
//!
//! cargo fuzz run fuzz_button_edges

#![no_main]

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use ventfan::app::ports::{Color, FanPort, IndicatorPort, PlatformPort, StrobePort};
use ventfan::config::DeviceConfig;
use ventfan::drivers::button::ButtonGestures;
use ventfan::events::{Button, ButtonEdge, Event};
use ventfan::fsm::{Machine, State};

#[derive(Default)]
struct NullBoard {
    strobe: bool,
}

impl IndicatorPort for NullBoard {
    fn set_color(&mut self, _color: Color) {}
    fn indicator_off(&mut self) {}
}

impl FanPort for NullBoard {
    fn set_fan_limits(&mut self, _min: u8, _max: u8) {}
    fn set_fan_speed(&mut self, _level: u8) {}
}

impl StrobePort for NullBoard {
    fn strobe_on(&mut self, _intensity: u8, _period: Duration) {
        self.strobe = true;
    }
    fn strobe_off(&mut self) {
        self.strobe = false;
    }
    fn is_strobe_on(&self) -> bool {
        self.strobe
    }
}

impl PlatformPort for NullBoard {
    fn suspend_scheduling(&mut self) {}
    fn mask_interrupts(&mut self) {}
    fn settle(&mut self, _iterations: u32) {}
    fn enable_wake_from_buttons(&mut self) {}
    fn enter_lowest_power_halt(&mut self) {}
}

impl DelayNs for NullBoard {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let config = DeviceConfig::default();
    let mut machine = Machine::new(config, NullBoard::default());
    let mut gestures = ButtonGestures::new(config.buttons);
    machine.process_event(Event::RequestPowerOn);

    let mut now = Duration::ZERO;
    let mut shut_down = false;
    for &byte in data {
        now += Duration::from_millis(u64::from(byte >> 2) * 50);
        let button = if byte & 1 == 0 { Button::Plus } else { Button::Minus };
        let edge = ButtonEdge {
            button,
            pressed: byte & 2 != 0,
            at: now,
        };

        let events = [gestures.on_edge(edge), gestures.poll(now)];
        for event in events.into_iter().flatten() {
            machine.process_event(event);
            assert!(machine.fan_level() <= 100);
            if shut_down {
                assert_eq!(machine.state(), State::ShutDown);
            }
            shut_down |= machine.state() == State::ShutDown;
        }
    }
});
