//! Raw button edges through the gesture classifier into the service, the
//! same path the firmware input loop takes.

use std::time::Duration;

use ventfan::app::service::SystemService;
use ventfan::config::{ButtonTiming, DeviceConfig};
use ventfan::drivers::button::ButtonGestures;
use ventfan::events::{Button, ButtonEdge};
use ventfan::fsm::State;

use crate::mock_hw::MockBoard;

struct Rig {
    service: SystemService<MockBoard>,
    gestures: ButtonGestures,
}

impl Rig {
    fn powered_on() -> Self {
        let service = SystemService::new(DeviceConfig::default(), MockBoard::new()).unwrap();
        service.request_power_on();
        Self {
            service,
            gestures: ButtonGestures::new(ButtonTiming::default()),
        }
    }

    fn edge(&mut self, button: Button, pressed: bool, at_ms: u64) {
        let edge = ButtonEdge {
            button,
            pressed,
            at: Duration::from_millis(at_ms),
        };
        if let Some(event) = self.gestures.on_edge(edge) {
            self.service.process_event(event);
        }
    }

    fn poll(&mut self, at_ms: u64) {
        if let Some(event) = self.gestures.poll(Duration::from_millis(at_ms)) {
            self.service.process_event(event);
        }
    }
}

#[test]
fn taps_step_the_fan() {
    let mut rig = Rig::powered_on();
    rig.edge(Button::Plus, true, 1000);
    rig.edge(Button::Plus, false, 1050);
    rig.edge(Button::Plus, true, 1200);
    rig.edge(Button::Plus, false, 1260);
    rig.edge(Button::Minus, true, 1500);
    rig.edge(Button::Minus, false, 1540);
    assert_eq!(rig.service.fan_level(), 1);
}

#[test]
fn holding_plus_ramps_faster_over_time() {
    let mut rig = Rig::powered_on();
    rig.edge(Button::Plus, true, 0);
    for t in (10..=1000).step_by(10) {
        rig.poll(t);
    }
    rig.edge(Button::Plus, false, 1005);
    // Repeats at 100..=1000 ms held: four single steps, five double
    // steps, one triple step.
    assert_eq!(rig.service.fan_level(), 17);
}

#[test]
fn chord_held_two_seconds_toggles_strobe() {
    let mut rig = Rig::powered_on();
    rig.edge(Button::Plus, true, 0);
    rig.edge(Button::Minus, true, 30);
    for t in (100..2000).step_by(100) {
        rig.poll(t);
    }
    rig.edge(Button::Minus, false, 2030);
    rig.edge(Button::Plus, false, 2040);

    assert_eq!(rig.service.state(), State::ManualMode);
    assert_eq!(rig.service.fan_level(), 0, "chord must not leak single presses");
    assert!(rig.service.with_hardware(|hw| hw.strobe_on()));
}

#[test]
fn chord_held_past_five_seconds_powers_off() {
    let mut rig = Rig::powered_on();
    rig.edge(Button::Minus, true, 0);
    rig.edge(Button::Plus, true, 20);
    rig.edge(Button::Plus, false, 5500);
    rig.edge(Button::Minus, false, 5510);
    assert_eq!(rig.service.state(), State::ShutDown);
    assert!(rig.service.with_hardware(|hw| hw.halted()));
}
