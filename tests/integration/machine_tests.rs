//! Integration tests for the SystemService → Machine → board pipeline.
//!
//! These drive the public service API the way the input loop does and
//! assert on the recorded output history.

use std::time::Duration;

use ventfan::app::ports::Color;
use ventfan::app::service::SystemService;
use ventfan::config::DeviceConfig;
use ventfan::error::ConfigError;
use ventfan::events::{Event, PressInfo};
use ventfan::fsm::State;
use ventfan::fsm::guards::Guard;
use ventfan::fsm::states::Action;

use crate::mock_hw::{Call, Hook, HookTrace, MockBoard};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn held(v: u64) -> PressInfo {
    PressInfo::long(ms(v))
}

fn make_service() -> SystemService<MockBoard> {
    SystemService::new(DeviceConfig::default(), MockBoard::new()).unwrap()
}

fn powered_on() -> SystemService<MockBoard> {
    let service = make_service();
    assert!(service.request_power_on());
    service.with_hardware(|hw| hw.calls.clear());
    service
}

// ── Walkthrough ───────────────────────────────────────────────

#[test]
fn power_on_ramp_strobe_power_off_walkthrough() {
    let service = make_service();
    assert_eq!(service.state(), State::Off);

    service.request_power_on();
    assert_eq!(service.state(), State::ManualMode);
    assert_eq!(service.fan_level(), 0);

    for _ in 0..5 {
        service.plus_button_pressed(Duration::ZERO);
    }
    assert_eq!(service.fan_level(), 5);

    service.both_buttons_pressed(held(3000), held(3000));
    assert_eq!(service.state(), State::ManualMode);
    assert!(service.with_hardware(|hw| hw.strobe_on()));

    service.both_buttons_pressed(held(6000), held(6000));
    assert_eq!(service.state(), State::ShutDown);
    assert_eq!(service.fan_level(), 0);

    service.with_hardware(|hw| {
        assert!(!hw.strobe_on());
        assert_eq!(hw.last_fan_speed(), Some(0));
        assert!(hw.calls.contains(&Call::SetColor(Color::SHUTTING_DOWN)));
        assert!(hw.calls.contains(&Call::WakeFromButtons));
        assert_eq!(hw.last_call(), Some(&Call::Halt));
    });
}

#[test]
fn startup_runs_blinks_then_limits_then_zero_speed() {
    let service = make_service();
    service.request_power_on();

    let calls = service.with_hardware(|hw| hw.calls.clone());
    let blink = [Call::SetColor(Color::STARTUP), Call::IndicatorOff];
    assert_eq!(&calls[..2], &blink);
    assert_eq!(&calls[2..4], &blink);
    assert_eq!(&calls[4..6], &blink);
    assert_eq!(
        &calls[6..],
        &[Call::FanLimits { min: 50, max: 255 }, Call::FanSpeed(0)]
    );
    let slept = service.with_hardware(|hw| hw.slept_ns);
    assert_eq!(slept, 6 * 50 * 1_000_000);
}

#[test]
fn second_power_on_is_discarded() {
    let service = powered_on();
    assert!(!service.request_power_on());
    assert_eq!(service.state(), State::ManualMode);
    assert!(service.with_hardware(|hw| hw.calls.is_empty()));
}

#[test]
fn buttons_before_power_on_are_discarded() {
    let service = make_service();
    assert!(!service.plus_button_pressed(ms(100)));
    assert!(!service.minus_button_pressed(ms(100)));
    assert_eq!(service.state(), State::Off);
    assert!(service.with_hardware(|hw| hw.calls.is_empty()));
}

// ── Fan ramp ──────────────────────────────────────────────────

#[test]
fn held_plus_accelerates() {
    let service = powered_on();
    service.plus_button_pressed(ms(1200));
    assert_eq!(service.fan_level(), 3);
    service.plus_button_pressed(ms(10_000));
    assert_eq!(service.fan_level(), 8);
}

#[test]
fn plus_at_top_shows_limit_colour() {
    let service = powered_on();
    for _ in 0..30 {
        service.plus_button_pressed(ms(5000));
    }
    assert_eq!(service.fan_level(), 100);

    service.with_hardware(|hw| hw.calls.clear());
    service.plus_button_pressed(Duration::ZERO);
    assert_eq!(service.fan_level(), 100);
    service.with_hardware(|hw| {
        assert_eq!(
            hw.calls,
            [
                Call::FanSpeed(100),
                Call::SetColor(Color::LIMIT),
                Call::IndicatorOff
            ]
        );
    });
}

#[test]
fn minus_steps_down_by_one_regardless_of_duration() {
    let service = powered_on();
    for _ in 0..3 {
        service.plus_button_pressed(Duration::ZERO);
    }
    service.minus_button_pressed(ms(10_000));
    assert_eq!(service.fan_level(), 2);
    service.with_hardware(|hw| {
        assert!(hw.calls.ends_with(&[
            Call::FanSpeed(2),
            Call::SetColor(Color::RAMP_DOWN),
            Call::IndicatorOff
        ]));
    });
}

#[test]
fn minus_to_zero_shows_limit_colour() {
    let service = powered_on();
    service.plus_button_pressed(Duration::ZERO);
    service.minus_button_pressed(Duration::ZERO);
    service.minus_button_pressed(Duration::ZERO);
    assert_eq!(service.fan_level(), 0);
    service.with_hardware(|hw| {
        assert_eq!(hw.count(&Call::SetColor(Color::LIMIT)), 2);
    });
}

// ── Chords ────────────────────────────────────────────────────

#[test]
fn strobe_toggles_back_off() {
    let service = powered_on();
    service.both_buttons_pressed(held(1500), held(1500));
    service.both_buttons_pressed(held(1500), held(1500));
    assert_eq!(service.state(), State::ManualMode);
    service.with_hardware(|hw| {
        assert!(!hw.strobe_on());
        assert_eq!(
            hw.calls,
            [
                Call::StrobeOn {
                    intensity: 255,
                    period: ms(100)
                },
                Call::StrobeOff
            ]
        );
    });
}

#[test]
fn brief_chord_is_discarded() {
    let service = powered_on();
    assert!(!service.both_buttons_pressed(PressInfo::short(ms(300)), PressInfo::short(ms(300))));
    assert!(!service.both_buttons_pressed(held(900), held(900)));
    assert!(service.with_hardware(|hw| hw.calls.is_empty()));
}

#[test]
fn lopsided_chord_uses_the_shorter_hold() {
    let service = powered_on();
    service.both_buttons_pressed(held(8000), held(2000));
    assert_eq!(service.state(), State::ManualMode);
    assert!(service.with_hardware(|hw| hw.strobe_on()));
}

#[test]
fn power_off_from_off_state() {
    let service = make_service();
    service.both_buttons_pressed(held(5000), held(5000));
    assert_eq!(service.state(), State::ShutDown);
    assert!(service.with_hardware(|hw| hw.halted()));
}

#[test]
fn power_off_sequence_order() {
    let service = powered_on();
    service.both_buttons_pressed(held(5000), held(5000));
    let settle = DeviceConfig::default().timing.power_off_settle_iterations;
    service.with_hardware(|hw| {
        assert_eq!(
            hw.calls,
            [
                Call::SuspendScheduling,
                Call::MaskInterrupts,
                Call::SetColor(Color::SHUTTING_DOWN),
                Call::StrobeOff,
                Call::FanSpeed(0),
                Call::Settle(settle),
                Call::WakeFromButtons,
                Call::IndicatorOff,
                Call::Halt,
            ]
        );
    });
}

#[test]
fn shut_down_discards_everything() {
    let service = powered_on();
    service.both_buttons_pressed(held(6000), held(6000));
    service.with_hardware(|hw| hw.calls.clear());

    assert!(!service.request_power_on());
    assert!(!service.plus_button_pressed(Duration::ZERO));
    assert!(!service.minus_button_pressed(Duration::ZERO));
    assert!(!service.both_buttons_pressed(held(2000), held(2000)));
    assert!(!service.both_buttons_pressed(held(6000), held(6000)));

    assert_eq!(service.state(), State::ShutDown);
    assert!(service.with_hardware(|hw| hw.calls.is_empty()));
}

// ── Observer ──────────────────────────────────────────────────

#[test]
fn observer_sees_hooks_in_order() {
    let service =
        SystemService::with_observer(DeviceConfig::default(), MockBoard::new(), HookTrace::default())
            .unwrap();
    service.request_power_on();
    service.process_event(Event::BothButtonsPressed {
        plus: held(2000),
        minus: held(2000),
    });
    service.minus_button_pressed(Duration::ZERO);

    let machine = service.into_inner();
    assert_eq!(
        machine.observer().hooks,
        [
            Hook::Process(State::Off, "request_power_on"),
            Hook::Action(Action::Startup),
            Hook::Transition(State::Off, State::On),
            Hook::Transition(State::On, State::ManualMode),
            Hook::Process(State::ManualMode, "both_buttons_pressed"),
            Hook::Guard(Guard::PowerOffHold, false),
            Hook::Guard(Guard::ToggleStrobeHold, true),
            Hook::Action(Action::ToggleStrobe),
            Hook::Process(State::ManualMode, "minus_button_pressed"),
            Hook::Action(Action::DecreaseFan),
        ]
    );
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = DeviceConfig::default();
    config.thresholds.both_buttons_toggle_strobe_hold_ms = 6000;
    assert!(matches!(
        SystemService::new(config, MockBoard::new()),
        Err(ConfigError::ValidationFailed(_))
    ));
}

#[test]
fn custom_thresholds_from_json() {
    let config = DeviceConfig::from_json(
        r#"{ "thresholds": { "both_buttons_power_off_hold_ms": 3000,
                             "both_buttons_toggle_strobe_hold_ms": 500 } }"#,
    )
    .unwrap();
    let service = SystemService::new(config, MockBoard::new()).unwrap();
    service.request_power_on();
    service.both_buttons_pressed(held(3000), held(3000));
    assert_eq!(service.state(), State::ShutDown);
}
