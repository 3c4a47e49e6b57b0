//! Producers on several threads share one service.
//!
//! The event lock must keep each action's output writes contiguous and
//! every event must be applied exactly once.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ventfan::app::ports::Color;
use ventfan::app::service::SystemService;
use ventfan::config::DeviceConfig;
use ventfan::events::PressInfo;
use ventfan::fsm::State;

use crate::mock_hw::{Call, MockBoard};

const THREADS: usize = 4;
const PRESSES: usize = 10;

fn shared_service_at(level: u8) -> Arc<SystemService<MockBoard>> {
    let service = SystemService::new(DeviceConfig::default(), MockBoard::new()).unwrap();
    service.request_power_on();
    for _ in 0..level {
        service.plus_button_pressed(Duration::ZERO);
    }
    service.with_hardware(|hw| hw.calls.clear());
    Arc::new(service)
}

/// Split a call log into per-action runs, each ending in `IndicatorOff`.
fn fan_action_runs(calls: &[Call]) -> Vec<&[Call]> {
    calls
        .split_inclusive(|c| *c == Call::IndicatorOff)
        .filter(|run| !run.is_empty())
        .collect()
}

#[test]
fn concurrent_plus_and_minus_never_interleave() {
    let service = shared_service_at(50);

    let mut handles = Vec::new();
    for i in 0..THREADS * 2 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for _ in 0..PRESSES {
                if i % 2 == 0 {
                    service.plus_button_pressed(Duration::ZERO);
                } else {
                    service.minus_button_pressed(Duration::ZERO);
                }
            }
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    // Level stays inside (0, 100) throughout, so every step is applied.
    assert_eq!(service.fan_level(), 50);

    let calls = service.with_hardware(|hw| hw.calls.clone());
    let runs = fan_action_runs(&calls);
    assert_eq!(runs.len(), THREADS * 2 * PRESSES);
    for run in runs {
        assert_eq!(run.len(), 3, "interleaved action: {:?}", run);
        assert!(matches!(run[0], Call::FanSpeed(_)));
        assert!(matches!(
            run[1],
            Call::SetColor(Color::RAMP_UP) | Call::SetColor(Color::RAMP_DOWN)
        ));
    }
}

#[test]
fn power_off_races_with_fan_presses() {
    let service = shared_service_at(10);

    let presser = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for _ in 0..50 {
                service.plus_button_pressed(Duration::ZERO);
            }
        })
    };
    let hold = PressInfo::long(Duration::from_secs(6));
    service.both_buttons_pressed(hold, hold);
    presser.join().unwrap();

    assert_eq!(service.state(), State::ShutDown);
    assert_eq!(service.fan_level(), 0);
    service.with_hardware(|hw| {
        assert_eq!(hw.count(&Call::Halt), 1);
        assert_eq!(hw.last_call(), Some(&Call::Halt), "nothing runs after the halt");
    });
}
