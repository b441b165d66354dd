//! Property tests for the application service.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.

#![cfg(not(target_os = "espidf"))]

#[path = "integration/mock_hw.rs"]
mod mock_hw;

use gaswatch::app::events::Notification;
use gaswatch::fsm::Phase;
use mock_hw::{Rig, owner_config};
use proptest::prelude::*;

fn monitoring_rig(gas: u16) -> Rig {
    let mut rig = Rig::new(gas);
    rig.boot().unwrap();
    rig.send("1");
    rig.tick();
    rig.run_until(1000, 200_000, |r| r.app.phase() == Phase::Monitoring);
    rig
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A provisioning reply is accepted exactly when it is a positive
    /// whole number of minutes, and sets the warmup to that many minutes.
    #[test]
    fn provisioning_accepts_only_positive_minutes(n in -100i64..100_000) {
        let mut rig = Rig::new(300);
        rig.boot().unwrap();
        rig.send(&n.to_string());
        rig.tick();

        if n > 0 {
            prop_assert_eq!(rig.app.phase(), Phase::Warmup);
            prop_assert_eq!(
                rig.app.lifecycle().config().warmup_duration_ms,
                n as u64 * 60_000
            );
        } else {
            prop_assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
            prop_assert_eq!(rig.sink.sent.last(), Some(&Notification::ProvisioningRejected));
        }
    }

    /// Messages from anyone but the owner never change anything.
    #[test]
    fn strangers_cannot_drive_the_device(
        texts in proptest::collection::vec("[ -~]{0,20}", 1..10),
    ) {
        let mut rig = Rig::new(300);
        rig.boot().unwrap();
        for t in &texts {
            rig.inbox.push("4321", t);
        }
        rig.run_for(5000, 1000);

        prop_assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
        prop_assert_eq!(rig.sink.sent.len(), 1);
    }

    /// The `/status` average is the floor mean of the last ten readings.
    #[test]
    fn status_average_is_floor_mean_of_recent_readings(
        readings in proptest::collection::vec(0u16..=4095, 1..25),
    ) {
        let mut rig = monitoring_rig(300);
        for &v in &readings {
            rig.hw.gas = Ok(v);
            rig.step(1000);
        }

        let recent: Vec<u32> = readings.iter().rev().take(10).map(|&v| u32::from(v)).collect();
        let expected = recent.iter().sum::<u32>() / recent.len() as u32;
        let report = rig.app.status_report(&mut rig.net);

        prop_assert_eq!(u32::from(report.average), expected);
        prop_assert_eq!(report.latest, readings.last().copied());
    }

    /// A leak held for `span` ms produces `1 + span / repeat` alerts.
    #[test]
    fn sustained_leak_alert_count(span_s in 0u64..400) {
        let mut rig = monitoring_rig(300);
        rig.hw.gas = Ok(2000);
        rig.run_until(1000, 5000, |r| r.app.lifecycle().alert_state().active);

        rig.run_for(span_s * 1000, 1000);

        let repeat = rig.app.lifecycle().config().notification_repeat_interval_ms;
        let expected = 1 + (span_s * 1000 / repeat) as usize;
        prop_assert_eq!(rig.sink.leak_alerts(), expected);
    }
}

#[test]
fn owner_config_is_valid() {
    assert!(owner_config().validate().is_ok());
}
