//! Boot → provisioning → warmup → calibration → monitoring, driven
//! through `AppService::tick` with a simulated clock.

use gaswatch::app::events::Notification;
use gaswatch::app::service::TickOutcome;
use gaswatch::error::{Error, InitFault, SensorError};
use gaswatch::fsm::Phase;

use super::mock_hw::{Rig, owner_config};

/// Boot, provision one minute of warmup and run until Monitoring.
fn monitoring_rig(gas: u16) -> Rig {
    let mut rig = Rig::new(gas);
    rig.boot().unwrap();
    rig.send("1");
    rig.tick();
    rig.run_until(250, 200_000, |r| r.app.phase() == Phase::Monitoring);
    rig
}

fn is_active(rig: &Rig) -> bool {
    rig.app.lifecycle().alert_state().active
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_prompts_for_warmup_and_waits() {
    let mut rig = Rig::new(300);
    rig.boot().unwrap();

    assert_eq!(rig.sink.sent, vec![Notification::ProvisioningPrompt]);

    rig.run_for(10 * 60_000, 1000);
    assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
    assert_eq!(rig.hw.reads, 1, "only the cold boot read happens before provisioning");
}

#[test]
fn implausible_sensor_halts_for_good() {
    let mut rig = Rig::new(4095);
    let r = rig.boot();

    assert_eq!(r, Err(Error::Init(InitFault::SensorImplausible(Some(4095)))));
    assert!(matches!(rig.sink.sent.last(), Some(Notification::Fault(_))));
    assert!(rig.hw.alert);

    rig.hw.gas = Ok(300);
    rig.send("1");
    rig.hw.alert = false;
    for _ in 0..10 {
        assert_eq!(rig.step(1000), TickOutcome::Halted);
    }
    assert_eq!(rig.app.phase(), Phase::Halted);
    assert!(rig.hw.alert, "halted tick re-lights the alert LED");
}

#[test]
fn network_failure_at_boot_halts() {
    let mut rig = Rig::new(300);
    rig.net.up = false;

    assert_eq!(rig.boot(), Err(Error::Init(InitFault::ConnectivityUnavailable)));
    assert_eq!(rig.app.phase(), Phase::Halted);
    assert!(
        !rig.sink
            .sent
            .contains(&Notification::ProvisioningPrompt)
    );
}

// ── Warmup and calibration ────────────────────────────────────

#[test]
fn warmup_lasts_the_provisioned_minutes() {
    let mut rig = Rig::new(300);
    rig.boot().unwrap();
    rig.send("2");
    rig.tick();

    assert_eq!(rig.app.phase(), Phase::Warmup);
    assert!(rig.sink.sent.contains(&Notification::ProvisioningAccepted { minutes: 2 }));

    rig.run_for(119_000, 1000);
    assert_eq!(rig.app.phase(), Phase::Warmup);
    rig.step(1000);
    assert_eq!(rig.app.phase(), Phase::CalibratingBaseline);
    assert!(rig.sink.sent.contains(&Notification::SensorReady));
}

#[test]
fn calibration_produces_baseline_and_short_beep() {
    let rig = monitoring_rig(300);

    let baseline = rig.app.lifecycle().baseline().unwrap();
    assert_eq!(baseline.value, 300);
    assert_eq!(rig.app.lifecycle().threshold(), Some(750));
    assert!(
        rig.sink
            .sent
            .contains(&Notification::BaselineCalibrated { baseline: 300 })
    );
    assert_eq!(rig.hw.beeps(), vec![rig.app.lifecycle().config().calibrated_beep_ms]);
}

#[test]
fn calibration_without_samples_uses_fallback() {
    let mut rig = Rig::new(300);
    rig.boot().unwrap();
    rig.send("1");
    rig.tick();
    rig.hw.gas = Err(SensorError::AdcReadFailed);
    rig.run_until(250, 200_000, |r| r.app.phase() == Phase::Monitoring);

    assert_eq!(rig.app.lifecycle().baseline().map(|b| b.value), Some(400));
}

// ── Monitoring ────────────────────────────────────────────────

#[test]
fn each_read_pulses_status_led() {
    let mut rig = monitoring_rig(300);
    rig.step(250);
    assert!(rig.hw.status);
    rig.step(250);
    assert!(!rig.hw.status);
}

#[test]
fn leak_alerts_repeat_then_normalize() {
    let mut rig = monitoring_rig(300);
    rig.run_for(5000, 250);
    assert_eq!(rig.sink.leak_alerts(), 0);

    rig.hw.gas = Ok(900);
    rig.run_until(250, 2000, is_active);
    assert_eq!(rig.sink.leak_alerts(), 1);
    assert!(rig.hw.alert);
    assert!(rig.hw.buzzer);
    assert!(
        rig.sink
            .last_text()
            .unwrap()
            .contains("reading=900")
    );

    rig.run_for(59_750, 250);
    assert_eq!(rig.sink.leak_alerts(), 1, "no repeat inside the interval");
    rig.step(250);
    assert_eq!(rig.sink.leak_alerts(), 2);

    rig.hw.gas = Ok(300);
    rig.run_until(250, 2000, |r| !is_active(r));
    assert_eq!(rig.sink.count(|n| *n == Notification::Normalized), 1);
    assert!(!rig.hw.alert);
    assert!(!rig.hw.buzzer);

    rig.run_for(180_000, 1000);
    assert_eq!(rig.sink.leak_alerts(), 2);
    assert_eq!(rig.sink.count(|n| *n == Notification::Normalized), 1);
}

#[test]
fn reading_equal_to_threshold_does_not_alert() {
    let mut rig = monitoring_rig(300);
    rig.hw.gas = Ok(750);
    rig.run_for(10_000, 250);
    assert!(!is_active(&rig));
    assert_eq!(rig.sink.leak_alerts(), 0);
}

#[test]
fn failed_reads_are_skipped() {
    let mut rig = monitoring_rig(300);
    rig.run_for(3000, 1000);
    let recorded = rig.app.lifecycle().history().len();

    rig.hw.gas = Err(SensorError::AdcReadFailed);
    rig.run_for(5000, 1000);

    assert_eq!(rig.app.phase(), Phase::Monitoring);
    assert_eq!(rig.app.lifecycle().history().len(), recorded);
    assert!(!is_active(&rig));
}

// ── Recalibration ─────────────────────────────────────────────

#[test]
fn periodic_recalibration_absorbs_sustained_level() {
    let mut config = owner_config();
    config.recalibration_period_ms = 300_000;
    let mut rig = Rig::with_config(config, 300);
    rig.boot().unwrap();
    rig.send("1");
    rig.tick();
    rig.run_until(250, 200_000, |r| r.app.phase() == Phase::Monitoring);
    let first = rig.app.lifecycle().baseline().unwrap();

    rig.hw.gas = Ok(900);
    rig.run_until(250, 2000, is_active);

    rig.run_until(250, 310_000, |r| r.app.phase() == Phase::CalibratingBaseline);
    assert!(rig.sink.sent.contains(&Notification::Recalibrating));
    assert!(rig.clock.now() >= first.established_at_ms + 300_000);
    assert!(!rig.hw.alert, "alert outputs are silenced while calibrating");
    assert!(!rig.hw.buzzer);

    rig.run_until(250, 70_000, |r| r.app.phase() == Phase::Monitoring);
    assert_eq!(rig.app.lifecycle().baseline().map(|b| b.value), Some(900));

    rig.run_until(250, 2000, |r| !is_active(r));
    assert_eq!(rig.sink.count(|n| *n == Notification::Normalized), 1);
}

// ── Connectivity ──────────────────────────────────────────────

#[test]
fn link_loss_while_monitoring_leaves_lifecycle_alone() {
    let mut rig = monitoring_rig(300);
    rig.net.up = false;
    let polls = rig.net.polls;
    let reads = rig.hw.reads;

    for i in 1..=5 {
        rig.step(1000);
        assert_eq!(rig.net.polls, polls + i, "connectivity is serviced every tick");
    }
    assert_eq!(rig.net.reconnect_attempts, 5);
    assert_eq!(rig.app.phase(), Phase::Monitoring);
    assert_eq!(rig.hw.reads, reads + 5);

    rig.hw.gas = Ok(900);
    rig.step(1000);
    assert!(is_active(&rig));
    assert_eq!(rig.sink.leak_alerts(), 1);

    rig.net.up = true;
    rig.run_for(5000, 1000);
    assert_eq!(rig.net.reconnect_attempts, 6);
    assert_eq!(rig.app.phase(), Phase::Monitoring);
}
