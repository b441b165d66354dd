//! Chat command handling: provisioning replies, `/status`, `/reset` and
//! sender filtering.

use gaswatch::app::events::Notification;
use gaswatch::app::service::TickOutcome;
use gaswatch::fsm::Phase;

use super::mock_hw::Rig;

fn booted() -> Rig {
    let mut rig = Rig::new(300);
    rig.boot().unwrap();
    rig
}

fn monitoring() -> Rig {
    let mut rig = booted();
    rig.send("1");
    rig.tick();
    rig.run_until(250, 200_000, |r| r.app.phase() == Phase::Monitoring);
    rig
}

fn last_status(rig: &Rig) -> Option<String> {
    rig.sink.sent.iter().rev().find_map(|n| match n {
        Notification::Status(_) => Some(n.to_string()),
        _ => None,
    })
}

// ── Provisioning dialogue ─────────────────────────────────────

#[test]
fn invalid_replies_are_rejected_until_a_valid_one_arrives() {
    let mut rig = booted();

    for reply in ["soon", "0", "-5", "zero minutes"] {
        rig.send(reply);
        rig.step(1000);
        assert_eq!(rig.sink.sent.last(), Some(&Notification::ProvisioningRejected));
        assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
    }

    rig.send("warm up for 15 minutes");
    rig.step(1000);
    assert_eq!(
        rig.sink.sent.last(),
        Some(&Notification::ProvisioningAccepted { minutes: 15 })
    );
    assert_eq!(rig.app.phase(), Phase::Warmup);
}

#[test]
fn reply_with_digits_inside_text_is_accepted() {
    let mut rig = booted();
    rig.send("warmup=2000min");
    rig.step(1000);

    assert_eq!(
        rig.sink.sent.last(),
        Some(&Notification::ProvisioningAccepted { minutes: 2000 })
    );
    assert_eq!(rig.app.lifecycle().config().warmup_duration_ms, 2000 * 60_000);
}

#[test]
fn late_provisioning_reply_is_ignored() {
    let mut rig = booted();
    rig.send("1");
    rig.step(1000);
    let sent = rig.sink.sent.len();

    rig.send("30");
    rig.step(1000);
    assert_eq!(rig.sink.sent.len(), sent);
    assert_eq!(rig.app.lifecycle().config().warmup_duration_ms, 60_000);
}

// ── /status ───────────────────────────────────────────────────

#[test]
fn status_reports_average_of_recent_readings() {
    let mut rig = monitoring();
    for v in [100, 120, 100, 120, 100, 120, 100, 120, 100, 120] {
        rig.hw.gas = Ok(v);
        rig.step(1000);
    }

    rig.send("/status");
    rig.step(1000);

    let text = last_status(&rig).unwrap();
    assert!(text.contains("reading: 120"), "{text}");
    assert!(text.contains("average: 110"), "{text}");
    assert!(text.contains("baseline: 300"), "{text}");
    assert!(text.contains("threshold: 750"), "{text}");
    assert!(text.contains("ping: 42 ms"), "{text}");
}

#[test]
fn status_reports_minus_one_when_ping_fails() {
    let mut rig = monitoring();
    rig.net.latency_ms = None;

    rig.send("/status");
    rig.step(1000);

    assert!(last_status(&rig).unwrap().contains("ping: -1 ms"));
    assert_eq!(rig.net.pings, 1);
}

#[test]
fn status_works_before_provisioning() {
    let mut rig = booted();
    rig.send("/status");
    rig.step(1000);

    let text = last_status(&rig).unwrap();
    assert!(text.contains("baseline: n/a"), "{text}");
    assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
}

// ── /reset ────────────────────────────────────────────────────

#[test]
fn reset_acknowledges_and_requests_restart() {
    let mut rig = monitoring();
    rig.send("/reset");
    rig.send("/status");

    assert_eq!(rig.step(1000), TickOutcome::RestartRequested);
    assert_eq!(rig.sink.sent.last(), Some(&Notification::ResetAck));
    assert_eq!(rig.inbox.pending(), 1, "messages after /reset stay queued");
}

#[test]
fn bot_suffix_is_accepted() {
    let mut rig = monitoring();
    rig.send("/reset@gaswatch_bot");
    assert_eq!(rig.step(1000), TickOutcome::RestartRequested);
}

// ── Filtering ─────────────────────────────────────────────────

#[test]
fn unauthorized_sender_is_ignored() {
    let mut rig = booted();
    rig.inbox.push("999", "/reset");
    rig.inbox.push("999", "5");

    assert_eq!(rig.step(1000), TickOutcome::Continue);
    assert_eq!(rig.sink.sent, vec![Notification::ProvisioningPrompt]);
    assert_eq!(rig.app.phase(), Phase::AwaitingConfiguration);
}

#[test]
fn unknown_text_while_monitoring_is_ignored() {
    let mut rig = monitoring();
    let sent = rig.sink.sent.len();

    rig.send("hello");
    rig.send("/STATUS");
    rig.step(1000);

    assert_eq!(rig.sink.sent.len(), sent);
}

#[test]
fn halted_device_ignores_commands() {
    let mut rig = Rig::new(10);
    assert!(rig.boot().is_err());
    let sent = rig.sink.sent.len();

    rig.send("/status");
    rig.send("/reset");
    for _ in 0..5 {
        assert_eq!(rig.step(1000), TickOutcome::Halted);
    }
    assert_eq!(rig.sink.sent.len(), sent);
    assert_eq!(rig.net.pings, 0);
}

#[test]
fn commands_are_polled_at_the_configured_interval() {
    let mut rig = booted();
    rig.tick();
    rig.send("/status");

    rig.step(500);
    assert!(last_status(&rig).is_none());
    rig.step(500);
    assert!(last_status(&rig).is_some());
}
