//! End-to-end poller behaviour against a fake supervision layer.

use std::sync::Arc;
use std::time::Duration;

use svwatch::config::ProbeFailurePolicy;
use svwatch::lifecycle::Shutdown;
use svwatch::monitor::{MonitorError, Poller};
use svwatch::probe::ProbeError;

mod common;

use common::{config_for, down_line, service_dir, up_line, FakeSupervisor, PAGER, SVSTAT};

fn poller(config: &svwatch::MonitorConfig, runner: &Arc<FakeSupervisor>) -> Poller {
    Poller::new(config, runner.clone(), runner.clone()).unwrap()
}

#[tokio::test]
async fn test_alert_fires_on_sixth_short_tick() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    let mut alert_ticks = Vec::new();
    for tick in 1..=6 {
        runner.push_lines(&[up_line(dir.path(), "web", 5)]);
        let report = poller.tick().await.unwrap();
        if report.service("web").unwrap().alerted {
            alert_ticks.push(tick);
        }
    }

    // The verdict uses the history before each tick, so five samples exist
    // only once tick 6 begins.
    assert_eq!(alert_ticks, vec![6]);
    assert_eq!(
        runner.calls_to(PAGER),
        vec![vec!["web".to_string(), "5,5,5,5,5".to_string()]]
    );
}

#[tokio::test]
async fn test_one_alert_per_episode() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    // Prime five short samples, then ten ticks that are all judged flapping.
    for _ in 0..5 {
        runner.push_lines(&[up_line(dir.path(), "web", 3)]);
        poller.tick().await.unwrap();
    }

    let mut alerts = 0;
    for _ in 0..10 {
        runner.push_lines(&[up_line(dir.path(), "web", 3)]);
        let report = poller.tick().await.unwrap();
        let web = report.service("web").unwrap();
        assert!(web.flapping);
        alerts += report.alerts().count();
    }

    assert_eq!(alerts, 1);
    assert_eq!(runner.calls_to(PAGER).len(), 1);
}

#[tokio::test]
async fn test_alert_carries_newest_first_uptimes() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    for uptime in [1, 2, 3, 4, 5, 6] {
        runner.push_lines(&[up_line(dir.path(), "web", uptime)]);
        poller.tick().await.unwrap();
    }

    assert_eq!(
        runner.calls_to(PAGER),
        vec![vec!["web".to_string(), "5,4,3,2,1".to_string()]]
    );
    assert_eq!(poller.service_state("web").unwrap().history.current(), &[6, 5, 4, 3, 2]);
}

#[tokio::test]
async fn test_recovery_rearms_for_next_episode() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    // Ticks 1-6 short, tick 7 a long run, ticks 8-13 short again.
    let uptimes: Vec<u64> = std::iter::repeat(5)
        .take(6)
        .chain(std::iter::once(300))
        .chain(std::iter::repeat(5).take(6))
        .collect();

    let mut alert_ticks = Vec::new();
    for (i, uptime) in uptimes.into_iter().enumerate() {
        runner.push_lines(&[up_line(dir.path(), "web", uptime)]);
        let report = poller.tick().await.unwrap();
        if report.service("web").unwrap().alerted {
            alert_ticks.push(i + 1);
        }
    }

    // Tick 7 is still judged on five short samples, so the latch holds.
    // Tick 8 sees the 300s run and re-arms. The 300s sample ages out after
    // tick 12, so tick 13 starts a new episode.
    assert_eq!(alert_ticks, vec![6, 13]);
    assert_eq!(runner.calls_to(PAGER).len(), 2);
}

#[tokio::test]
async fn test_down_service_never_alerts() {
    let dir = service_dir(&["db"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    for _ in 0..3 {
        runner.push_lines(&[down_line(dir.path(), "db")]);
        let report = poller.tick().await.unwrap();
        assert!(!report.service("db").unwrap().status.up);
    }
    runner.push_lines(&[up_line(dir.path(), "db", 120)]);
    let report = poller.tick().await.unwrap();

    assert_eq!(report.alerts().count(), 0);
    assert!(runner.calls_to(PAGER).is_empty());
    assert_eq!(poller.service_state("db").unwrap().history.current(), &[120]);
}

#[tokio::test]
async fn test_down_ticks_leave_history_alone() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[up_line(dir.path(), "web", 10)]);
    runner.push_lines(&[down_line(dir.path(), "web")]);
    runner.push_lines(&[up_line(dir.path(), "web", 20)]);

    let mut lengths = Vec::new();
    for _ in 0..3 {
        poller.tick().await.unwrap();
        lengths.push(poller.service_state("web").unwrap().history.len());
    }

    assert_eq!(lengths, vec![1, 1, 2]);
    assert_eq!(poller.service_state("web").unwrap().history.current(), &[20, 10]);
}

#[tokio::test]
async fn test_flapping_survives_transient_down() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    for _ in 0..5 {
        runner.push_lines(&[up_line(dir.path(), "web", 4)]);
        poller.tick().await.unwrap();
    }

    // Caught between restarts: the verdict still comes from the five short runs.
    runner.push_lines(&[down_line(dir.path(), "web")]);
    let report = poller.tick().await.unwrap();
    let web = report.service("web").unwrap();
    assert!(web.flapping);
    assert!(web.alerted);

    // Down does not clear the latch, and the next up is still flapping.
    runner.push_lines(&[up_line(dir.path(), "web", 4)]);
    let report = poller.tick().await.unwrap();
    assert!(!report.service("web").unwrap().alerted);
    assert!(poller.service_state("web").unwrap().latch.is_set());
}

#[tokio::test]
async fn test_one_batched_query_per_tick() {
    let dir = service_dir(&["web", "db", "api"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[
        up_line(dir.path(), "api", 100),
        down_line(dir.path(), "db"),
        up_line(dir.path(), "web", 7),
    ]);
    let report = poller.tick().await.unwrap();

    let calls = runner.calls_to(SVSTAT);
    assert_eq!(calls.len(), 1);
    let expected: Vec<String> = ["api", "db", "web"]
        .iter()
        .map(|name| dir.path().join(name).to_string_lossy().into_owned())
        .collect();
    assert_eq!(calls[0], expected);

    let names: Vec<&str> = report.services.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["api", "db", "web"]);
    assert_eq!(report.service("web").unwrap().status.pid, Some(4007));
}

#[tokio::test]
async fn test_missing_service_fails_tick_without_updates() {
    let dir = service_dir(&["api", "web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[up_line(dir.path(), "api", 30), up_line(dir.path(), "web", 30)]);
    poller.tick().await.unwrap();

    runner.push_lines(&[up_line(dir.path(), "web", 40)]);
    let err = poller.tick().await.unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Probe(ProbeError::MissingService(ref name)) if name == "api"
    ));

    assert_eq!(poller.service_state("web").unwrap().history.current(), &[30]);
    assert_eq!(poller.service_state("api").unwrap().history.current(), &[30]);
}

#[tokio::test]
async fn test_malformed_line_fails_tick_without_updates() {
    let dir = service_dir(&["api", "web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[up_line(dir.path(), "api", 30), up_line(dir.path(), "web", 30)]);
    poller.tick().await.unwrap();

    let unreadable = format!(
        "{}: unable to open supervise/ok: file does not exist",
        dir.path().join("api").display()
    );
    runner.push_lines(&[unreadable, up_line(dir.path(), "web", 40)]);
    let err = poller.tick().await.unwrap_err();
    assert!(matches!(err, MonitorError::Probe(ProbeError::Malformed { .. })));

    assert_eq!(poller.service_state("web").unwrap().history.current(), &[30]);
    assert_eq!(poller.service_state("api").unwrap().history.current(), &[30]);
    assert!(runner.calls_to(PAGER).is_empty());
}

#[tokio::test]
async fn test_colon_in_service_name_is_tracked() {
    let dir = service_dir(&["web:8080"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[up_line(dir.path(), "web:8080", 12)]);
    let report = poller.tick().await.unwrap();

    assert_eq!(report.service("web:8080").unwrap().status.uptime_secs, Some(12));
    assert_eq!(poller.service_state("web:8080").unwrap().history.current(), &[12]);
}

#[tokio::test]
async fn test_failed_status_command_is_probe_failure() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_failure(1, "svstat: fatal: unable to chdir");
    let err = poller.tick().await.unwrap_err();

    assert!(matches!(
        err,
        MonitorError::Probe(ProbeError::CommandFailed { exit_code: Some(1), .. })
    ));
    assert!(poller.service_state("web").is_none());
}

#[tokio::test]
async fn test_alert_failure_is_contained() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::with_alert_exit_code(1);
    let mut poller = poller(&config_for(dir.path()), &runner);

    for _ in 0..6 {
        runner.push_lines(&[up_line(dir.path(), "web", 1)]);
        poller.tick().await.unwrap();
    }

    assert_eq!(runner.calls_to(PAGER).len(), 1);
    assert!(poller.service_state("web").unwrap().latch.is_set());
}

#[tokio::test]
async fn test_without_alert_command_only_logs() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut config = config_for(dir.path());
    config.alert.command = None;
    let mut poller = poller(&config, &runner);

    let mut alerted = false;
    for _ in 0..6 {
        runner.push_lines(&[up_line(dir.path(), "web", 1)]);
        alerted |= poller.tick().await.unwrap().alerts().count() > 0;
    }

    assert!(alerted);
    assert!(runner.calls_to(PAGER).is_empty());
}

#[tokio::test]
async fn test_empty_directory_skips_probe() {
    let dir = service_dir(&[]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    let report = poller.tick().await.unwrap();
    assert!(report.services.is_empty());
    assert!(runner.calls_to(SVSTAT).is_empty());
}

#[tokio::test]
async fn test_new_service_picked_up_next_tick() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut poller = poller(&config_for(dir.path()), &runner);

    runner.push_lines(&[up_line(dir.path(), "web", 9)]);
    poller.tick().await.unwrap();

    std::fs::create_dir(dir.path().join("db")).unwrap();
    runner.push_lines(&[up_line(dir.path(), "db", 1), up_line(dir.path(), "web", 19)]);
    let report = poller.tick().await.unwrap();

    assert_eq!(report.services.len(), 2);
    assert_eq!(poller.service_state("db").unwrap().history.current(), &[1]);
}

#[tokio::test]
async fn test_exit_policy_stops_run_loop() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let mut config = config_for(dir.path());
    config.monitor.on_probe_failure = ProbeFailurePolicy::Exit;
    let poller = poller(&config, &runner);

    runner.push_failure(1, "boom");
    let shutdown = Shutdown::new();
    let result = tokio::time::timeout(Duration::from_secs(5), poller.run(shutdown.subscribe()))
        .await
        .expect("run loop should stop on its own");

    assert!(matches!(result, Err(MonitorError::Probe(_))));
}

#[tokio::test]
async fn test_skip_policy_retries_until_shutdown() {
    let dir = service_dir(&["web"]);
    let runner = FakeSupervisor::new();
    let poller = poller(&config_for(dir.path()), &runner);

    runner.push_failure(1, "transient");
    runner.push_lines(&[up_line(dir.path(), "web", 50)]);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let handle = tokio::spawn(poller.run(rx));

    // Interval is one second: the failed tick, then a retry.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("run loop should honour shutdown")
        .unwrap();

    assert!(result.is_ok());
    assert!(runner.calls_to(SVSTAT).len() >= 2);
}
