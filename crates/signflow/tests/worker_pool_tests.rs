//! Worker pool controller against a recorded process table.

mod common;

use chrono::Duration;
use common::{RecordingRunner, TestHarness};
use signflow::config::app_config::WORKER_LAST_START_ATTEMPT;
use signflow::{AppConfig, Clock};

const WORKER_CMD: &str =
    "php /var/www/app/occ background-job:worker SignFileJob SignSingleFileJob --stop-after=1h";

/// A single controller call for a given queue and pool size.
struct SpawnCase {
    name: &'static str,
    pending: usize,
    desired: i64,
    expected_spawns: usize,
}

const SPAWN_CASES: &[SpawnCase] = &[
    SpawnCase {
        name: "empty_queue",
        pending: 0,
        desired: 4,
        expected_spawns: 0,
    },
    SpawnCase {
        name: "more_jobs_than_workers",
        pending: 10,
        desired: 3,
        expected_spawns: 3,
    },
    SpawnCase {
        name: "fewer_jobs_than_workers",
        pending: 2,
        desired: 4,
        expected_spawns: 2,
    },
    SpawnCase {
        name: "pool_clamped_to_max",
        pending: 50,
        desired: 100,
        expected_spawns: 32,
    },
    SpawnCase {
        name: "pool_clamped_to_min",
        pending: 5,
        desired: 0,
        expected_spawns: 1,
    },
];

#[test]
fn test_spawn_counts() {
    for case in SPAWN_CASES {
        let h = TestHarness::new();
        h.enable_async_local(case.desired);
        h.enqueue_jobs("SignFileJob", case.pending);

        assert!(h.health.ensure_worker_running(), "case {}", case.name);
        assert_eq!(
            h.runner.spawn_count(),
            case.expected_spawns,
            "case {}",
            case.name
        );
    }
}

#[test]
fn test_workers_are_pinned_to_signing_classes() {
    let h = TestHarness::new();
    h.enable_async_local(4);
    h.enqueue_jobs("SignSingleFileJob", 1);
    assert!(h.health.ensure_worker_running());

    let spawned = h.runner.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].join(" "), WORKER_CMD);
}

#[test]
fn test_disabled_async_local_is_a_noop() {
    let h = TestHarness::new();
    h.enqueue_jobs("SignFileJob", 3);
    assert!(!h.health.ensure_worker_running());
    assert_eq!(h.runner.spawn_count(), 0);
}

#[test]
fn test_calls_within_ten_seconds_start_once() {
    let h = TestHarness::new();
    h.enable_async_local(2);
    h.enqueue_jobs("SignFileJob", 5);

    assert!(h.health.ensure_worker_running());
    let recorded = h.db.get_int(WORKER_LAST_START_ATTEMPT).unwrap();
    assert_eq!(recorded, Some(h.clock.now().timestamp()));

    for _ in 0..3 {
        h.clock.advance(Duration::seconds(3));
        assert!(h.health.ensure_worker_running());
    }
    assert_eq!(h.runner.spawn_count(), 2);
    assert_eq!(h.db.get_int(WORKER_LAST_START_ATTEMPT).unwrap(), recorded);

    h.clock.advance(Duration::seconds(1));
    assert!(h.health.ensure_worker_running());
    assert_eq!(h.runner.spawn_count(), 4);
}

#[test]
fn test_stop_leaves_unrelated_workers_alone() {
    let runner = RecordingRunner::new();
    runner.add_process(10, "php /var/www/app/occ background-job:worker PreviewGenerationJob");
    runner.add_process(11, "php /srv/other/occ background-job:worker SignFileJob");
    runner.add_process(12, "/usr/sbin/php-fpm");
    let h = TestHarness::with_runner(runner);
    h.enable_async_local(3);
    h.enqueue_jobs("SignFileJob", 3);
    assert!(h.health.ensure_worker_running());

    let status = h.health.pool_status().unwrap();
    assert_eq!(status.running_workers, 3);
    assert!(status.throttled);

    assert_eq!(h.health.stop_workers(), 3);
    let mut left = h.runner.live_pids();
    left.sort_unstable();
    assert_eq!(left, vec![10, 11, 12]);
    assert_eq!(h.health.pool_status().unwrap().running_workers, 0);
}

#[test]
fn test_unreadable_process_table() {
    let mut runner = RecordingRunner::new();
    runner.fail_listing = true;
    let h = TestHarness::with_runner(runner);
    h.enable_async_local(4);

    assert_eq!(h.health.stop_workers(), 0);
    assert_eq!(h.health.pool_status().unwrap().running_workers, 0);
}

#[test]
fn test_other_job_classes_do_not_count() {
    let h = TestHarness::new();
    h.enable_async_local(4);
    h.enqueue_jobs("PreviewGenerationJob", 7);

    assert!(h.health.ensure_worker_running());
    assert_eq!(h.runner.spawn_count(), 0);
    assert_eq!(h.health.pool_status().unwrap().pending_jobs, 0);
}
