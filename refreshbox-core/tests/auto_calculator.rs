//! Tests for the automatic refresh-time policy.

use std::sync::Arc;

use refreshbox_core::{
    AutoRefreshCalculator, BoxRefreshTimeCalculator, NextRefreshTime, RefreshCapability, RefreshError,
    RefreshTimeCalculator, SharedRefreshTimeCalculator, Timestamp, Transition,
    WithNextRefreshTime,
};

/// Value without freshness metadata.
#[derive(Debug, Clone, PartialEq)]
struct Plain(u32);

impl RefreshCapability for Plain {}

/// Value whose accessor always fails.
struct Broken;

#[derive(Debug, thiserror::Error)]
#[error("upstream sent an unparseable max-age")]
struct BadMaxAge;

impl NextRefreshTime for Broken {
    fn next_refresh_time(&self) -> Result<Timestamp, RefreshError> {
        Err(RefreshError::capability(BadMaxAge))
    }
}

impl RefreshCapability for Broken {
    fn as_next_refresh_time(&self) -> Option<&dyn NextRefreshTime> {
        Some(self)
    }
}

fn ts(millis: i64) -> Timestamp {
    Timestamp::from_millis(millis)
}

/// (last_refresh_time, now) pairs including contradictory ones.
const TIMES: &[(i64, i64)] = &[
    (1_000, 2_000),
    (0, 0),
    (5_000, 1_000),
    (-10, 10),
    (i64::MIN, i64::MAX),
    (i64::MAX, i64::MIN),
];

#[test]
fn test_first_load_of_plain_value_is_never_due() {
    let auto = AutoRefreshCalculator::new();
    let next = auto
        .calculate_next_refresh_time(None, &Plain(1), ts(1_000), ts(2_000))
        .unwrap();
    assert_eq!(next, Timestamp::NEVER);
}

#[test]
fn test_plain_value_is_never_due_for_any_input() {
    let auto = AutoRefreshCalculator::new();
    for &(last, now) in TIMES {
        for old in [None, Some(Plain(0)), Some(Plain(99))] {
            let next = auto
                .calculate_next_refresh_time(old.as_ref(), &Plain(7), ts(last), ts(now))
                .unwrap();
            assert_eq!(next, Timestamp::NEVER, "last={last} now={now} old={old:?}");
        }
    }
}

#[test]
fn test_self_describing_value_wins_even_when_now_is_later() {
    let auto = AutoRefreshCalculator::new();
    let value = WithNextRefreshTime::new("v", ts(5_000));
    let next = auto
        .calculate_next_refresh_time(None, &value, ts(0), ts(9_999_999))
        .unwrap();
    assert_eq!(next, ts(5_000));
}

#[test]
fn test_self_describing_value_ignores_other_inputs() {
    let auto = AutoRefreshCalculator::new();
    let old = WithNextRefreshTime::new("old", ts(1));
    let new = WithNextRefreshTime::new("new", ts(42_000));
    for &(last, now) in TIMES {
        for old_value in [None, Some(&old)] {
            let next = auto
                .calculate_next_refresh_time(old_value, &new, ts(last), ts(now))
                .unwrap();
            assert_eq!(next, ts(42_000), "last={last} now={now}");
        }
    }
}

#[test]
fn test_past_refresh_time_passes_through() {
    let auto = AutoRefreshCalculator::new();
    let value = WithNextRefreshTime::new((), ts(100));
    let next = auto
        .calculate_next_refresh_time(None, &value, ts(500), ts(1_000))
        .unwrap();
    assert_eq!(next, ts(100));
}

#[test]
fn test_missing_new_value_is_invalid_argument() {
    let old = Plain(1);
    let result = Transition::try_new(Some(&old), None, ts(1_000), ts(2_000))
        .and_then(|t| t.calculate(&AutoRefreshCalculator::new()));
    assert!(matches!(result, Err(RefreshError::InvalidArgument(_))));
}

#[test]
fn test_accessor_failure_propagates() {
    let auto = AutoRefreshCalculator::new();
    let err = auto
        .calculate_next_refresh_time(None, &Broken, ts(0), ts(1))
        .unwrap_err();
    match err {
        RefreshError::Capability(source) => assert!(source.is::<BadMaxAge>()),
        other => panic!("expected capability error, got {other:?}"),
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let auto = AutoRefreshCalculator::new();
    let value = WithNextRefreshTime::new(3u8, ts(7_777));
    let first = auto
        .calculate_next_refresh_time(None, &value, ts(1), ts(2))
        .unwrap();
    let second = auto
        .calculate_next_refresh_time(None, &value, ts(1), ts(2))
        .unwrap();
    assert_eq!(first, second);

    let plain = Plain(3);
    let first = auto
        .calculate_next_refresh_time(None, &plain, ts(1), ts(2))
        .unwrap();
    let second = auto
        .calculate_next_refresh_time(None, &plain, ts(1), ts(2))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_through_trait_object_and_shared_pointer() {
    let shared: SharedRefreshTimeCalculator<WithNextRefreshTime<u8>> =
        Arc::new(AutoRefreshCalculator::new());
    let value = WithNextRefreshTime::new(1u8, ts(10));
    assert_eq!(
        shared
            .calculate_next_refresh_time(None, &value, ts(0), ts(0))
            .unwrap(),
        ts(10)
    );

    let by_ref = &AutoRefreshCalculator::new();
    assert_eq!(
        by_ref
            .calculate_next_refresh_time(None, &value, ts(0), ts(0))
            .unwrap(),
        ts(10)
    );

    let boxed: BoxRefreshTimeCalculator<WithNextRefreshTime<u8>> =
        Box::new(AutoRefreshCalculator::new());
    assert_eq!(
        boxed
            .calculate_next_refresh_time(None, &value, ts(0), ts(0))
            .unwrap(),
        ts(10)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_do_not_interfere() {
    let shared: SharedRefreshTimeCalculator<Box<dyn RefreshCapability + Send + Sync>> =
        Arc::new(AutoRefreshCalculator::new());

    let handles = (0..64i64)
        .map(|task| {
            let calculator = Arc::clone(&shared);
            tokio::spawn(async move {
                for i in 0..1_000i64 {
                    let due = task * 1_000_000 + i;
                    let value: Box<dyn RefreshCapability + Send + Sync> = if i % 2 == 0 {
                        Box::new(WithNextRefreshTime::new(i, ts(due)))
                    } else {
                        Box::new(Plain(i as u32))
                    };
                    let next = calculator
                        .calculate_next_refresh_time(None, &value, ts(i), ts(due))
                        .unwrap();
                    let expected = if i % 2 == 0 { ts(due) } else { Timestamp::NEVER };
                    assert_eq!(next, expected);
                }
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.await.unwrap();
    }
}
