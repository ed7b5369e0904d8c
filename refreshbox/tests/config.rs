use std::time::Duration;

use pretty_assertions::assert_eq;
use refreshbox::{RefreshConfig, RefreshDue, RefreshPolicy, Timestamp, WithNextRefreshTime};

#[test]
fn test_empty_config_deserialize() {
    let config: RefreshConfig = serde_saphyr::from_str("{}").expect("failed to deserialize");
    assert_eq!(config, RefreshConfig::default());
}

#[test]
fn test_auto_policy_deserialize() {
    let yaml = r#"
policy:
  type: Auto
default_linger: 5m
"#;

    let config: RefreshConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert_eq!(
        config,
        RefreshConfig {
            policy: RefreshPolicy::Auto,
            default_linger: Some(Duration::from_secs(300)),
        }
    );
}

#[test]
fn test_linger_policy_deserialize() {
    let yaml = r#"
policy:
  type: Linger
  linger: 1500ms
"#;

    let config: RefreshConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert_eq!(
        config.policy,
        RefreshPolicy::Linger {
            linger: Duration::from_millis(1500)
        }
    );
    assert_eq!(config.default_linger, None);
}

#[test]
fn test_never_policy_deserialize() {
    let yaml = r#"
policy:
  type: Never
default_linger: 1h
"#;

    let config: RefreshConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert_eq!(config.policy, RefreshPolicy::Never);
    assert_eq!(config.default_linger, Some(Duration::from_secs(3600)));
}

#[test]
fn test_unknown_policy_is_rejected() {
    let yaml = r#"
policy:
  type: Sometimes
"#;

    let result: Result<RefreshConfig, _> = serde_saphyr::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_config_round_trips_through_yaml() {
    let config = RefreshConfig::builder()
        .linger(Duration::from_secs(30))
        .default_linger(Duration::from_secs(60))
        .build();

    let yaml = serde_saphyr::to_string(&config).expect("failed to serialize");
    let parsed: RefreshConfig = serde_saphyr::from_str(&yaml).expect("failed to deserialize");

    assert_eq!(parsed, config);
}

#[test]
fn test_deserialized_config_drives_schedule() {
    let yaml = r#"
policy:
  type: Auto
default_linger: 10s
"#;
    let config: RefreshConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");
    let schedule = config.schedule::<WithNextRefreshTime<&'static str>>();
    let now = Timestamp::from_millis(1_000);

    let described = WithNextRefreshTime::new("ttl", Timestamp::from_millis(4_000));
    assert_eq!(
        schedule.schedule(None, Some(&described), now, now).unwrap(),
        RefreshDue::At(Timestamp::from_millis(4_000))
    );

    let plain_schedule = config.schedule::<String>();
    let plain = String::from("plain");
    assert_eq!(
        plain_schedule
            .schedule(None, Some(&plain), now, now)
            .unwrap(),
        RefreshDue::At(Timestamp::from_millis(11_000))
    );
}
