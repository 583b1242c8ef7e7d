use aikataulu::components::event_store::{Event, RecurrenceKind};
use aikataulu::scheduling::{expand, expand_until, expansion_horizon, RECURRING_TITLE_SUFFIX};
use chrono::{Duration, NaiveDateTime};
use std::str::FromStr;
use uuid::Uuid;

fn ts(value: &str) -> NaiveDateTime {
    value.parse().unwrap()
}

fn template(
    start: &str,
    end: &str,
    kind: Option<RecurrenceKind>,
    recurrence_end: Option<&str>,
) -> Event {
    Event {
        id: 1,
        owner: Uuid::new_v4(),
        title: "Yoga".to_string(),
        description: Some("Morning class".to_string()),
        start_time: ts(start),
        end_time: ts(end),
        is_recurring: kind.is_some(),
        recurrence_type: kind,
        recurrence_end: recurrence_end.map(ts),
        reminder_sent: false,
        created_at: ts("2024-01-01T00:00:00"),
    }
}

/// Daily expansion terminates at the horizon; instances on the recurrence
/// end day itself are included
#[tokio::test]
async fn test_daily_expansion_termination() {
    let event = template(
        "2024-01-01T10:00:00",
        "2024-01-01T11:00:00",
        Some(RecurrenceKind::Daily),
        Some("2024-01-05T00:00:00"),
    );

    let instances = expand(&event, ts("2024-01-01T09:00:00")).unwrap();

    assert_eq!(instances.len(), 4);
    let starts: Vec<_> = instances.iter().map(|i| i.start_time).collect();
    assert_eq!(
        starts,
        vec![
            ts("2024-01-02T10:00:00"),
            ts("2024-01-03T10:00:00"),
            ts("2024-01-04T10:00:00"),
            ts("2024-01-05T10:00:00"),
        ]
    );
    // The one-hour duration is carried along
    assert_eq!(instances[0].end_time, ts("2024-01-02T11:00:00"));
}

/// Weekly expansion steps seven days at a time
#[tokio::test]
async fn test_weekly_expansion() {
    let event = template(
        "2024-01-01T18:00:00",
        "2024-01-01T19:00:00",
        Some(RecurrenceKind::Weekly),
        Some("2024-01-31T00:00:00"),
    );

    let instances = expand(&event, ts("2024-01-01T09:00:00")).unwrap();

    let starts: Vec<_> = instances.iter().map(|i| i.start_time).collect();
    assert_eq!(
        starts,
        vec![
            ts("2024-01-08T18:00:00"),
            ts("2024-01-15T18:00:00"),
            ts("2024-01-22T18:00:00"),
            ts("2024-01-29T18:00:00"),
        ]
    );
}

/// Monthly advances by exactly 30 days, not calendar months
#[tokio::test]
async fn test_monthly_is_thirty_days() {
    let event = template(
        "2023-01-31T09:00:00",
        "2023-01-31T10:00:00",
        Some(RecurrenceKind::Monthly),
        Some("2023-03-15T00:00:00"),
    );

    let instances = expand(&event, ts("2023-01-31T08:00:00")).unwrap();

    // Jan 31 + 30 days lands on Mar 2, not Feb 28
    assert_eq!(instances[0].start_time, ts("2023-03-02T09:00:00"));
}

/// Expanding the same unmodified template twice yields structurally equal
/// sequences
#[tokio::test]
async fn test_expansion_is_idempotent() {
    let event = template(
        "2024-01-01T10:00:00",
        "2024-01-01T11:00:00",
        Some(RecurrenceKind::Daily),
        Some("2024-01-10T00:00:00"),
    );

    let first = expand(&event, ts("2024-01-01T09:00:00")).unwrap();
    let second = expand(&event, ts("2024-01-01T09:00:00")).unwrap();

    assert_eq!(first, second);
}

/// Generated instances inherit the template fields and can never re-expand
#[tokio::test]
async fn test_instances_inherit_and_are_non_recurring() {
    let event = template(
        "2024-01-01T10:00:00",
        "2024-01-01T11:00:00",
        Some(RecurrenceKind::Daily),
        Some("2024-01-03T00:00:00"),
    );

    let instances = expand(&event, ts("2024-01-01T09:00:00")).unwrap();
    assert!(!instances.is_empty());

    for instance in &instances {
        assert_eq!(instance.title, format!("Yoga{}", RECURRING_TITLE_SUFFIX));
        assert_eq!(instance.description, event.description);
        assert_eq!(instance.owner, event.owner);
        assert!(!instance.is_recurring);
        assert!(instance.recurrence_type.is_none());
        assert!(instance.recurrence_end.is_none());
    }
}

/// Non-recurring templates expand to the empty sequence, not an error
#[tokio::test]
async fn test_non_recurring_template_expands_to_nothing() {
    let event = template("2024-01-01T10:00:00", "2024-01-01T11:00:00", None, None);
    let instances = expand(&event, ts("2024-01-01T09:00:00")).unwrap();
    assert!(instances.is_empty());

    // A recurring flag without a recurrence type behaves the same way
    let mut flagged = template("2024-01-01T10:00:00", "2024-01-01T11:00:00", None, None);
    flagged.is_recurring = true;
    let instances = expand(&flagged, ts("2024-01-01T09:00:00")).unwrap();
    assert!(instances.is_empty());
}

/// Without an explicit recurrence end the horizon is one year past the
/// generation time
#[tokio::test]
async fn test_default_horizon_is_one_year() {
    let event = template(
        "2024-01-01T10:00:00",
        "2024-01-01T11:00:00",
        Some(RecurrenceKind::Daily),
        None,
    );

    let generated_at = ts("2024-01-01T10:00:00");
    assert_eq!(
        expansion_horizon(&event, generated_at, 365),
        generated_at + Duration::days(365)
    );

    // One instance per day up to and including the horizon day
    let instances = expand(&event, generated_at).unwrap();
    assert_eq!(instances.len(), 365);
}

/// The horizon can be pinned directly for bounded expansion
#[tokio::test]
async fn test_expand_until_explicit_horizon() {
    let event = template(
        "2024-01-01T10:00:00",
        "2024-01-01T11:00:00",
        Some(RecurrenceKind::Daily),
        None,
    );

    let instances = expand_until(&event, ts("2024-01-03T12:00:00")).unwrap();
    assert_eq!(instances.len(), 2);
}

/// Unknown recurrence strings are rejected at the parse boundary instead of
/// looping forever
#[tokio::test]
async fn test_unsupported_recurrence_type_is_an_error() {
    let err = RecurrenceKind::from_str("fortnightly").unwrap_err();
    assert!(err.to_string().contains("fortnightly"));

    assert_eq!(
        RecurrenceKind::from_str("daily").unwrap(),
        RecurrenceKind::Daily
    );
    assert_eq!(
        RecurrenceKind::from_str("weekly").unwrap(),
        RecurrenceKind::Weekly
    );
    assert_eq!(
        RecurrenceKind::from_str("monthly").unwrap(),
        RecurrenceKind::Monthly
    );
}
