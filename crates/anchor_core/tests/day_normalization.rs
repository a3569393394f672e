use anchor_core::{normalized_day, NormalizedDay, DAY_MILLIS};
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

#[test]
fn same_utc_day_in_different_offsets_normalizes_equal() {
    let pacific = FixedOffset::west_opt(8 * 3600).unwrap();
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();

    // 2024-03-11T07:30Z and 2024-03-11T00:00Z.
    let evening_in_pacific = pacific.with_ymd_and_hms(2024, 3, 10, 23, 30, 0).unwrap();
    let morning_in_tokyo = tokyo.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap();

    let a = NormalizedDay::from_datetime(&evening_in_pacific);
    let b = NormalizedDay::from_datetime(&morning_in_tokyo);
    assert_eq!(a, b);
    assert_eq!(a.date(), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
}

#[test]
fn normalization_is_idempotent() {
    let instant = Utc.with_ymd_and_hms(2025, 10, 30, 17, 45, 12).unwrap();
    let once = NormalizedDay::from_datetime(&instant);
    let twice = normalized_day(once.epoch_ms());

    assert_eq!(once, twice);
    assert_eq!(once.epoch_ms() % DAY_MILLIS, 0);
}

#[test]
fn last_millisecond_of_day_stays_in_bucket() {
    let midnight = Utc.with_ymd_and_hms(2025, 10, 30, 0, 0, 0).unwrap();
    let day = NormalizedDay::from_datetime(&midnight);

    assert_eq!(normalized_day(day.epoch_ms() + DAY_MILLIS - 1), day);
    assert_eq!(normalized_day(day.epoch_ms() + DAY_MILLIS), day.offset_days(1));
}

#[test]
fn from_date_matches_datetime_at_midnight() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    let noon = Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap();

    assert_eq!(NormalizedDay::from_date(date), NormalizedDay::from_datetime(&noon));
}

#[test]
fn serializes_as_epoch_millis() {
    let day = normalized_day(1_700_000_000_000);
    let json = serde_json::to_value(day).unwrap();
    assert_eq!(json, serde_json::json!(1_699_920_000_000_i64));

    let decoded: NormalizedDay = serde_json::from_value(serde_json::json!(1_700_000_000_000_i64)).unwrap();
    assert_eq!(decoded, day);
}
