use anchor_core::{
    sample_items, Category, CheckInItem, CheckInRecord, ItemValidationError, ThemeColor,
    FALLBACK_ICON,
};
use uuid::Uuid;

#[test]
fn item_new_sets_identity_and_clamps_target() {
    let item = CheckInItem::new("Hydrate", Category::Nutrition, "drop.fill", ThemeColor::Tide, 0, 42);

    assert!(!item.id.is_nil());
    assert_eq!(item.title, "Hydrate");
    assert_eq!(item.target_count, 1);
    assert_eq!(item.created_at, 42);
    assert!(item.validate().is_ok());

    let negative = CheckInItem::new("Stretch", Category::Fitness, "figure.walk", ThemeColor::Mint, -5, 0);
    assert_eq!(negative.target_count, 1);
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = CheckInItem::with_id(
        Uuid::nil(),
        "Read",
        Category::Learning,
        "book.closed.fill",
        ThemeColor::Tide,
        1,
        0,
    )
    .unwrap_err();
    assert_eq!(err, ItemValidationError::NilId);
}

#[test]
fn validate_rejects_blank_title() {
    let item = CheckInItem::new("   ", Category::Wellness, FALLBACK_ICON, ThemeColor::Ember, 1, 0);
    assert_eq!(item.validate().unwrap_err(), ItemValidationError::BlankTitle);
}

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let item_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let item = CheckInItem::with_id(
        item_id,
        "Lights Out",
        Category::Sleep,
        "moon.stars.fill",
        ThemeColor::Starlight,
        2,
        1_761_782_400_000,
    )
    .unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], item_id.to_string());
    assert_eq!(json["category"], "sleep");
    assert_eq!(json["color"], "starlight");
    assert_eq!(json["target_count"], 2);
    assert_eq!(json["created_at"], 1_761_782_400_000_i64);

    let decoded: CheckInItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn deserialize_clamps_target_and_rejects_blank_title() {
    let mut value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "title": " Walking ",
        "category": "fitness",
        "icon": "figure.walk",
        "color": "mint",
        "target_count": -3,
        "created_at": 0
    });

    let item: CheckInItem = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(item.target_count, 1);
    assert_eq!(item.title, "Walking");

    value["title"] = serde_json::json!("  ");
    let err = serde_json::from_value::<CheckInItem>(value).unwrap_err();
    assert!(
        err.to_string().contains("title must not be blank"),
        "unexpected error: {err}"
    );
}

#[test]
fn record_clamps_count_and_normalizes_day() {
    let record = CheckInRecord::new(1_700_000_000_000, -4, None);
    assert_eq!(record.count, 0);
    assert_eq!(record.day.epoch_ms(), 1_699_920_000_000);
}

#[test]
fn record_deserialize_clamps_negative_count_and_normalizes_day() {
    let record_id = Uuid::parse_str("22222222-3333-4444-8555-666666666666").unwrap();
    let item_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let value = serde_json::json!({
        "id": record_id.to_string(),
        "day": 1_700_000_000_000_i64,
        "count": -3,
        "item_id": item_id.to_string()
    });

    let record: CheckInRecord = serde_json::from_value(value).unwrap();
    assert_eq!(record.id, record_id);
    assert_eq!(record.count, 0);
    assert_eq!(record.day.epoch_ms(), 1_699_920_000_000);
    assert_eq!(record.item_id, Some(item_id));
}

#[test]
fn record_completion_requires_resolved_matching_item() {
    let item = CheckInItem::new("Hydrate", Category::Nutrition, "drop.fill", ThemeColor::Tide, 3, 0);
    let other = CheckInItem::new("Other", Category::Nutrition, "drop.fill", ThemeColor::Tide, 1, 0);

    let full = CheckInRecord::new(0, 3, Some(item.id));
    assert!(full.is_completed(Some(&item)));
    assert!(!full.is_completed(None));
    assert!(!full.is_completed(Some(&other)));

    let partial = CheckInRecord::new(0, 2, Some(item.id));
    assert!(!partial.is_completed(Some(&item)));

    let detached = CheckInRecord::new(0, 99, None);
    assert!(!detached.is_completed(Some(&item)));
}

#[test]
fn sample_items_keep_creation_order() {
    let items = sample_items(1_000);
    let titles = items.iter().map(|item| item.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["Fat Burn", "Walking", "Reading", "Lights Out"]);
    assert!(items.windows(2).all(|pair| pair[0].created_at < pair[1].created_at));
}

#[test]
fn sample_items_saturate_near_max_timestamp() {
    let items = sample_items(i64::MAX - 1);
    let stamps = items.iter().map(|item| item.created_at).collect::<Vec<_>>();
    assert_eq!(stamps, vec![i64::MAX - 1, i64::MAX, i64::MAX, i64::MAX]);
}
