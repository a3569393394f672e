use anchor_core::db::open_db_in_memory;
use anchor_core::{
    normalized_day, sqlite_service, ChangeFeed, CheckInRecord, CheckInServiceError, ItemRequest,
    NormalizedDay, RecordRepository, SqliteRecordRepository, StoreChange, ToggleOutcome,
    FALLBACK_ICON, TARGET_COUNT_MAX,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

fn today() -> NormalizedDay {
    normalized_day(1_761_800_000_000)
}

#[test]
fn hydrate_scenario_toggles_between_no_record_and_completed() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));

    let mut request = ItemRequest::new("Hydrate");
    request.target_count = 3;
    let hydrate = service.upsert_item(&request).unwrap();

    let board = service.today_board(today()).unwrap();
    assert_eq!(board.cards.len(), 1);
    assert!(board.cards[0].record.is_none());
    assert!(!board.cards[0].is_completed);

    let outcome = service.toggle_completion(hydrate.id, today()).unwrap();
    match &outcome {
        ToggleOutcome::Created(record) => {
            assert_eq!(record.count, 3);
            assert_eq!(record.day, today());
            assert_eq!(record.item_id, Some(hydrate.id));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let board = service.today_board(today()).unwrap();
    assert!(board.cards[0].is_completed);
    assert_eq!(board.completed_count(), 1);

    let outcome = service.toggle_completion(hydrate.id, today()).unwrap();
    assert!(matches!(outcome, ToggleOutcome::Cleared(_)));
    assert!(service.list_records_for_day(today()).unwrap().is_empty());
    assert_eq!(service.today_board(today()).unwrap().completed_count(), 0);
}

#[test]
fn toggle_only_touches_the_given_day() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));
    let walking = service.upsert_item(&ItemRequest::new("Walking")).unwrap();

    service.toggle_completion(walking.id, today()).unwrap();
    let yesterday = today().offset_days(-1);

    assert_eq!(service.list_records_for_day(today()).unwrap().len(), 1);
    assert!(service.list_records_for_day(yesterday).unwrap().is_empty());
    assert!(!service.today_board(yesterday).unwrap().cards[0].is_completed);
}

#[test]
fn partial_record_is_raised_to_target() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));
    let records = SqliteRecordRepository::new(&conn);

    let mut request = ItemRequest::new("Pushups");
    request.target_count = 5;
    let pushups = service.upsert_item(&request).unwrap();

    let partial = CheckInRecord::new(today().epoch_ms(), 2, Some(pushups.id));
    records.insert_record(&partial).unwrap();

    let outcome = service.toggle_completion(pushups.id, today()).unwrap();
    match outcome {
        ToggleOutcome::Completed(record) => {
            assert_eq!(record.id, partial.id);
            assert_eq!(record.count, 5);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let stored = records.find_record(pushups.id, today()).unwrap().unwrap();
    assert_eq!(stored.count, 5);
}

#[test]
fn raising_the_target_reopens_a_completed_day() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));

    let reading = service.upsert_item(&ItemRequest::new("Reading")).unwrap();
    service.toggle_completion(reading.id, today()).unwrap();

    let mut edit = ItemRequest::new("Reading");
    edit.id = Some(reading.id);
    edit.target_count = 4;
    let edited = service.upsert_item(&edit).unwrap();
    assert_eq!(edited.created_at, reading.created_at);
    assert!(!service.today_board(today()).unwrap().cards[0].is_completed);

    let outcome = service.toggle_completion(reading.id, today()).unwrap();
    assert!(matches!(outcome, ToggleOutcome::Completed(ref record) if record.count == 4));
}

#[test]
fn blank_name_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let feed = Arc::new(ChangeFeed::new());
    let service = sqlite_service(&conn, Arc::clone(&feed));

    let err = service.upsert_item(&ItemRequest::new(" \t\n")).unwrap_err();
    assert!(matches!(err, CheckInServiceError::EmptyTitle));
    assert!(service.list_items().unwrap().is_empty());
    assert_eq!(feed.revision(), 0);
}

#[test]
fn creation_trims_title_applies_icon_fallback_and_clamps_target() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));

    let mut request = ItemRequest::new("  Meditate  ");
    request.icon = "   ".to_string();
    request.target_count = -5;
    let meditate = service.upsert_item(&request).unwrap();
    assert_eq!(meditate.title, "Meditate");
    assert_eq!(meditate.icon, FALLBACK_ICON);
    assert_eq!(meditate.target_count, 1);

    let mut request = ItemRequest::new("Steps");
    request.target_count = 500;
    let steps = service.upsert_item(&request).unwrap();
    assert_eq!(steps.target_count, TARGET_COUNT_MAX);
}

#[test]
fn items_list_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));

    let mut second = ItemRequest::new("second");
    second.created_at = Some(2_000);
    let mut first = ItemRequest::new("first");
    first.created_at = Some(1_000);
    service.upsert_item(&second).unwrap();
    service.upsert_item(&first).unwrap();

    let titles = service
        .list_items()
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["first", "second"]);
}

#[test]
fn unknown_item_errors_are_surfaced() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));
    let missing = Uuid::new_v4();

    let err = service.toggle_completion(missing, today()).unwrap_err();
    assert!(matches!(err, CheckInServiceError::ItemNotFound(id) if id == missing));
    assert!(!err.user_message().is_empty());

    let err = service.delete_item(missing).unwrap_err();
    assert!(matches!(err, CheckInServiceError::ItemNotFound(_)));

    let mut edit = ItemRequest::new("ghost");
    edit.id = Some(missing);
    let err = service.upsert_item(&edit).unwrap_err();
    assert!(matches!(err, CheckInServiceError::ItemNotFound(_)));
}

#[test]
fn persistence_failure_surfaces_message() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));
    let chores = service.upsert_item(&ItemRequest::new("Chores")).unwrap();

    conn.execute_batch("DROP TABLE records;").unwrap();

    let err = service.toggle_completion(chores.id, today()).unwrap_err();
    assert!(matches!(err, CheckInServiceError::Repo(_)));
    assert!(err.user_message().contains("records"));
}

#[test]
fn delete_item_removes_its_card_and_records() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn, Arc::new(ChangeFeed::new()));

    let finance = service.upsert_item(&ItemRequest::new("Budget")).unwrap();
    service.toggle_completion(finance.id, today()).unwrap();

    service.delete_item(finance.id).unwrap();
    assert!(service.today_board(today()).unwrap().is_empty());
    assert!(service.list_records_for_day(today()).unwrap().is_empty());
}

#[test]
fn successful_writes_are_published_to_the_feed() {
    let conn = open_db_in_memory().unwrap();
    let feed = Arc::new(ChangeFeed::new());
    let service = sqlite_service(&conn, Arc::clone(&feed));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    feed.subscribe(move |change| sink.lock().unwrap().push(*change));

    let sleep = service.upsert_item(&ItemRequest::new("Lights Out")).unwrap();
    service.toggle_completion(sleep.id, today()).unwrap();
    service.toggle_completion(Uuid::new_v4(), today()).unwrap_err();
    service.delete_item(sleep.id).unwrap();

    assert_eq!(feed.revision(), 3);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            StoreChange::ItemSaved(sleep.id),
            StoreChange::RecordChanged {
                item_id: sleep.id,
                day: today()
            },
            StoreChange::ItemDeleted(sleep.id),
        ]
    );
}
