use studymate_core::db::open_db_in_memory;
use studymate_core::{
    ActivityKind, ActivityLogRepository, ActivityRecord, CalendarEntry, EntryRepository,
    RepoError, SqliteActivityLogRepository, SqliteEntryRepository,
};

fn draft(owner: &str, text: &str) -> CalendarEntry {
    CalendarEntry::draft(owner, text, 2026, 3, 14, 9, 30)
}

#[test]
fn create_resolves_an_id_and_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo.create_entry(&draft("owner-1", "algebra")).unwrap();
    assert!(!id.is_empty());

    let loaded = repo.get_entry("owner-1", &id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.text, "algebra");
    assert_eq!(loaded.hour, 9);
    assert!(!loaded.digest_flag);
}

#[test]
fn create_keeps_a_caller_provided_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut entry = draft("owner-1", "algebra");
    entry.id = "entry-fixed".to_string();
    let id = repo.create_entry(&entry).unwrap();
    assert_eq!(id, "entry-fixed");
}

#[test]
fn create_rejects_invalid_entries() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut entry = draft("owner-1", "algebra");
    entry.minute = 99;
    let err = repo.create_entry(&entry).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn update_overwrites_fields_for_the_same_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut entry = draft("owner-1", "algebra");
    entry.id = repo.create_entry(&entry).unwrap();

    entry.text = "advanced algebra".to_string();
    entry.hour = 11;
    repo.update_entry(&entry).unwrap();

    let loaded = repo.get_entry("owner-1", &entry.id).unwrap().unwrap();
    assert_eq!(loaded.text, "advanced algebra");
    assert_eq!(loaded.hour, 11);
}

#[test]
fn update_of_missing_entry_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut entry = draft("owner-1", "algebra");
    entry.id = "entry-missing".to_string();
    let err = repo.update_entry(&entry).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == "entry-missing"));
}

#[test]
fn entries_are_scoped_to_their_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo.create_entry(&draft("owner-1", "algebra")).unwrap();

    assert!(repo.get_entry("owner-2", &id).unwrap().is_none());
    let err = repo.set_digest_flag("owner-2", &id, true).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn digest_flag_is_a_field_level_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo.create_entry(&draft("owner-1", "algebra")).unwrap();
    repo.set_digest_flag("owner-1", &id, true).unwrap();

    let loaded = repo.get_entry("owner-1", &id).unwrap().unwrap();
    assert!(loaded.digest_flag);
    assert_eq!(loaded.text, "algebra");

    repo.set_digest_flag("owner-1", &id, false).unwrap();
    assert!(!repo.get_entry("owner-1", &id).unwrap().unwrap().digest_flag);
}

#[test]
fn digest_day_query_filters_owner_date_and_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let mut flagged_today = draft("owner-1", "algebra");
    flagged_today.digest_flag = true;
    repo.create_entry(&flagged_today).unwrap();

    let mut flagged_other_day = draft("owner-1", "physics");
    flagged_other_day.day = 15;
    flagged_other_day.digest_flag = true;
    repo.create_entry(&flagged_other_day).unwrap();

    repo.create_entry(&draft("owner-1", "unflagged")).unwrap();

    let mut other_owner = draft("owner-2", "chemistry");
    other_owner.digest_flag = true;
    repo.create_entry(&other_owner).unwrap();

    let swept = repo
        .digest_entries_for_day("owner-1", 2026, 3, 14)
        .unwrap();
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].text, "algebra");
}

#[test]
fn delete_removes_the_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::new(&conn);

    let id = repo.create_entry(&draft("owner-1", "algebra")).unwrap();
    repo.delete_entry("owner-1", &id).unwrap();

    assert!(repo.get_entry("owner-1", &id).unwrap().is_none());
    let err = repo.delete_entry("owner-1", &id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn activity_log_appends_and_lists_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let log = SqliteActivityLogRepository::new(&conn);

    let first = log
        .append(&ActivityRecord {
            owner_id: "owner-1".to_string(),
            kind: ActivityKind::ScheduleReminder,
            message: "algebra is starting now.".to_string(),
            created_at_ms: 1_000,
        })
        .unwrap();
    let second = log
        .append(&ActivityRecord {
            owner_id: "owner-1".to_string(),
            kind: ActivityKind::Like,
            message: "someone liked your post".to_string(),
            created_at_ms: 2_000,
        })
        .unwrap();
    assert!(second > first);

    let records = log.list_for_owner("owner-1", 10).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, ActivityKind::Like);
    assert_eq!(records[1].kind, ActivityKind::ScheduleReminder);

    assert!(log.list_for_owner("owner-2", 10).unwrap().is_empty());
}

#[test]
fn activity_log_rejects_blank_owner() {
    let conn = open_db_in_memory().unwrap();
    let log = SqliteActivityLogRepository::new(&conn);

    let err = log
        .append(&ActivityRecord {
            owner_id: "  ".to_string(),
            kind: ActivityKind::ScheduleReminder,
            message: "orphan record".to_string(),
            created_at_ms: 1_000,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
