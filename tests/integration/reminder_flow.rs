/// End-to-end reminder flow: eligibility, firing log, and dedup
use practice_insights::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod reminder_flow_tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn open_store() -> (SqliteStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let store = SqliteStore::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");
        (store, temp_file)
    }

    /// Give the user recent activity so the inactivity reminder stays quiet
    fn log_recent_activity(store: &SqliteStore, user_id: &UserId, day: NaiveDate) {
        let subject = Subject::new(user_id.clone(), "Background".to_string(), day, None)
            .expect("valid subject");
        store.create_subject(&subject).expect("create subject");
        let event =
            EventRecord::from_existing(subject.id.clone(), day, Outcome::Success, None, None);
        store.record_event(&event).expect("record event");
    }

    fn enable_daily(store: &SqliteStore, user_id: &UserId, time: &str) {
        let config = ReminderConfig {
            daily_reminder_enabled: true,
            daily_time: Some(time.to_string()),
            ..ReminderConfig::default()
        };
        store.put_reminder_config(user_id, &config).expect("put config");
    }

    #[test]
    fn test_daily_reminder_fires_once_per_day() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        // 2024-03-11 is a Monday
        let now = at(2024, 3, 11, 9, 2);

        enable_daily(&store, &user_id, "09:00");
        log_recent_activity(&store, &user_id, date(2024, 3, 10));

        let first = run_scheduled_checks(&store, now).expect("first run");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ReminderKind::Daily);
        assert_eq!(first[0].method, NotificationMethod::Both);
        assert!(!first[0].title.is_empty());

        // Second poll inside the same tolerance window: already fired
        let second = run_scheduled_checks(&store, at(2024, 3, 11, 9, 4)).expect("second run");
        assert!(second.is_empty());

        // Next day it fires again
        let next_day = run_scheduled_checks(&store, at(2024, 3, 12, 9, 2)).expect("next day");
        assert_eq!(next_day.len(), 1);
    }

    #[test]
    fn test_daily_reminder_outside_window_is_quiet() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        enable_daily(&store, &user_id, "09:00");
        log_recent_activity(&store, &user_id, date(2024, 3, 10));

        let result = run_scheduled_checks(&store, at(2024, 3, 11, 14, 0)).expect("run");
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_daily_time_degrades_quietly() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        enable_daily(&store, &user_id, "around nine");
        log_recent_activity(&store, &user_id, date(2024, 3, 10));

        let result = run_scheduled_checks(&store, at(2024, 3, 11, 9, 0)).expect("run");
        assert!(result.is_empty());
    }

    #[test]
    fn test_inactive_reminder_for_silent_user() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        // Settings exist, but the user never logged anything
        store.get_reminder_config(&user_id).expect("bootstrap settings");

        let first = run_scheduled_checks(&store, at(2024, 3, 11, 12, 0)).expect("first run");
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind, ReminderKind::Inactive);

        // Same day: deduped
        let second = run_scheduled_checks(&store, at(2024, 3, 11, 18, 0)).expect("second run");
        assert!(second.is_empty());
    }

    #[test]
    fn test_recent_activity_suppresses_inactive_reminder() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        store.get_reminder_config(&user_id).expect("bootstrap settings");
        log_recent_activity(&store, &user_id, date(2024, 3, 10));

        let result = run_scheduled_checks(&store, at(2024, 3, 11, 12, 0)).expect("run");
        assert!(result.is_empty());
    }

    #[test]
    fn test_after_action_hook_fires_once_per_day() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let now = at(2024, 3, 11, 16, 45);

        let first = on_action_completed(&store, &user_id, now).expect("first hook");
        assert!(first.is_some());
        assert_eq!(first.unwrap().kind, ReminderKind::AfterAction);

        let second = on_action_completed(&store, &user_id, now).expect("second hook");
        assert!(second.is_none());
    }

    #[test]
    fn test_after_new_action_hook_respects_toggle() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let now = at(2024, 3, 11, 16, 45);

        let config = ReminderConfig {
            after_new_action_reminder: false,
            ..ReminderConfig::default()
        };
        store.put_reminder_config(&user_id, &config).expect("put config");

        let result = on_action_created(&store, &user_id, now).expect("hook");
        assert!(result.is_none());
    }

    #[test]
    fn test_record_fired_is_atomic_check_and_insert() {
        let (store, _file) = open_store();
        let key = DedupKey {
            user_id: UserId::new(),
            kind: ReminderKind::Daily,
            day: date(2024, 3, 11),
        };

        // First insert wins, second observes the existing entry
        assert!(store.record_fired(&key).expect("first insert"));
        assert!(!store.record_fired(&key).expect("second insert"));

        // A different kind or day is an independent key
        let other_kind = DedupKey {
            kind: ReminderKind::Inactive,
            ..key.clone()
        };
        assert!(store.record_fired(&other_kind).expect("other kind"));

        let next_day = DedupKey {
            day: date(2024, 3, 12),
            ..key
        };
        assert!(store.record_fired(&next_day).expect("next day"));
    }

    #[test]
    fn test_last_fired_tracks_most_recent_day() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        assert_eq!(
            store.get_last_fired(&user_id, ReminderKind::Daily).unwrap(),
            None
        );

        for day in [date(2024, 3, 9), date(2024, 3, 11), date(2024, 3, 10)] {
            store
                .record_fired(&DedupKey {
                    user_id: user_id.clone(),
                    kind: ReminderKind::Daily,
                    day,
                })
                .expect("insert");
        }

        assert_eq!(
            store.get_last_fired(&user_id, ReminderKind::Daily).unwrap(),
            Some(date(2024, 3, 11))
        );
    }
}
