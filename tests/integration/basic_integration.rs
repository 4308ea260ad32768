/// Basic integration tests over the SQLite store
use practice_insights::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open_store() -> (SqliteStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let store = SqliteStore::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");
        (store, temp_file)
    }

    fn make_subject(store: &SqliteStore, user_id: &UserId, name: &str) -> Subject {
        let subject = Subject::new(
            user_id.clone(),
            name.to_string(),
            date(2024, 1, 1),
            None,
        )
        .expect("valid subject");
        store.create_subject(&subject).expect("create subject");
        subject
    }

    fn log_event(store: &SqliteStore, subject: &Subject, day: NaiveDate, outcome: Outcome) {
        let event = EventRecord::from_existing(subject.id.clone(), day, outcome, None, None);
        store.record_event(&event).expect("record event");
    }

    #[test]
    fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let store = SqliteStore::new(db_path.clone()).expect("first open");
        let user_id = UserId::new();
        let subject = make_subject(&store, &user_id, "Persisted subject");
        drop(store);

        // Re-open the same file and read the subject back
        let store = SqliteStore::new(db_path).expect("second open");
        let loaded = store.get_subject(&subject.id).expect("subject still there");
        assert_eq!(loaded.name, "Persisted subject");
    }

    #[test]
    fn test_same_day_duplicate_rejected() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let subject = make_subject(&store, &user_id, "No duplicates");

        log_event(&store, &subject, date(2024, 3, 5), Outcome::Success);

        let duplicate = EventRecord::from_existing(
            subject.id.clone(),
            date(2024, 3, 5),
            Outcome::Fail,
            None,
            None,
        );
        let result = store.record_event(&duplicate);
        assert!(matches!(result, Err(StorageError::DuplicateEvent { .. })));

        // A different day is still fine
        log_event(&store, &subject, date(2024, 3, 6), Outcome::Fail);
        assert_eq!(store.list_events(&subject.id).unwrap().len(), 2);
    }

    #[test]
    fn test_dashboard_stats_end_to_end() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let subject = make_subject(&store, &user_id, "Evening walk");
        let today = date(2024, 3, 10);

        // Three-day streak ending today, plus one fail and one partial
        log_event(&store, &subject, date(2024, 3, 8), Outcome::Success);
        log_event(&store, &subject, date(2024, 3, 9), Outcome::Success);
        log_event(&store, &subject, date(2024, 3, 10), Outcome::Success);
        log_event(&store, &subject, date(2024, 3, 5), Outcome::Fail);
        log_event(&store, &subject, date(2024, 3, 6), Outcome::Partial);

        let stats = dashboard::stats(&store, &user_id, 30, today).expect("stats");

        assert_eq!(stats.total_subjects, 1);
        assert_eq!(stats.total_events, 5);
        // (3 * 1.0 + 0.5) / 5
        assert!((stats.success_rate - 0.7).abs() < 1e-9);
        assert_eq!(stats.subject_streaks.len(), 1);
        assert_eq!(stats.subject_streaks[0].streak.current_run, 3);
        assert_eq!(stats.subject_streaks[0].streak.longest_run, 3);
        // Seven daily buckets in the recent strip
        assert_eq!(stats.recent_activity.len(), 7);
        // Every bucket rate within bounds
        for bucket in stats.weekly_trend.iter().chain(&stats.recent_activity) {
            assert!(bucket.completion_rate >= 0.0 && bucket.completion_rate <= 1.0);
        }
    }

    #[test]
    fn test_milestones_across_subjects_with_cap() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        let walker = make_subject(&store, &user_id, "Walking");
        let start = date(2024, 2, 1);
        for i in 0..7 {
            log_event(&store, &walker, start + Duration::days(i), Outcome::Success);
        }

        let reader = make_subject(&store, &user_id, "Reading");
        log_event(&store, &reader, date(2024, 2, 20), Outcome::Success);

        let as_of = date(2024, 3, 1);
        let all = milestones::recent(&store, &user_id, as_of, None).expect("milestones");

        // walker: first_success + week_streak, reader: first_success
        assert_eq!(all.len(), 3);
        // Sorted most recent first
        assert!(all.windows(2).all(|w| w[0].achieved_on >= w[1].achieved_on));

        let capped = milestones::recent(&store, &user_id, as_of, Some(2)).expect("capped");
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_reminder_config_defaults_and_round_trip() {
        let (store, _file) = open_store();
        let user_id = UserId::new();

        // First read creates the defaults
        let config = store.get_reminder_config(&user_id).expect("defaults");
        assert!(config.enabled);
        assert_eq!(config.active_weekdays.len(), 7);

        let users = store.list_users_with_reminders().expect("users");
        assert!(users.contains(&user_id));

        // Weekday subset survives the Sunday-first storage encoding
        let updated = ReminderConfig {
            daily_reminder_enabled: true,
            daily_time: Some("07:15".to_string()),
            active_weekdays: vec![Weekday::Mon, Weekday::Wed, Weekday::Sun],
            ..config
        };
        store.put_reminder_config(&user_id, &updated).expect("put");

        let loaded = store.get_reminder_config(&user_id).expect("get");
        assert_eq!(loaded.daily_time.as_deref(), Some("07:15"));
        assert_eq!(loaded.active_weekdays.len(), 3);
        assert!(loaded.active_weekdays.contains(&Weekday::Mon));
        assert!(loaded.active_weekdays.contains(&Weekday::Wed));
        assert!(loaded.active_weekdays.contains(&Weekday::Sun));
    }

    #[test]
    fn test_calendar_groups_by_day() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let subject_a = make_subject(&store, &user_id, "Subject A");
        let subject_b = make_subject(&store, &user_id, "Subject B");

        log_event(&store, &subject_a, date(2024, 3, 5), Outcome::Success);
        log_event(&store, &subject_b, date(2024, 3, 5), Outcome::Fail);
        log_event(&store, &subject_a, date(2024, 3, 12), Outcome::Success);
        // Outside the month
        log_event(&store, &subject_a, date(2024, 4, 1), Outcome::Success);

        let days = dashboard::calendar(&store, &user_id, 2024, 3).expect("calendar");

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2024, 3, 5));
        assert_eq!(days[0].events.len(), 2);
        assert_eq!(days[1].date, date(2024, 3, 12));
        assert_eq!(days[1].events.len(), 1);
    }

    #[test]
    fn test_calendar_invalid_month_rejected() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let result = dashboard::calendar(&store, &user_id, 2024, 13);
        assert!(result.is_err());
    }

    #[test]
    fn test_insights_on_sparse_history() {
        let (store, _file) = open_store();
        let user_id = UserId::new();
        let subject = make_subject(&store, &user_id, "Sparse");
        log_event(&store, &subject, date(2024, 3, 1), Outcome::Success);

        let insights = insights::generate(&store, &user_id, date(2024, 3, 10)).expect("insights");

        // One event in 30 days: the low-frequency observation must appear
        assert!(insights
            .iter()
            .any(|i| i.title == "Practice frequency is low"));
    }
}
