/// Basic unit tests to verify core functionality
use practice_insights::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_subject_creation() {
        let subject = Subject::new(
            UserId::new(),
            "Test subject".to_string(),
            date(2024, 1, 1),
            None,
        );

        assert!(subject.is_ok());
        let subject = subject.unwrap();
        assert_eq!(subject.name, "Test subject");
        assert!(subject.is_active);
    }

    #[test]
    fn test_event_record_creation() {
        let subject_id = SubjectId::new();

        let event = EventRecord::new(
            subject_id.clone(),
            date(2024, 3, 5),
            Outcome::Success,
            Some(4),
            Some("Solid session".to_string()),
        );

        assert!(event.is_ok());
        let event = event.unwrap();
        assert_eq!(event.subject_id, subject_id);
        assert_eq!(event.occurred_on, date(2024, 3, 5));
    }

    #[test]
    fn test_event_record_validation() {
        let result = EventRecord::new(
            SubjectId::new(),
            date(2024, 3, 5),
            Outcome::Success,
            Some(9),
            None,
        );
        assert!(result.is_err());

        let long_notes = "x".repeat(501);
        let result = EventRecord::new(
            SubjectId::new(),
            date(2024, 3, 5),
            Outcome::Success,
            None,
            Some(long_notes),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_reminder_config_defaults() {
        let config = ReminderConfig::default();
        assert!(config.enabled);
        assert!(!config.daily_reminder_enabled);
        assert_eq!(config.active_weekdays.len(), 7);
        assert_eq!(config.inactivity_threshold_days, 3);
        assert!(config.after_action_reminder);
        assert!(config.after_new_action_reminder);
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStore::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_storage_implements_trait() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStore::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        let _: &dyn PracticeStore = &storage;
    }
}
