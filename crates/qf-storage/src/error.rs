//! Mapping of driver errors onto the forum error taxonomy

use qf_core::{ConstraintKind, ForumError};
use sea_orm::{DbErr, SqlErr};

/// SQLite's messages for each constraint failure
const CONSTRAINT_MARKERS: [(&str, ConstraintKind); 4] = [
    ("UNIQUE constraint failed", ConstraintKind::Unique),
    ("FOREIGN KEY constraint failed", ConstraintKind::ForeignKey),
    ("NOT NULL constraint failed", ConstraintKind::NotNull),
    ("CHECK constraint failed", ConstraintKind::Check),
];

/// Classify a database error
pub(crate) fn db_err(err: DbErr) -> ForumError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return ForumError::constraint(ConstraintKind::Unique, detail)
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return ForumError::constraint(ConstraintKind::ForeignKey, detail)
        }
        _ => {}
    }

    let message = err.to_string();
    match constraint_kind(&message) {
        Some(kind) => ForumError::constraint(kind, message),
        None => ForumError::Database(message),
    }
}

fn constraint_kind(message: &str) -> Option<ConstraintKind> {
    CONSTRAINT_MARKERS
        .iter()
        .find(|(marker, _)| message.contains(marker))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_kind_from_message() {
        assert_eq!(
            constraint_kind("error returned from database: (code: 2067) UNIQUE constraint failed: user.email"),
            Some(ConstraintKind::Unique)
        );
        assert_eq!(
            constraint_kind("(code: 787) FOREIGN KEY constraint failed"),
            Some(ConstraintKind::ForeignKey)
        );
        assert_eq!(
            constraint_kind("NOT NULL constraint failed: question.subject"),
            Some(ConstraintKind::NotNull)
        );
        assert_eq!(
            constraint_kind("CHECK constraint failed: ck_user_username"),
            Some(ConstraintKind::Check)
        );
        assert_eq!(constraint_kind("database is locked"), None);
    }

    #[test]
    fn test_unclassified_error_is_database() {
        let err = db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, ForumError::Database(_)));
    }

    #[test]
    fn test_message_fallback() {
        let err = db_err(DbErr::Custom(
            "CHECK constraint failed: ck_question_subject".to_string(),
        ));
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Check));
    }
}
