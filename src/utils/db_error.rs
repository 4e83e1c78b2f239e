//! Translation of SQLx errors into store errors.

use crate::domain::errors::StoreError;

/// Constraint guarding uniqueness of assigned target URLs.
pub const TARGET_URL_CONSTRAINT: &str = "slugs_target_url_key";

/// Converts a database error, surfacing unique violations as [`StoreError::Conflict`].
pub fn map_store_error(e: sqlx::Error) -> StoreError {
    if let Some(db_err) = e.as_database_error()
        && db_err.is_unique_violation()
    {
        return StoreError::Conflict {
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        };
    }

    StoreError::Database(e)
}

/// Returns true if `e` is a unique violation on the target URL constraint.
pub fn is_target_url_conflict(e: &StoreError) -> bool {
    matches!(e, StoreError::Conflict { constraint } if constraint == TARGET_URL_CONSTRAINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_passes_through() {
        let err = map_store_error(sqlx::Error::RowNotFound);

        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
        assert!(!is_target_url_conflict(&err));
    }

    #[test]
    fn test_target_url_conflict_detection() {
        let conflict = StoreError::Conflict {
            constraint: TARGET_URL_CONSTRAINT.to_string(),
        };
        let other = StoreError::Conflict {
            constraint: "slugs_slug_key".to_string(),
        };

        assert!(is_target_url_conflict(&conflict));
        assert!(!is_target_url_conflict(&other));
    }
}
