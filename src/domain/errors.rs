//! Error taxonomy of the link registry and its store.
//!
//! These errors carry no transport semantics. Mapping to HTTP status codes happens in
//! [`crate::error::AppError`].

/// Failures raised by a slug or click store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A storage-level uniqueness constraint rejected a write.
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },
}

/// Errors returned by registry and click-recorder operations.
///
/// Every variant except [`LinkError::Storage`] is deterministic: repeating the same call
/// against the same store state yields the same error.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The slug is not part of the pool.
    #[error("Slug '{slug}' is not valid")]
    InvalidSlug { slug: String },

    /// The slug exists but has no target URL.
    #[error("Slug '{slug}' is not in use")]
    SlugNotInUse { slug: String },

    /// A caller-directed assignment named a slug that is already active.
    #[error("Slug '{slug}' is already in use for target url '{target_url}'")]
    SlugAlreadyInUse { slug: String, target_url: String },

    /// Another active slug already redirects to this URL.
    #[error("Link with target url '{target_url}' already exists under slug '{slug}'")]
    TargetUrlAlreadyExists { target_url: String, slug: String },

    /// System-directed assignment found no free slug.
    #[error("No unused slugs are available")]
    NoAvailableSlugs,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl LinkError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            LinkError::InvalidSlug { .. } => "invalid_slug",
            LinkError::SlugNotInUse { .. } => "slug_not_in_use",
            LinkError::SlugAlreadyInUse { .. } => "slug_already_in_use",
            LinkError::TargetUrlAlreadyExists { .. } => "target_url_already_exists",
            LinkError::NoAvailableSlugs => "no_available_slugs",
            LinkError::Storage(_) => "storage_error",
        }
    }

    pub(crate) fn invalid_slug(slug: &str) -> Self {
        LinkError::InvalidSlug {
            slug: slug.to_string(),
        }
    }

    pub(crate) fn not_in_use(slug: &str) -> Self {
        LinkError::SlugNotInUse {
            slug: slug.to_string(),
        }
    }
}

impl From<sqlx::Error> for LinkError {
    fn from(e: sqlx::Error) -> Self {
        LinkError::Storage(StoreError::from(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            LinkError::invalid_slug("a"),
            LinkError::not_in_use("a"),
            LinkError::SlugAlreadyInUse {
                slug: "a".to_string(),
                target_url: "https://x.com".to_string(),
            },
            LinkError::TargetUrlAlreadyExists {
                target_url: "https://x.com".to_string(),
                slug: "a".to_string(),
            },
            LinkError::NoAvailableSlugs,
        ];

        let mut codes: Vec<_> = errors.iter().map(LinkError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_target_url_conflict_names_holder() {
        let err = LinkError::TargetUrlAlreadyExists {
            target_url: "https://x.com".to_string(),
            slug: "bored-bulbasaur".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Link with target url 'https://x.com' already exists under slug 'bored-bulbasaur'"
        );
    }

    #[test]
    fn test_storage_conflict_message() {
        let err = LinkError::from(StoreError::Conflict {
            constraint: "slugs_target_url_key".to_string(),
        });

        assert_eq!(err.code(), "storage_error");
        assert!(err.to_string().contains("slugs_target_url_key"));
    }
}
