//! Source-agnostic adapter surface.
//!
//! This module defines the `Source` trait implemented by every platform
//! adapter, the platform-agnostic records adapters translate into, and the
//! paginated fetch cursor they build their listings from. The harvest
//! driver depends only on these types.

mod errors;
mod page;
mod types;

pub use errors::{Result, SourceError};
pub use page::{collect, Cursor, FixedCursor, Page, PageOutcome, PageSource, Paginated};
pub use types::{
    MetricSample, ProjectKey, RefreshMode, ReleaseKey, Source, SourceProject, SourceRelease,
    SourceRepository, SourceUser,
};

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_source_error_transport() {
        let err = SourceError::transport("connection refused");
        assert!(err.to_string().contains("transport error"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_source_error_not_found_names_the_resource() {
        let err = SourceError::not_found("organization bitergia");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("organization bitergia"));
    }

    #[test]
    fn test_source_error_forbidden() {
        let err = SourceError::forbidden("rate limit exceeded");
        assert!(err.to_string().contains("forbidden"));
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[test]
    fn test_source_error_auth_rejected() {
        let err = SourceError::AuthRejected;
        assert!(err.to_string().contains("authentication rejected"));
    }

    #[test]
    fn test_source_error_translation_carries_context() {
        let err = SourceError::translation("module stdlib", "missing field `owner`");
        let msg = err.to_string();
        assert!(msg.contains("module stdlib"));
        assert!(msg.contains("missing field `owner`"));
    }

    #[test]
    fn test_metric_sample_has_counts() {
        let now = Utc::now();
        assert!(!MetricSample::empty(now).has_counts());

        let sample = MetricSample {
            pulls: Some(12),
            ..MetricSample::empty(now)
        };
        assert!(sample.has_counts());
    }

    #[test]
    fn test_refresh_mode_default_is_incremental() {
        use crate::entity::platform_kind::PlatformKind;
        use async_trait::async_trait;

        struct Minimal;

        #[async_trait]
        impl Source for Minimal {
            fn kind(&self) -> PlatformKind {
                PlatformKind::Forge
            }

            fn base_url(&self) -> &str {
                "https://example.com"
            }

            async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
                Ok(Box::new(FixedCursor::empty()))
            }
        }

        let source = Minimal;
        assert_eq!(source.refresh_mode(), RefreshMode::Incremental);
        assert_eq!(source.project_key(), ProjectKey::Url);
        assert_eq!(source.release_key(), ReleaseKey::Url);
    }

    #[tokio::test]
    async fn test_default_releases_cursor_is_exhausted() {
        use crate::entity::platform_kind::PlatformKind;
        use async_trait::async_trait;

        struct Minimal;

        #[async_trait]
        impl Source for Minimal {
            fn kind(&self) -> PlatformKind {
                PlatformKind::Gerrit
            }

            fn base_url(&self) -> &str {
                "gerrit.example.com"
            }

            async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
                Ok(Box::new(FixedCursor::empty()))
            }
        }

        let project = SourceProject {
            name: "p".to_string(),
            url: "u".to_string(),
            owner: None,
            created_at: None,
            updated_at: None,
            repositories: Vec::new(),
        };

        let mut cursor = Minimal
            .releases(&project)
            .await
            .expect("default releases cursor");
        assert!(cursor.try_next().await.expect("end").is_none());
    }
}
