use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::platform_kind::PlatformKind;

use super::errors::Result;
use super::page::{Cursor, FixedCursor};

/// How a source reconciles with previously persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Find-or-create against existing rows; history accumulates.
    Incremental,
    /// Clear the platform's prior state before persisting the new fetch.
    /// Used by sources whose listings carry no usable natural keys beyond
    /// a bare name.
    FullReset,
}

/// Which field tuple uniquely identifies a project for a given source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKey {
    /// (platform, url)
    Url,
    /// (platform, name) - for forges where names are the listing identity.
    Name,
}

/// Which field tuple uniquely identifies a release for a given source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKey {
    /// Release page url.
    Url,
    /// (project, name, version, author).
    NameVersionAuthor,
}

/// A platform account attached to a project or release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUser {
    pub username: String,
    pub email: Option<String>,
}

/// One popularity-counter reading, stamped at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSample {
    pub starred: Option<i64>,
    pub pulls: Option<i64>,
    pub downloads: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
    pub sampled_at: DateTime<Utc>,
}

impl MetricSample {
    /// A sample with no counters, for sources that report none.
    #[must_use]
    pub fn empty(sampled_at: DateTime<Utc>) -> Self {
        Self {
            starred: None,
            pulls: None,
            downloads: None,
            forks: None,
            watchers: None,
            sampled_at,
        }
    }

    /// Whether at least one counter was reported.
    #[must_use]
    pub fn has_counts(&self) -> bool {
        self.starred.is_some()
            || self.pulls.is_some()
            || self.downloads.is_some()
            || self.forks.is_some()
            || self.watchers.is_some()
    }
}

/// A repository from any source (platform-agnostic representation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRepository {
    pub name: String,
    pub url: String,
    pub clone_url: Option<String>,
    /// Repository flavour ("git", "docker", "gerrit").
    pub kind: String,
    pub metrics: MetricSample,
}

/// A published release from any source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRelease {
    pub name: String,
    pub version: String,
    pub url: Option<String>,
    pub file_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<SourceUser>,
}

/// A project from any source.
///
/// Repositories are carried inline because the sources that produce them
/// (git hosting, container registries, code review) do so at project
/// granularity; releases are fetched lazily through `Source::releases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceProject {
    pub name: String,
    pub url: String,
    pub owner: Option<SourceUser>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub repositories: Vec<SourceRepository>,
}

/// Trait for remote source adapters.
///
/// Each adapter translates one platform's API shapes into the shared
/// records above. The harvest driver depends only on this interface: it
/// pulls `projects()` one item at a time, asks for `releases()` per
/// project, and never sees a raw payload.
#[async_trait]
pub trait Source: Send + Sync {
    /// Which platform kind this adapter produces.
    fn kind(&self) -> PlatformKind;

    /// Base url identifying the platform row this source reconciles into.
    fn base_url(&self) -> &str;

    /// Reconciliation policy for this source.
    fn refresh_mode(&self) -> RefreshMode {
        RefreshMode::Incremental
    }

    /// Natural key the resolver should use for this source's projects.
    fn project_key(&self) -> ProjectKey {
        ProjectKey::Url
    }

    /// Natural key the resolver should use for this source's releases.
    fn release_key(&self) -> ReleaseKey {
        ReleaseKey::Url
    }

    /// Lazy, forward-only sequence of the source's projects.
    async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>>;

    /// Lazy sequence of one project's releases. Sources without a release
    /// concept yield an exhausted cursor.
    async fn releases(&self, _project: &SourceProject) -> Result<Box<dyn Cursor<SourceRelease>>> {
        Ok(Box::new(FixedCursor::empty()))
    }
}
