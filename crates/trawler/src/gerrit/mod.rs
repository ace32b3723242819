//! Gerrit code-review adapter.
//!
//! Lists repositories with `gerrit ls-projects` over the SSH command
//! channel, parsing the newline-delimited name list. No pagination, no
//! per-item detail fetch. Gerrit listings carry no usable natural key
//! beyond the bare name, so the source declares full-reset reconciliation:
//! the driver clears the platform's prior state before persisting.

mod shell;

pub use shell::{ShellTransport, Ssh2Transport};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::entity::platform_kind::PlatformKind;
use crate::source::{
    Cursor, FixedCursor, MetricSample, ProjectKey, RefreshMode, Result, Source, SourceProject,
    SourceRepository,
};

/// Gerrit's standard SSH command port.
pub const GERRIT_SSH_PORT: u16 = 29418;

const LS_PROJECTS: &str = "gerrit ls-projects";

/// Code-review source adapter.
pub struct GerritSource {
    shell: Arc<dyn ShellTransport>,
    host: String,
    user: String,
}

impl GerritSource {
    /// Create a gerrit source for `host`, authenticating as `user`.
    /// The user's key must already be known to the server.
    pub fn new(host: &str, user: &str) -> Self {
        Self::with_shell(host, user, Arc::new(Ssh2Transport))
    }

    pub fn with_shell(host: &str, user: &str, shell: Arc<dyn ShellTransport>) -> Self {
        Self {
            shell,
            host: host.to_string(),
            user: user.to_string(),
        }
    }

    fn repository_url(&self, name: &str) -> String {
        format!("ssh://{}:{}/{}", self.host, GERRIT_SSH_PORT, name)
    }
}

#[async_trait]
impl Source for GerritSource {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Gerrit
    }

    fn base_url(&self) -> &str {
        &self.host
    }

    fn refresh_mode(&self) -> RefreshMode {
        RefreshMode::FullReset
    }

    fn project_key(&self) -> ProjectKey {
        ProjectKey::Name
    }

    async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
        let output = self
            .shell
            .exec(&self.user, &self.host, GERRIT_SSH_PORT, LS_PROJECTS)
            .await?;

        let now = Utc::now();
        let repositories: Vec<SourceRepository> = output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| SourceRepository {
                name: name.to_string(),
                url: self.repository_url(name),
                clone_url: Some(self.repository_url(name)),
                kind: "gerrit".to_string(),
                metrics: MetricSample::empty(now),
            })
            .collect();

        let project = SourceProject {
            name: self.host.clone(),
            url: format!("ssh://{}", self.host),
            owner: None,
            created_at: None,
            updated_at: None,
            repositories,
        };

        Ok(Box::new(FixedCursor::new(vec![project])))
    }
}
