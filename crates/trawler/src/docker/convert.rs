//! Translate Docker registry payloads into the shared source records.

use chrono::{DateTime, Utc};

use crate::source::{MetricSample, SourceRepository};

use super::types::DockerRepo;

pub fn to_source_repository(
    base_url: &str,
    owner: &str,
    repo: &DockerRepo,
    sampled_at: DateTime<Utc>,
) -> SourceRepository {
    SourceRepository {
        name: repo.name.clone(),
        url: format!("{}/r/{}/{}", base_url, owner, repo.name),
        clone_url: None,
        kind: "docker".to_string(),
        metrics: MetricSample {
            starred: repo.star_count,
            pulls: repo.pull_count,
            downloads: None,
            forks: None,
            watchers: None,
            sampled_at,
        },
    }
}
