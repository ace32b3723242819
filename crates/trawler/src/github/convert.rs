//! Translate GitHub API payloads into the shared source records.

use chrono::{DateTime, Utc};

use crate::source::{MetricSample, SourceRepository};

use super::types::GitHubRepo;

pub fn to_source_repository(repo: &GitHubRepo, sampled_at: DateTime<Utc>) -> SourceRepository {
    SourceRepository {
        name: repo.name.clone(),
        url: repo.html_url.clone(),
        clone_url: repo.clone_url.clone(),
        kind: "git".to_string(),
        metrics: MetricSample {
            starred: repo.stargazers_count,
            pulls: None,
            downloads: None,
            forks: repo.forks_count,
            watchers: repo.watchers_count,
            sampled_at,
        },
    }
}
