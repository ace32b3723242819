//! Docker registry API data types.

use serde::Deserialize;

/// An owner profile as answered by `GET /v2/users/{owner}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerUser {
    pub username: String,
}

/// One page of `GET /v2/repositories/{owner}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerRepoPage {
    /// Url of the next page; null on the last one.
    pub next: Option<String>,
    pub results: Vec<DockerRepo>,
}

/// A repository with its popularity counters.
#[derive(Debug, Clone, Deserialize)]
pub struct DockerRepo {
    pub name: String,
    #[serde(default)]
    pub star_count: Option<i64>,
    #[serde(default)]
    pub pull_count: Option<i64>,
}
