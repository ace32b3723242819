//! GitHub API data types - the fields we need from the REST answers.

use serde::Deserialize;

/// An organization as answered by `GET /orgs/{owner}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubOrg {
    pub login: String,
    pub html_url: String,
}

/// A repository as answered by the repos endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub stargazers_count: Option<i64>,
    #[serde(default)]
    pub forks_count: Option<i64>,
    #[serde(default)]
    pub watchers_count: Option<i64>,
}
