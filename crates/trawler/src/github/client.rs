//! GitHub client: organization resolution and repository listings.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::entity::platform_kind::PlatformKind;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpRequest, HttpTransport};
use crate::source::{
    collect, Cursor, FixedCursor, Page, PageOutcome, PageSource, Paginated, ProjectKey, Result,
    Source, SourceError, SourceProject,
};

use super::convert::to_source_repository;
use super::types::{GitHubOrg, GitHubRepo};

/// Canonical GitHub web url; doubles as the platform's base url.
pub const GITHUB_URL: &str = "https://github.com/";

/// Canonical GitHub REST endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Page size for repository listings.
const PAGE_SIZE: u64 = 100;

/// Git-hosting source adapter for GitHub.
pub struct GitHubSource {
    transport: Arc<dyn HttpTransport>,
    /// Platform base url (web), the reconciliation identity.
    base_url: String,
    /// REST endpoint the requests go to.
    api_url: String,
    owner: String,
    repository: Option<String>,
    token: Option<String>,
}

impl GitHubSource {
    /// Create a GitHub source for `owner` (optionally one `repository`).
    ///
    /// `enterprise_url` switches both the platform identity and the REST
    /// endpoint to a GitHub Enterprise deployment; `token` is sent as a
    /// bearer credential when present.
    pub fn new(
        owner: &str,
        repository: Option<String>,
        token: Option<String>,
        enterprise_url: Option<&str>,
    ) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(SourceError::from)?;
        Ok(Self::with_transport(
            owner,
            repository,
            token,
            enterprise_url,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        owner: &str,
        repository: Option<String>,
        token: Option<String>,
        enterprise_url: Option<&str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let (base_url, api_url) = match enterprise_url {
            Some(url) => {
                let trimmed = url.trim_end_matches('/');
                // GitHub Enterprise serves the REST API under /api/v3
                (format!("{}/", trimmed), format!("{}/api/v3", trimmed))
            }
            None => (GITHUB_URL.to_string(), GITHUB_API_URL.to_string()),
        };

        Self {
            transport,
            base_url,
            api_url,
            owner: owner.to_string(),
            repository,
            token,
        }
    }
}

/// Issue an authenticated GET and map GitHub's status answers onto the
/// error taxonomy: 404 names the missing resource, 401 is a credential
/// rejection, 403 is forbidden (usually rate limiting).
async fn get_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    token: Option<&str>,
    url: &str,
    resource: &str,
) -> Result<T> {
    let mut request = HttpRequest::get(url);
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let response = transport.get(request).await?;

    match response.status {
        status if (200..300).contains(&status) => serde_json::from_slice(&response.body)
            .map_err(|e| SourceError::translation(resource, e.to_string())),
        401 => Err(SourceError::AuthRejected),
        403 => {
            let message = serde_json::from_slice::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| "forbidden, possibly rate limited".to_string());
            Err(SourceError::forbidden(message))
        }
        404 => Err(SourceError::not_found(resource)),
        status => Err(SourceError::transport(format!(
            "{} returned status {}",
            url, status
        ))),
    }
}

/// `GET /orgs/{owner}/repos` listing, one page per request.
struct OrgRepoPages {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    owner: String,
    token: Option<String>,
}

#[async_trait]
impl PageSource for OrgRepoPages {
    type Item = GitHubRepo;

    fn label(&self) -> String {
        format!("repositories of {}", self.owner)
    }

    async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<GitHubRepo>> {
        let page = offset / limit + 1;
        let url = format!(
            "{}/orgs/{}/repos?per_page={}&page={}",
            self.api_url, self.owner, limit, page
        );

        let items: Vec<GitHubRepo> = get_json(
            self.transport.as_ref(),
            self.token.as_deref(),
            &url,
            &self.label(),
        )
        .await?;

        // A short page means the listing ran out; GitHub has no inline marker.
        let has_more = items.len() as u64 == limit;
        Ok(PageOutcome::Items(Page { items, has_more }))
    }
}

#[async_trait]
impl Source for GitHubSource {
    fn kind(&self) -> PlatformKind {
        PlatformKind::GitHub
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_key(&self) -> ProjectKey {
        ProjectKey::Url
    }

    async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
        let org: GitHubOrg = get_json(
            self.transport.as_ref(),
            self.token.as_deref(),
            &format!("{}/orgs/{}", self.api_url, self.owner),
            &format!("organization {}", self.owner),
        )
        .await?;

        let repos: Vec<GitHubRepo> = match &self.repository {
            Some(name) => {
                let repo = get_json(
                    self.transport.as_ref(),
                    self.token.as_deref(),
                    &format!("{}/repos/{}/{}", self.api_url, self.owner, name),
                    &format!("repository {}/{}", self.owner, name),
                )
                .await?;
                vec![repo]
            }
            None => {
                let mut cursor = Paginated::new(
                    OrgRepoPages {
                        transport: Arc::clone(&self.transport),
                        api_url: self.api_url.clone(),
                        owner: self.owner.clone(),
                        token: self.token.clone(),
                    },
                    PAGE_SIZE,
                );
                collect(&mut cursor).await?
            }
        };

        let now = Utc::now();
        let project = SourceProject {
            name: org.login,
            url: org.html_url,
            owner: None,
            created_at: None,
            updated_at: None,
            repositories: repos
                .iter()
                .map(|r| to_source_repository(r, now))
                .collect(),
        };

        Ok(Box::new(FixedCursor::new(vec![project])))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::http::{header_get, MockTransport};

    use super::*;

    fn org_json(owner: &str) -> String {
        json!({
            "login": owner,
            "html_url": format!("https://github.com/{owner}")
        })
        .to_string()
    }

    fn repo_json(owner: &str, name: &str, stars: i64) -> Value {
        json!({
            "name": name,
            "html_url": format!("https://github.com/{owner}/{name}"),
            "clone_url": format!("https://github.com/{owner}/{name}.git"),
            "stargazers_count": stars,
            "forks_count": 2,
            "watchers_count": stars
        })
    }

    fn repos_url(owner: &str, page: u64) -> String {
        format!("{GITHUB_API_URL}/orgs/{owner}/repos?per_page=100&page={page}")
    }

    fn source(transport: MockTransport, owner: &str, repository: Option<&str>) -> GitHubSource {
        GitHubSource::with_transport(
            owner,
            repository.map(str::to_string),
            None,
            None,
            Arc::new(transport),
        )
    }

    #[tokio::test]
    async fn missing_organization_is_a_named_not_found() {
        let transport = MockTransport::new();
        transport.push_status(format!("{GITHUB_API_URL}/orgs/ghost"), 404);

        let err = source(transport, "ghost", None)
            .projects()
            .await
            .map(drop)
            .expect_err("missing org should fail");
        match err {
            SourceError::NotFound { resource } => {
                assert_eq!(resource, "organization ghost");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_repository_is_a_named_not_found() {
        let transport = MockTransport::new();
        transport.push_json(format!("{GITHUB_API_URL}/orgs/octocat"), &org_json("octocat"));
        transport.push_status(format!("{GITHUB_API_URL}/repos/octocat/ghost"), 404);

        let err = source(transport, "octocat", Some("ghost"))
            .projects()
            .await
            .map(drop)
            .expect_err("missing repo should fail");
        match err {
            SourceError::NotFound { resource } => {
                assert_eq!(resource, "repository octocat/ghost");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_credentials_and_rate_limits_are_distinct() {
        let transport = MockTransport::new();
        transport.push_status(format!("{GITHUB_API_URL}/orgs/octocat"), 401);
        let err = source(transport, "octocat", None)
            .projects()
            .await
            .map(drop)
            .expect_err("401 should fail");
        assert!(matches!(err, SourceError::AuthRejected));

        let transport = MockTransport::new();
        transport.push_response(
            format!("{GITHUB_API_URL}/orgs/octocat"),
            crate::http::HttpResponse {
                status: 403,
                headers: Vec::new(),
                body: br#"{"message":"API rate limit exceeded"}"#.to_vec(),
            },
        );
        let err = source(transport, "octocat", None)
            .projects()
            .await
            .map(drop)
            .expect_err("403 should fail");
        match err {
            SourceError::Forbidden { message } => {
                assert!(message.contains("rate limit"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_repository_fetch_translates_counters() {
        let transport = MockTransport::new();
        transport.push_json(format!("{GITHUB_API_URL}/orgs/octocat"), &org_json("octocat"));
        transport.push_json(
            format!("{GITHUB_API_URL}/repos/octocat/hello-world"),
            &repo_json("octocat", "hello-world", 1420).to_string(),
        );

        let mut cursor = source(transport, "octocat", Some("hello-world"))
            .projects()
            .await
            .expect("projects cursor");
        let project = cursor
            .try_next()
            .await
            .expect("project")
            .expect("one project");

        assert_eq!(project.name, "octocat");
        assert_eq!(project.url, "https://github.com/octocat");
        assert_eq!(project.repositories.len(), 1);
        assert_eq!(project.repositories[0].metrics.starred, Some(1420));
        assert!(cursor.try_next().await.expect("end").is_none());
    }

    #[tokio::test]
    async fn full_listing_walks_pages_until_a_short_one() {
        let transport = MockTransport::new();
        transport.push_json(format!("{GITHUB_API_URL}/orgs/bigorg"), &org_json("bigorg"));

        let first: Vec<Value> = (0..100)
            .map(|i| repo_json("bigorg", &format!("repo{i}"), i))
            .collect();
        let second: Vec<Value> = (100..103)
            .map(|i| repo_json("bigorg", &format!("repo{i}"), i))
            .collect();
        transport.push_json(repos_url("bigorg", 1), &Value::Array(first).to_string());
        transport.push_json(repos_url("bigorg", 2), &Value::Array(second).to_string());

        let mut cursor = source(transport, "bigorg", None)
            .projects()
            .await
            .expect("projects cursor");
        let project = cursor
            .try_next()
            .await
            .expect("project")
            .expect("one project");

        assert_eq!(project.repositories.len(), 103);
        assert_eq!(project.repositories[0].name, "repo0");
        assert_eq!(project.repositories[102].name, "repo102");
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer_credential() {
        let transport = MockTransport::new();
        transport.push_json(format!("{GITHUB_API_URL}/orgs/octocat"), &org_json("octocat"));
        transport.push_json(repos_url("octocat", 1), "[]");

        let source = GitHubSource::with_transport(
            "octocat",
            None,
            Some("sekrit".to_string()),
            None,
            Arc::new(transport.clone()),
        );
        let _ = source.projects().await.expect("projects cursor");

        let requests = transport.requests();
        assert!(!requests.is_empty());
        assert_eq!(
            header_get(&requests[0].headers, "authorization"),
            Some("Bearer sekrit")
        );
    }

    #[tokio::test]
    async fn enterprise_url_redirects_identity_and_api() {
        let transport = MockTransport::new();
        transport.push_json(
            "https://github.example.com/api/v3/orgs/internal",
            &json!({
                "login": "internal",
                "html_url": "https://github.example.com/internal"
            })
            .to_string(),
        );
        transport.push_json(
            "https://github.example.com/api/v3/orgs/internal/repos?per_page=100&page=1",
            "[]",
        );

        let source = GitHubSource::with_transport(
            "internal",
            None,
            None,
            Some("https://github.example.com"),
            Arc::new(transport),
        );
        assert_eq!(source.base_url(), "https://github.example.com/");

        let mut cursor = source.projects().await.expect("projects cursor");
        let project = cursor
            .try_next()
            .await
            .expect("project")
            .expect("one project");
        assert_eq!(project.url, "https://github.example.com/internal");
    }

    #[cfg(feature = "migrate")]
    mod harvest {
        use sea_orm::{EntityTrait, PaginatorTrait};

        use crate::connect_and_migrate;
        use crate::entity::prelude::{Platform, Project};
        use crate::harvest::{self, HarvestError};

        use super::*;

        #[tokio::test]
        async fn nothing_is_committed_when_the_organization_is_missing() {
            let transport = MockTransport::new();
            transport.push_status(format!("{GITHUB_API_URL}/orgs/ghost"), 404);

            let db = connect_and_migrate("sqlite::memory:")
                .await
                .expect("test db should migrate");

            let err = harvest::run(&source(transport, "ghost", None), &db)
                .await
                .expect_err("run should fail");
            match &err {
                HarvestError::Source { source, .. } => {
                    assert!(source.to_string().contains("organization ghost"));
                }
                other => panic!("unexpected error: {other:?}"),
            }

            // Full rollback: not even the platform row survives
            assert_eq!(Platform::find().count(&db).await.expect("count"), 0);
            assert_eq!(Project::find().count(&db).await.expect("count"), 0);
        }
    }
}
