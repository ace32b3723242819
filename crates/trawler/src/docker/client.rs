//! Docker registry client: owner profile and repository counter fetches.

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
    Source, SourceError, SourceProject, SourceRepository,
};

use super::convert::to_source_repository;
use super::types::{DockerRepo, DockerRepoPage, DockerUser};

/// Page size for repository listings.
const PAGE_SIZE: u64 = 20;

/// Container-registry source adapter.
pub struct DockerSource {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    owner: String,
    repository: Option<String>,
}

impl DockerSource {
    /// Create a registry source for `owner` (optionally one `repository`)
    /// on the registry at `base_url`.
    pub fn new(base_url: &str, owner: &str, repository: Option<String>) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(SourceError::from)?;
        Ok(Self::with_transport(
            base_url,
            owner,
            repository,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        base_url: &str,
        owner: &str,
        repository: Option<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repository,
        }
    }
}

/// Issue a GET and map registry status answers onto the error taxonomy.
async fn get_json<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    url: &str,
    resource: &str,
) -> Result<T> {
    let response = transport.get(HttpRequest::get(url)).await?;

    match response.status {
        status if (200..300).contains(&status) => serde_json::from_slice(&response.body)
            .map_err(|e| SourceError::translation(resource, e.to_string())),
        401 => Err(SourceError::AuthRejected),
        403 => Err(SourceError::forbidden(format!("{} refused", resource))),
        404 => Err(SourceError::not_found(resource)),
        status => Err(SourceError::transport(format!(
            "{} returned status {}",
            url, status
        ))),
    }
}

/// `GET /v2/repositories/{owner}/` listing.
struct RepoPages {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    owner: String,
}

#[async_trait]
impl PageSource for RepoPages {
    type Item = DockerRepo;

    fn label(&self) -> String {
        format!("repositories of {}", self.owner)
    }

    async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<DockerRepo>> {
        let page = offset / limit + 1;
        let url = format!(
            "{}/v2/repositories/{}/?page={}&page_size={}",
            self.base_url, self.owner, page, limit
        );

        let listing: DockerRepoPage =
            get_json(self.transport.as_ref(), &url, &self.label()).await?;

        Ok(PageOutcome::Items(Page {
            has_more: listing.next.is_some(),
            items: listing.results,
        }))
    }
}

#[async_trait]
impl Source for DockerSource {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Docker
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_key(&self) -> ProjectKey {
        ProjectKey::Url
    }

    async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
        let profile: DockerUser = get_json(
            self.transport.as_ref(),
            &format!("{}/v2/users/{}/", self.base_url, self.owner),
            &format!("owner {}", self.owner),
        )
        .await?;

        let repos: Vec<DockerRepo> = match &self.repository {
            Some(name) => {
                let repo = get_json(
                    self.transport.as_ref(),
                    &format!("{}/v2/repositories/{}/{}/", self.base_url, self.owner, name),
                    &format!("repository {}/{}", self.owner, name),
                )
                .await?;
                vec![repo]
            }
            None => {
                let mut cursor = Paginated::new(
                    RepoPages {
                        transport: Arc::clone(&self.transport),
                        base_url: self.base_url.clone(),
                        owner: self.owner.clone(),
                    },
                    PAGE_SIZE,
                );
                collect(&mut cursor).await?
            }
        };

        // Counter readings are stamped at fetch time; the driver persists
        // one snapshot per repository from this sample.
        let now = Utc::now();
        let repositories: Vec<SourceRepository> = repos
            .iter()
            .map(|r| to_source_repository(&self.base_url, &profile.username, r, now))
            .collect();

        let project = SourceProject {
            name: profile.username.clone(),
            url: format!("{}/u/{}", self.base_url, profile.username),
            owner: None,
            created_at: None,
            updated_at: None,
            repositories,
        };

        Ok(Box::new(FixedCursor::new(vec![project])))
    }
}
