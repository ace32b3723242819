//! Module forge client: paginated project and release listings.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::entity::platform_kind::PlatformKind;
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpRequest, HttpTransport};
use crate::source::{
    Cursor, Page, PageOutcome, PageSource, Paginated, ProjectKey, ReleaseKey, Result, Source,
    SourceError, SourceProject, SourceRelease,
};

use super::convert::{to_source_project, to_source_release};
use super::types::{ForgeModule, ForgePage, ForgeRelease};

/// Page size for forge listings.
pub const PROJECTS_LIMIT: u64 = 20;

const MODULES_PATH: &str = "/v3/modules";
const RELEASES_PATH: &str = "/v3/releases";

/// Package-forge source adapter.
pub struct ForgeSource {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl ForgeSource {
    /// Create a forge source for `base_url` with the default HTTP transport.
    pub fn new(base_url: &str) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(SourceError::from)?;
        Ok(Self::with_transport(base_url, Arc::new(transport)))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Source for ForgeSource {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Forge
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn project_key(&self) -> ProjectKey {
        ProjectKey::Name
    }

    fn release_key(&self) -> ReleaseKey {
        ReleaseKey::NameVersionAuthor
    }

    async fn projects(&self) -> Result<Box<dyn Cursor<SourceProject>>> {
        Ok(Box::new(Paginated::new(
            ModulesPages {
                transport: Arc::clone(&self.transport),
                base_url: self.base_url.clone(),
            },
            PROJECTS_LIMIT,
        )))
    }

    async fn releases(&self, project: &SourceProject) -> Result<Box<dyn Cursor<SourceRelease>>> {
        let owner = project.owner.as_ref().ok_or_else(|| {
            SourceError::translation(project.name.as_str(), "module listing entry has no owner")
        })?;
        let module = format!("{}-{}", owner.username, project.name);

        Ok(Box::new(Paginated::new(
            ReleasesPages {
                transport: Arc::clone(&self.transport),
                base_url: self.base_url.clone(),
                module,
            },
            PROJECTS_LIMIT,
        )))
    }
}

/// What one listing request produced, before translation.
enum Listing<T> {
    Page(ForgePage<T>),
    Failed(String),
}

/// Extract the message of an application-level error payload, if the body
/// is one. The forge reports bad listings as `{"message": ..., "errors":
/// [...]}` bodies.
fn error_payload_message(value: &Value) -> Option<String> {
    let errors = value.get("errors")?;

    let mut parts: Vec<String> = Vec::new();
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        parts.push(message.to_string());
    }
    if let Some(list) = errors.as_array() {
        parts.extend(list.iter().filter_map(|e| e.as_str().map(str::to_string)));
    }

    if parts.is_empty() {
        Some("unspecified error payload".to_string())
    } else {
        Some(parts.join(": "))
    }
}

async fn fetch_listing<T: DeserializeOwned>(
    transport: &dyn HttpTransport,
    url: &str,
    context: &str,
) -> Result<Listing<T>> {
    let response = transport.get(HttpRequest::get(url)).await?;

    // An error payload can ride on any status; it ends the listing softly.
    let value: Option<Value> = serde_json::from_slice(&response.body).ok();
    if let Some(message) = value.as_ref().and_then(error_payload_message) {
        return Ok(Listing::Failed(message));
    }

    if !response.is_success() {
        return Err(SourceError::transport(format!(
            "{} returned status {}",
            url, response.status
        )));
    }

    let value =
        value.ok_or_else(|| SourceError::translation(context, "response body is not JSON"))?;
    let page: ForgePage<T> = serde_json::from_value(value)
        .map_err(|e| SourceError::translation(context, e.to_string()))?;
    Ok(Listing::Page(page))
}

/// `/v3/modules` listing.
struct ModulesPages {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

#[async_trait]
impl PageSource for ModulesPages {
    type Item = SourceProject;

    fn label(&self) -> String {
        format!("module listing at {}", self.base_url)
    }

    async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<SourceProject>> {
        let url = format!(
            "{}{}?offset={}&limit={}",
            self.base_url, MODULES_PATH, offset, limit
        );

        match fetch_listing::<ForgeModule>(self.transport.as_ref(), &url, &self.label()).await? {
            Listing::Failed(message) => Ok(PageOutcome::Failed { message }),
            Listing::Page(page) => Ok(PageOutcome::Items(Page {
                has_more: page.pagination.next.is_some(),
                items: page
                    .results
                    .iter()
                    .map(|m| to_source_project(&self.base_url, m))
                    .collect(),
            })),
        }
    }
}

/// `/v3/releases?module=owner-name` listing.
struct ReleasesPages {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
    module: String,
}

#[async_trait]
impl PageSource for ReleasesPages {
    type Item = SourceRelease;

    fn label(&self) -> String {
        format!("releases for {}", self.module)
    }

    async fn page(&mut self, offset: u64, limit: u64) -> Result<PageOutcome<SourceRelease>> {
        let url = format!(
            "{}{}?module={}&offset={}&limit={}",
            self.base_url, RELEASES_PATH, self.module, offset, limit
        );

        match fetch_listing::<ForgeRelease>(self.transport.as_ref(), &url, &self.label()).await? {
            Listing::Failed(message) => Ok(PageOutcome::Failed { message }),
            Listing::Page(page) => Ok(PageOutcome::Items(Page {
                has_more: page.pagination.next.is_some(),
                items: page
                    .results
                    .iter()
                    .map(|r| to_source_release(&self.base_url, r))
                    .collect(),
            })),
        }
    }
}
