//! Module forge API data types.
//!
//! Deserialize-only DTOs carrying just the fields we need, which keeps the
//! adapter resilient to API additions.

use serde::Deserialize;

/// One page of a `/v3` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgePage<T> {
    pub pagination: ForgePagination,
    pub results: Vec<T>,
}

/// Pagination marker; `next` is null on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgePagination {
    pub next: Option<String>,
}

/// A module as listed by `/v3/modules`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeModule {
    pub name: String,
    pub owner: ForgeOwner,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Module or release owner.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeOwner {
    pub username: String,
}

/// A release as listed by `/v3/releases`.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeRelease {
    pub version: String,
    pub module: ForgeReleaseModule,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub file_uri: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// The module a release belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgeReleaseModule {
    pub name: String,
    pub owner: ForgeOwner,
}
