//! Trawler - a metadata harvester for software-distribution platforms.
//!
//! Trawler repeatedly pulls project, release, repository and user metadata
//! from heterogeneous sources (module forges, git hosting, container
//! registries, code-review systems) into one relational store, without
//! creating duplicates and preserving historical popularity counters as
//! append-only snapshots.
//!
//! # Features
//!
//! - `forge`, `github`, `docker`, `gerrit` - the source adapters
//! - `migrate` - schema management support; enables
//!   [`connect_and_migrate`] to create the schema idempotently on connect
//!
//! # Example
//!
//! ```ignore
//! use trawler::{connect_and_migrate, forge::ForgeSource, harvest};
//!
//! let db = connect_and_migrate("sqlite://trawler.db?mode=rwc").await?;
//! let source = ForgeSource::new("https://forge.puppet.com")?;
//!
//! let summary = harvest::run(&source, &db).await?;
//! println!("{} projects ({} new)", summary.total_projects, summary.new_projects);
//! ```

pub mod db;
pub mod entity;
pub mod harvest;
pub mod http;
pub mod resolve;
pub mod source;

#[cfg(feature = "docker")]
pub mod docker;

#[cfg(feature = "forge")]
pub mod forge;

#[cfg(feature = "gerrit")]
pub mod gerrit;

#[cfg(feature = "github")]
pub mod github;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use harvest::{fetch_tree, run, HarvestError, PlatformTree, RunSummary};
pub use source::{RefreshMode, Source, SourceError};
