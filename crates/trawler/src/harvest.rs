//! Harvest driver: drives one source through identity resolution into the
//! store.
//!
//! One run is one transaction. The driver pulls the source's project cursor
//! one item at a time (large sources never materialize in memory), resolves
//! owners, projects, releases and repositories by their natural keys,
//! appends one metric snapshot per repository, and commits once at the end.
//! Any unrecovered error rolls the whole run back; the store never sees a
//! partial harvest.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel, QueryFilter, Set, TransactionTrait,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::platform_kind::PlatformKind;
use crate::entity::{project, project_user, release, repository, snapshot};
use crate::resolve::{self, UserCache};
use crate::source::{
    collect, MetricSample, RefreshMode, Source, SourceError, SourceProject, SourceRelease,
};

/// Errors that can abort a harvesting run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The remote source failed; the message names the adapter kind, the
    /// base url and the resource involved.
    #[error("{kind} source {url}: {source}")]
    Source {
        kind: PlatformKind,
        url: String,
        #[source]
        source: SourceError,
    },

    /// The store rejected a read or write; pending writes were rolled back.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// New-vs-total counts observed by one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total_projects: usize,
    pub new_projects: usize,
    pub total_releases: usize,
    pub new_releases: usize,
}

fn wrap(source: &dyn Source, err: SourceError) -> HarvestError {
    HarvestError::Source {
        kind: source.kind(),
        url: source.base_url().to_string(),
        source: err,
    }
}

/// Execute one harvesting run: fetch, reconcile, commit.
pub async fn run(source: &dyn Source, db: &DatabaseConnection) -> Result<RunSummary, HarvestError> {
    let txn = db.begin().await?;

    match drive(source, &txn).await {
        Ok(summary) => {
            txn.commit().await?;
            tracing::info!(
                kind = %source.kind(),
                url = %source.base_url(),
                total_projects = summary.total_projects,
                new_projects = summary.new_projects,
                total_releases = summary.total_releases,
                new_releases = summary.new_releases,
                "harvest committed"
            );
            Ok(summary)
        }
        Err(err) => {
            txn.rollback().await?;
            Err(err)
        }
    }
}

async fn drive(source: &dyn Source, txn: &DatabaseTransaction) -> Result<RunSummary, HarvestError> {
    let (platform_row, _) = resolve::platform(txn, source.base_url(), source.kind()).await?;

    if source.refresh_mode() == RefreshMode::FullReset {
        tracing::debug!(url = %source.base_url(), "full-reset source, clearing prior state");
        clear_platform(txn, platform_row.id).await?;
    }

    let mut summary = RunSummary::default();
    let mut owners = UserCache::new();

    let mut projects = source.projects().await.map_err(|e| wrap(source, e))?;
    while let Some(seed) = projects.try_next().await.map_err(|e| wrap(source, e))? {
        summary.total_projects += 1;

        let owner = match &seed.owner {
            Some(o) => Some(
                owners
                    .resolve(txn, &o.username, o.email.as_deref())
                    .await?
                    .0,
            ),
            None => None,
        };

        let (mut project_row, created) =
            resolve::project(txn, &platform_row, source.project_key(), &seed).await?;
        if created {
            summary.new_projects += 1;
        } else {
            project_row = resolve::touch_project(txn, project_row).await?;
        }
        if let Some(owner) = &owner {
            resolve::link_member(txn, project_row.id, owner.id).await?;
        }

        let mut releases = source.releases(&seed).await.map_err(|e| wrap(source, e))?;
        while let Some(rel) = releases.try_next().await.map_err(|e| wrap(source, e))? {
            summary.total_releases += 1;

            let author_id = match &rel.author {
                Some(a) => Some(
                    owners
                        .resolve(txn, &a.username, a.email.as_deref())
                        .await?
                        .0
                        .id,
                ),
                None => owner.as_ref().map(|o| o.id),
            };

            let (_, created) =
                resolve::release(txn, &project_row, author_id, source.release_key(), &rel).await?;
            if created {
                summary.new_releases += 1;
            }
        }

        for repo_seed in &seed.repositories {
            let (repo_row, created) = resolve::repository(txn, project_row.id, repo_seed).await?;
            let repo_row = if created {
                repo_row
            } else {
                refresh_metrics(txn, repo_row, &repo_seed.metrics).await?
            };
            if repo_seed.metrics.has_counts() {
                append_snapshot(txn, repo_row.id, &repo_seed.metrics).await?;
            }
        }

        tracing::debug!(project = %seed.name, "reconciled project");
    }

    Ok(summary)
}

/// Bring a repository's metric columns in line with the latest sample.
async fn refresh_metrics<C: ConnectionTrait>(
    conn: &C,
    row: repository::Model,
    sample: &MetricSample,
) -> Result<repository::Model, DbErr> {
    let mut active = row.into_active_model();
    active.starred = Set(sample.starred);
    active.pulls = Set(sample.pulls);
    active.downloads = Set(sample.downloads);
    active.forks = Set(sample.forks);
    active.watchers = Set(sample.watchers);
    active.synced_at = Set(sample.sampled_at.fixed_offset());
    active.update(conn).await
}

/// Append one snapshot row; the history is never updated in place.
async fn append_snapshot<C: ConnectionTrait>(
    conn: &C,
    repository_id: Uuid,
    sample: &MetricSample,
) -> Result<snapshot::Model, DbErr> {
    snapshot::ActiveModel {
        id: Set(Uuid::new_v4()),
        repository_id: Set(repository_id),
        recorded_at: Set(sample.sampled_at.fixed_offset()),
        starred: Set(sample.starred),
        pulls: Set(sample.pulls),
        downloads: Set(sample.downloads),
        forks: Set(sample.forks),
        watchers: Set(sample.watchers),
    }
    .insert(conn)
    .await
}

/// Delete everything under a platform: snapshots, repositories, releases,
/// memberships, projects. The platform row itself stays; shared users stay.
async fn clear_platform(txn: &DatabaseTransaction, platform_id: Uuid) -> Result<(), DbErr> {
    let project_ids: Vec<Uuid> = project::Entity::find()
        .filter(project::Column::PlatformId.eq(platform_id))
        .all(txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    if project_ids.is_empty() {
        return Ok(());
    }

    let repository_ids: Vec<Uuid> = repository::Entity::find()
        .filter(repository::Column::ProjectId.is_in(project_ids.clone()))
        .all(txn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    if !repository_ids.is_empty() {
        snapshot::Entity::delete_many()
            .filter(snapshot::Column::RepositoryId.is_in(repository_ids.clone()))
            .exec(txn)
            .await?;
        repository::Entity::delete_many()
            .filter(repository::Column::Id.is_in(repository_ids))
            .exec(txn)
            .await?;
    }

    release::Entity::delete_many()
        .filter(release::Column::ProjectId.is_in(project_ids.clone()))
        .exec(txn)
        .await?;
    project_user::Entity::delete_many()
        .filter(project_user::Column::ProjectId.is_in(project_ids.clone()))
        .exec(txn)
        .await?;
    project::Entity::delete_many()
        .filter(project::Column::Id.is_in(project_ids))
        .exec(txn)
        .await?;

    Ok(())
}

/// The fetched subtree of one source, materialized in memory.
///
/// Used by export mode; the persisting path never builds this.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformTree {
    pub url: String,
    pub kind: PlatformKind,
    pub projects: Vec<ProjectTree>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectTree {
    #[serde(flatten)]
    pub project: SourceProject,
    pub releases: Vec<SourceRelease>,
}

/// Pull everything reachable from a source into an in-memory subtree.
pub async fn fetch_tree(source: &dyn Source) -> Result<PlatformTree, HarvestError> {
    let mut out = Vec::new();

    let mut projects = source.projects().await.map_err(|e| wrap(source, e))?;
    while let Some(seed) = projects.try_next().await.map_err(|e| wrap(source, e))? {
        let mut releases = source.releases(&seed).await.map_err(|e| wrap(source, e))?;
        let releases = collect(&mut *releases).await.map_err(|e| wrap(source, e))?;
        out.push(ProjectTree {
            project: seed,
            releases,
        });
    }

    Ok(PlatformTree {
        url: source.base_url().to_string(),
        kind: source.kind(),
        projects: out,
    })
}

/// Serialize a fetched subtree as JSON without touching the store.
pub fn export<W: std::io::Write>(tree: &PlatformTree, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_error_names_adapter_and_resource() {
        let err = HarvestError::Source {
            kind: PlatformKind::GitHub,
            url: "https://github.com/".to_string(),
            source: SourceError::not_found("organization bitergia"),
        };
        let msg = err.to_string();
        assert!(msg.contains("github"));
        assert!(msg.contains("https://github.com/"));
        assert!(msg.contains("organization bitergia"));
    }

    #[test]
    fn run_summary_defaults_to_zero() {
        let summary = RunSummary::default();
        assert_eq!(summary.total_projects, 0);
        assert_eq!(summary.new_projects, 0);
        assert_eq!(summary.total_releases, 0);
        assert_eq!(summary.new_releases, 0);
    }
}
