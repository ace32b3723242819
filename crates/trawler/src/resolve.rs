//! Identity resolution: find-or-create by natural key.
//!
//! Every function performs one filtered read for the entity's declared
//! natural key and, on a miss, constructs a fresh row and inserts it through
//! the same connection. Run inside the harvest transaction, later lookups in
//! the same run see rows created earlier in it, so each key maps to exactly
//! one row within a run and across repeated runs. Absence is a normal
//! outcome, never an error. Nothing here commits; commit and rollback belong
//! to the harvest driver.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::platform_kind::PlatformKind;
use crate::entity::{platform, project, project_user, release, repository, user};
use crate::source::{ProjectKey, ReleaseKey, SourceProject, SourceRelease, SourceRepository};

/// Find or create the platform row for a base url.
pub async fn platform<C: ConnectionTrait>(
    conn: &C,
    url: &str,
    kind: PlatformKind,
) -> Result<(platform::Model, bool), DbErr> {
    if let Some(found) = platform::Entity::find()
        .filter(platform::Column::Url.eq(url))
        .one(conn)
        .await?
    {
        return Ok((found, false));
    }

    let fresh = platform::ActiveModel {
        id: Set(Uuid::new_v4()),
        url: Set(url.to_string()),
        kind: Set(kind),
        created_at: Set(Utc::now().fixed_offset()),
    };
    Ok((fresh.insert(conn).await?, true))
}

/// Find or create a user by its globally unique username.
pub async fn user<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    email: Option<&str>,
) -> Result<(user::Model, bool), DbErr> {
    if let Some(found) = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(conn)
        .await?
    {
        return Ok((found, false));
    }

    let fresh = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.map(str::to_string)),
    };
    Ok((fresh.insert(conn).await?, true))
}

/// Find or create a project under `platform` by the adapter-declared key.
pub async fn project<C: ConnectionTrait>(
    conn: &C,
    platform: &platform::Model,
    key: ProjectKey,
    seed: &SourceProject,
) -> Result<(project::Model, bool), DbErr> {
    let query = project::Entity::find().filter(project::Column::PlatformId.eq(platform.id));
    let query = match key {
        ProjectKey::Url => query.filter(project::Column::Url.eq(&seed.url)),
        ProjectKey::Name => query.filter(project::Column::Name.eq(&seed.name)),
    };

    if let Some(found) = query.one(conn).await? {
        return Ok((found, false));
    }

    let fresh = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        platform_id: Set(platform.id),
        name: Set(seed.name.clone()),
        url: Set(seed.url.clone()),
        created_at: Set(seed.created_at.map(|t| t.fixed_offset())),
        updated_at: Set(Utc::now().fixed_offset()),
    };
    Ok((fresh.insert(conn).await?, true))
}

/// Refresh a project's `updated_at` to mark a successful fetch.
pub async fn touch_project<C: ConnectionTrait>(
    conn: &C,
    row: project::Model,
) -> Result<project::Model, DbErr> {
    let mut active = row.into_active_model();
    active.updated_at = Set(Utc::now().fixed_offset());
    active.update(conn).await
}

/// Find or create a release under `project` by the adapter-declared key.
///
/// A url-keyed source may still publish the odd release without a url; those
/// fall back to the (project, name, version, author) tuple so they stay
/// resolvable.
pub async fn release<C: ConnectionTrait>(
    conn: &C,
    project: &project::Model,
    author_id: Option<Uuid>,
    key: ReleaseKey,
    seed: &SourceRelease,
) -> Result<(release::Model, bool), DbErr> {
    let existing = match (key, seed.url.as_deref()) {
        (ReleaseKey::Url, Some(url)) => {
            release::Entity::find()
                .filter(release::Column::Url.eq(url))
                .one(conn)
                .await?
        }
        _ => {
            let mut cond = Condition::all()
                .add(release::Column::ProjectId.eq(project.id))
                .add(release::Column::Name.eq(&seed.name))
                .add(release::Column::Version.eq(&seed.version));
            cond = match author_id {
                Some(id) => cond.add(release::Column::UserId.eq(id)),
                None => cond.add(release::Column::UserId.is_null()),
            };
            release::Entity::find().filter(cond).one(conn).await?
        }
    };

    if let Some(found) = existing {
        return Ok((found, false));
    }

    let fresh = release::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project.id),
        user_id: Set(author_id),
        name: Set(seed.name.clone()),
        version: Set(seed.version.clone()),
        url: Set(seed.url.clone()),
        file_url: Set(seed.file_url.clone()),
        created_at: Set(seed.created_at.map(|t| t.fixed_offset())),
        updated_at: Set(Utc::now().fixed_offset()),
    };
    Ok((fresh.insert(conn).await?, true))
}

/// Find or create a repository by its unique url.
pub async fn repository<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    seed: &SourceRepository,
) -> Result<(repository::Model, bool), DbErr> {
    if let Some(found) = repository::Entity::find()
        .filter(repository::Column::Url.eq(&seed.url))
        .one(conn)
        .await?
    {
        return Ok((found, false));
    }

    let fresh = repository::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(project_id),
        name: Set(seed.name.clone()),
        url: Set(seed.url.clone()),
        clone_url: Set(seed.clone_url.clone()),
        kind: Set(seed.kind.clone()),
        starred: Set(seed.metrics.starred),
        pulls: Set(seed.metrics.pulls),
        downloads: Set(seed.metrics.downloads),
        forks: Set(seed.metrics.forks),
        watchers: Set(seed.metrics.watchers),
        synced_at: Set(seed.metrics.sampled_at.fixed_offset()),
    };
    Ok((fresh.insert(conn).await?, true))
}

/// Ensure a project-membership row exists for (project, user).
pub async fn link_member<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<bool, DbErr> {
    let existing = project_user::Entity::find()
        .filter(project_user::Column::ProjectId.eq(project_id))
        .filter(project_user::Column::UserId.eq(user_id))
        .one(conn)
        .await?;

    if existing.is_some() {
        return Ok(false);
    }

    project_user::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(user_id),
    }
    .insert(conn)
    .await?;
    Ok(true)
}

/// In-run owner deduplication map (username -> resolved user).
///
/// Package forges repeat the same owner across hundreds of modules; this
/// short-lived cache sits in front of [`user`] so each distinct username is
/// resolved against the store once per run. `created` reports whether the
/// underlying row was inserted, so a cache hit is never counted as new.
#[derive(Default)]
pub struct UserCache {
    seen: HashMap<String, user::Model>,
}

impl UserCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a username through the cache, falling back to the store.
    pub async fn resolve<C: ConnectionTrait>(
        &mut self,
        conn: &C,
        username: &str,
        email: Option<&str>,
    ) -> Result<(user::Model, bool), DbErr> {
        if let Some(hit) = self.seen.get(username) {
            return Ok((hit.clone(), false));
        }

        let (row, created) = user(conn, username, email).await?;
        self.seen.insert(username.to_string(), row.clone());
        Ok((row, created))
    }

    /// Number of distinct usernames resolved so far in this run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
