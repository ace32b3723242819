//! Repository entity - a code or image repository under a project.
//!
//! The metric columns (starred, pulls, downloads, forks, watchers) are
//! mutable and always hold the values of the latest snapshot; the full
//! history lives in `repository_snapshots`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning project.
    pub project_id: Uuid,

    /// Repository name (URL-safe slug).
    pub name: String,

    /// Repository page url. Natural key, unique.
    #[sea_orm(unique)]
    pub url: String,

    /// Url used to clone or pull the repository, when applicable.
    #[sea_orm(column_type = "Text", nullable)]
    pub clone_url: Option<String>,

    /// Repository flavour ("git", "docker", "gerrit").
    pub kind: String,

    // ─── Popularity counters (latest snapshot values) ───────────────────────
    pub starred: Option<i64>,
    pub pulls: Option<i64>,
    pub downloads: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,

    /// When this record was last synced from the platform.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    /// A repository owns its metric snapshots.
    #[sea_orm(has_many = "super::snapshot::Entity")]
    Snapshots,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Snapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
