//! Release entity - one published version of a project.
//!
//! Releases are immutable besides timestamps once created. The natural key
//! is adapter-dependent: a release url where the platform provides one,
//! otherwise (project, name, version, author).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "releases")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning project.
    pub project_id: Uuid,

    /// Release author, when the platform reports one.
    pub user_id: Option<Uuid>,

    /// Released artifact name (usually the project name).
    pub name: String,

    /// Version string as published.
    pub version: String,

    /// Release page url, when the platform provides one.
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,

    /// Download url of the released artifact.
    #[sea_orm(column_type = "Text", nullable)]
    pub file_url: Option<String>,

    /// When the release was published (if reported).
    pub created_at: Option<DateTimeWithTimeZone>,

    /// Refreshed on every successful fetch that observes this release.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
