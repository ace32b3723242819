//! Project entity - one named project under a platform.
//!
//! The natural key is adapter-dependent: module forges key projects by
//! (platform, name), url-centric sources by (platform, url). The resolver
//! interprets the adapter-declared key; the schema carries lookup indexes
//! for both.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning platform.
    pub platform_id: Uuid,

    /// Project name as reported by the remote listing.
    pub name: String,

    /// Project page url on the remote platform.
    pub url: String,

    /// When the project was created on the platform (if reported).
    pub created_at: Option<DateTimeWithTimeZone>,

    /// Refreshed on every successful fetch of this project.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A project belongs to a platform.
    #[sea_orm(
        belongs_to = "super::platform::Entity",
        from = "Column::PlatformId",
        to = "super::platform::Column::Id"
    )]
    Platform,
    /// A project owns its releases.
    #[sea_orm(has_many = "super::release::Entity")]
    Releases,
    /// A project owns its repositories.
    #[sea_orm(has_many = "super::repository::Entity")]
    Repositories,
}

impl Related<super::platform::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Platform.def()
    }
}

impl Related<super::release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Releases.def()
    }
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repositories.def()
    }
}

/// Users are shared across projects; membership goes through `project_users`.
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_user::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_user::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
