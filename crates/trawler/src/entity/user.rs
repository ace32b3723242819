//! User entity - a platform account shared across projects and releases.
//!
//! Usernames are globally unique: every project or release authored by the
//! same username points at the same row, regardless of which source produced
//! it first.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Account name on the remote platform. Natural key, unique.
    #[sea_orm(unique)]
    pub username: String,

    /// Contact email, when the platform exposes one.
    pub email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user authors releases.
    #[sea_orm(has_many = "super::release::Entity")]
    Releases,
}

impl Related<super::release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Releases.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        super::project_user::Relation::Project.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::project_user::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
