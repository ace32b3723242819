//! Platform entity - the root of one harvested source.
//!
//! A platform is created once per distinct base url and never deleted;
//! repeated harvesting runs against the same url reconcile into the same row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::platform_kind::PlatformKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "platforms")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Base url of the remote source. Natural key, unique.
    #[sea_orm(unique)]
    pub url: String,

    /// Which adapter kind this source belongs to.
    pub kind: PlatformKind,

    /// When this platform was first harvested.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A platform owns its projects.
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
