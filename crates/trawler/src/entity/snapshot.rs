//! Repository metric snapshot - append-only popularity time series.
//!
//! One row per harvesting run per repository. Rows are never updated or
//! deleted (outside a full-reset source refresh), so the table is a faithful
//! history of how the counters moved between runs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repository_snapshots")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Repository this sample belongs to.
    pub repository_id: Uuid,

    /// When the counters were read from the platform.
    pub recorded_at: DateTimeWithTimeZone,

    pub starred: Option<i64>,
    pub pulls: Option<i64>,
    pub downloads: Option<i64>,
    pub forks: Option<i64>,
    pub watchers: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::repository::Entity",
        from = "Column::RepositoryId",
        to = "super::repository::Column::Id"
    )]
    Repository,
}

impl Related<super::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repository.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
