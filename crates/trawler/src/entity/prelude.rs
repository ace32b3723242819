//! Common re-exports for convenient entity usage.

pub use super::platform::{
    ActiveModel as PlatformActiveModel, Column as PlatformColumn, Entity as Platform,
    Model as PlatformModel,
};
pub use super::platform_kind::PlatformKind;
pub use super::project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as Project,
    Model as ProjectModel,
};
pub use super::project_user::{
    ActiveModel as ProjectUserActiveModel, Column as ProjectUserColumn, Entity as ProjectUser,
    Model as ProjectUserModel,
};
pub use super::release::{
    ActiveModel as ReleaseActiveModel, Column as ReleaseColumn, Entity as Release,
    Model as ReleaseModel,
};
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::snapshot::{
    ActiveModel as SnapshotActiveModel, Column as SnapshotColumn, Entity as Snapshot,
    Model as SnapshotModel,
};
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
