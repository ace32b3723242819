//! SeaORM entity definitions for the trawler database schema.

pub mod platform;
pub mod platform_kind;
pub mod prelude;
pub mod project;
pub mod project_user;
pub mod release;
pub mod repository;
pub mod snapshot;
pub mod user;
