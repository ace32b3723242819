//! Puppet-style module forge adapter.
//!
//! Chains two paginated listings: `/v3/modules` for projects, then
//! `/v3/releases?module=owner-name` per project. Each module owner becomes
//! a shared user; the in-run deduplication happens in the resolver's
//! `UserCache`, not here.

mod client;
mod convert;
mod types;

pub use client::{ForgeSource, PROJECTS_LIMIT};
