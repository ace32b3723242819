//! Docker registry adapter (Docker Hub or compatible).
//!
//! Resolves an owner profile, then fetches star/pull counters for one named
//! repository or every repository under the owner. Every successful
//! repository fetch stamps a metric sample "now"; the harvest driver turns
//! each sample into one snapshot row.

mod client;
mod convert;
mod types;

pub use client::DockerSource;
