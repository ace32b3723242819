//! GitHub adapter (github.com or a GitHub Enterprise instance).
//!
//! Resolves an organization, then either one named repository or every
//! repository under it, translating star/fork/watcher counters. Raises
//! distinct errors for a missing organization, a missing repository,
//! rejected credentials, and forbidden/rate-limited answers.

mod client;
mod convert;
mod types;

pub use client::{GitHubSource, GITHUB_API_URL, GITHUB_URL};
