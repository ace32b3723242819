//! Platform kind enum for type-safe source handling.
//!
//! This represents the *kind* of remote platform being harvested, not a
//! specific deployment. One row in the `platforms` table exists per distinct
//! base url; the kind tells which adapter produced it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supported source platform kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Puppet-style module forge (projects + releases + owners).
    #[sea_orm(string_value = "forge")]
    Forge,
    /// GitHub (github.com or a GitHub Enterprise instance).
    #[sea_orm(string_value = "github")]
    GitHub,
    /// Docker registry (Docker Hub or compatible).
    #[sea_orm(string_value = "docker")]
    Docker,
    /// Gerrit code-review system.
    #[sea_orm(string_value = "gerrit")]
    Gerrit,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Forge => write!(f, "forge"),
            PlatformKind::GitHub => write!(f, "github"),
            PlatformKind::Docker => write!(f, "docker"),
            PlatformKind::Gerrit => write!(f, "gerrit"),
        }
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forge" | "puppet" => Ok(PlatformKind::Forge),
            "github" => Ok(PlatformKind::GitHub),
            "docker" => Ok(PlatformKind::Docker),
            "gerrit" => Ok(PlatformKind::Gerrit),
            _ => Err(format!("Unknown platform kind: {}", s)),
        }
    }
}
