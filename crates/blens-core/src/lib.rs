//! Shared domain types and configuration for the blens brand-audit service.

mod app_config;
mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

/// Identity of one company in an audit: the focal brand or a competitor.
///
/// Created from caller input and never mutated afterward. The `name` is the
/// display name used to key per-brand maps in the audit report, so names
/// must be unique within one audit run — a duplicate silently overwrites
/// the earlier brand's entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandProfile {
    pub name: String,
    pub url: String,
}

impl BrandProfile {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
