//! Audit orchestration for the blens brand-audit service.
//!
//! Sequences the collection, inference, comparison, and takeaway phases for
//! one focal company plus its competitors, enforces the inter-call pacing
//! discipline, and assembles the final report. This crate is the only place
//! allowed to escalate a stage's absence into a fatal error; everything else
//! degrades to sentinel or empty values.

pub mod pipeline;
pub mod report;

mod collect;

use serde::Deserialize;
use thiserror::Error;

use blens_core::BrandProfile;

pub use pipeline::{run_audit, run_suggestion, AuditDeps};
pub use report::{AuditReport, Chart, ChartRow, FirstImpressionEntry, ScreenshotEntry};

/// Payload of an audit request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    #[serde(default)]
    pub company_url: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub competitors: Vec<BrandProfile>,
}

/// Payload of a competitor-suggestion request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    #[serde(default)]
    pub company_url: String,
    #[serde(default)]
    pub company_name: String,
}

#[derive(Debug, Error)]
pub enum AuditError {
    /// Bad request payload; detected before any external call is made.
    #[error("{0}")]
    InvalidInput(String),

    /// The focal company's messaging could not be inferred. Fatal: every
    /// later stage builds on it.
    #[error("could not analyze the company's messaging")]
    FocalMessaging,

    /// The cross-brand comparison could not be inferred. Fatal: takeaways
    /// and the report scaffold depend on it.
    #[error("could not compare the brands")]
    Comparison,

    /// The competitor-suggestion stage produced nothing usable.
    #[error("could not generate competitor suggestions")]
    Suggestion,
}

impl AuditError {
    /// Whether this error is the caller's fault (bad input) rather than a
    /// downstream-analysis failure.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, AuditError::InvalidInput(_))
    }
}
