//! Web collection layer for the blens brand-audit service.
//!
//! Fetches raw page HTML with a single `www.` fallback, derives a
//! fixed-shape [`StructuredContent`] record from it deterministically, and
//! captures page/search screenshots through an external headless-browser
//! rendering service. Every public operation here is best-effort: failures
//! surface as `None`, never as errors, so downstream analysis stages treat
//! absence as a normal state.

pub mod capture;
pub mod extract;
pub mod fetch;

mod error;

pub use capture::CaptureClient;
pub use error::ScrapeError;
pub use extract::{extract, StructuredContent, AUDIT_TEXT_CAP, SUGGEST_TEXT_CAP};
pub use fetch::{normalize_url, PageFetcher};
