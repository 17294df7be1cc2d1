//! LLM-backed inference for the blens brand-audit service.
//!
//! One narrow capability — [`LlmClient::send_prompt`] — feeds four
//! structurally identical inference stages (competitor suggestion, messaging,
//! visual identity, first impression), a holistic cross-brand comparator, and
//! a takeaway generator. Model replies are untyped free text: every stage
//! funnels them through [`json_span::first_json_object`] and treats the
//! result as optional, so a garbled reply degrades to absence instead of an
//! error crossing the stage boundary.

pub mod compare;
pub mod json_span;
pub mod stages;
pub mod takeaways;
pub mod types;

mod client;
mod error;
mod pacing;

pub use client::LlmClient;
pub use error::LlmError;
pub use pacing::Pacer;
