//! Typed outputs of the inference stages.
//!
//! All of these deserialize from LLM-recovered JSON, so every field carries
//! `#[serde(default)]` — a reply missing one key still yields a usable
//! record instead of failing the whole stage. Wire keys are camelCase to
//! match the response contract.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentinel substituted for visual fields when no screenshot is available.
pub const COULD_NOT_CAPTURE: &str = "could not capture";

/// Brand positioning and voice, inferred from page copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingInference {
    #[serde(default)]
    pub positioning: String,
    #[serde(default)]
    pub voice_adjectives: Vec<String>,
    #[serde(default)]
    pub voice_summary: String,
}

/// Visual identity, inferred from a page screenshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualInference {
    #[serde(default)]
    pub colors: String,
    #[serde(default)]
    pub typography: String,
    #[serde(default)]
    pub visual_style: String,
}

impl VisualInference {
    /// The fixed record used when no screenshot could be captured.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            colors: COULD_NOT_CAPTURE.to_string(),
            typography: COULD_NOT_CAPTURE.to_string(),
            visual_style: COULD_NOT_CAPTURE.to_string(),
        }
    }

    /// Whether this record is the "could not capture" sentinel.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.visual_style == COULD_NOT_CAPTURE
    }
}

/// What a first-time visitor would take away from the brand's surfaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstImpression {
    #[serde(default)]
    pub first_impression: String,
    #[serde(default)]
    pub clarity: String,
    #[serde(default)]
    pub appeal: String,
}

/// One LLM-suggested competitor. Unverified — the model is trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorSuggestion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub reason: String,
}

/// A positioning/voice/visual pattern shared by two or more brands.
///
/// `who` holds brand display names as the model wrote them; names outside
/// the audited set are passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overlap {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub who: Vec<String>,
}

/// The holistic cross-brand comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Differentiation score, clamped to 0..=100. Parsed leniently: the
    /// model sometimes replies with a numeric string.
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: u8,
    #[serde(default)]
    pub overlaps: Vec<Overlap>,
    #[serde(default)]
    pub standouts: Vec<String>,
    #[serde(default)]
    pub verdict: String,
}

/// Prescriptive advice for the focal brand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Takeaways {
    #[serde(default)]
    pub keep: Vec<String>,
    #[serde(default)]
    pub fix: Vec<String>,
    #[serde(default)]
    pub explore: Vec<String>,
    #[serde(default)]
    pub watch: Vec<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(score.clamp(0.0, 100.0).round() as u8)
}
