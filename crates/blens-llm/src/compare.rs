//! Holistic cross-brand comparison.

use std::fmt::Write as _;

use crate::client::LlmClient;
use crate::json_span::parse_stage;
use crate::pacing::Pacer;
use crate::stages::send_or_warn;
use crate::types::ComparisonResult;

/// One brand's accumulated inferences, flattened for the comparison prompt.
#[derive(Debug, Clone)]
pub struct BrandSummary {
    pub name: String,
    pub positioning: String,
    /// Joined voice adjectives.
    pub voice: String,
    /// Absent when visual inference was unavailable for this brand.
    pub visual_style: Option<String>,
}

/// Scores and contrasts the whole brand set in a single LLM call.
///
/// Comparing holistically rather than pairwise lets one overlap pattern
/// span more than two brands. The first summary is the focal brand.
/// `None` (transport failure or unparseable reply) is fatal for the audit —
/// takeaways depend on this result — so the caller escalates it.
pub async fn compare_brands(
    client: &LlmClient,
    pacer: &Pacer,
    brands: &[BrandSummary],
) -> Option<ComparisonResult> {
    pacer.pace_compare().await;

    let mut brand_block = String::new();
    for brand in brands {
        let _ = write!(
            brand_block,
            "- {name}: positioning: \"{positioning}\"; voice: {voice}",
            name = brand.name,
            positioning = brand.positioning,
            voice = brand.voice,
        );
        if let Some(style) = &brand.visual_style {
            let _ = write!(brand_block, "; visual style: {style}");
        }
        brand_block.push('\n');
    }

    let focal_name = brands.first().map_or("", |b| b.name.as_str());

    let prompt = format!(
        "You are a brand strategist comparing companies in the same market. The first brand, \
         {focal_name}, is the one being audited; the rest are its competitors.\n\
         \n\
         {brand_block}\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"score\": 0-100 differentiation score for {focal_name} (100 = completely distinct), \
         \"overlaps\": [{{\"category\": \"Positioning|Voice|Visual\", \"pattern\": \"the shared \
         pattern\", \"who\": [\"brand names sharing it\"]}}], \
         \"standouts\": [\"what genuinely sets {focal_name} apart\"], \
         \"verdict\": \"one blunt sentence on how differentiated {focal_name} is\"}}\n\
         No markdown, no commentary.",
    );

    let reply = send_or_warn(client, &prompt, &[], "comparison").await?;
    let parsed = parse_stage(&reply);
    if parsed.is_none() {
        tracing::warn!("comparison reply was not parseable");
    }
    parsed
}
