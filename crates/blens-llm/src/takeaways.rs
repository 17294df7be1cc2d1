//! Prescriptive takeaways for the focal brand.

use std::fmt::Write as _;

use crate::client::LlmClient;
use crate::json_span::parse_stage;
use crate::pacing::Pacer;
use crate::stages::send_or_warn;
use crate::types::{ComparisonResult, Takeaways};

/// The focal brand's merged profile, flattened for the takeaway prompt.
#[derive(Debug, Clone, Default)]
pub struct FocalProfile {
    pub name: String,
    pub positioning: String,
    pub voice_summary: String,
    pub visual_style: String,
    pub first_impression: String,
}

/// Converts the focal profile plus the comparison result into advice.
///
/// Non-fatal: any failure yields the empty-shaped [`Takeaways`] so the rest
/// of the report still returns.
pub async fn generate_takeaways(
    client: &LlmClient,
    pacer: &Pacer,
    focal: &FocalProfile,
    competitor_names: &[String],
    comparison: &ComparisonResult,
) -> Takeaways {
    pacer.pace().await;

    let mut overlap_block = String::new();
    for overlap in &comparison.overlaps {
        let _ = writeln!(
            overlap_block,
            "- {category}: {pattern} (shared by {who})",
            category = overlap.category,
            pattern = overlap.pattern,
            who = overlap.who.join(", "),
        );
    }

    let prompt = format!(
        "You are a brand advisor writing action items for {name}.\n\
         \n\
         Their profile: positioning: \"{positioning}\"; voice: \"{voice}\"; visual style: \
         \"{visual}\"; first impression on visitors: \"{impression}\".\n\
         Competitors: {competitors}.\n\
         Differentiation score: {score}/100.\n\
         Overlaps with competitors:\n{overlaps}\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"keep\": [\"what works and should stay\"], \"fix\": [\"what blends in and should \
         change\"], \"explore\": [\"untapped angles\"], \"watch\": [\"competitor moves to \
         monitor\"]}}\n\
         2-3 short items per list. No markdown, no commentary.",
        name = focal.name,
        positioning = focal.positioning,
        voice = focal.voice_summary,
        visual = focal.visual_style,
        impression = focal.first_impression,
        competitors = competitor_names.join(", "),
        score = comparison.score,
        overlaps = overlap_block,
    );

    let Some(reply) = send_or_warn(client, &prompt, &[], "takeaways").await else {
        return Takeaways::default();
    };

    parse_stage(&reply).unwrap_or_else(|| {
        tracing::warn!(company = focal.name, "takeaways reply was not parseable");
        Takeaways::default()
    })
}
