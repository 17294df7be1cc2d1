//! Final report shape and assembly.

use std::collections::BTreeMap;

use serde::Serialize;

use blens_llm::types::{ComparisonResult, Overlap, Takeaways};

use crate::pipeline::BrandAnalysis;

/// Placeholder for a chart cell with no inferred value.
const EMPTY_CELL: &str = "-";

/// The assembled audit response.
///
/// Per-brand maps are keyed by brand display name. Names are assumed unique
/// within one audit run; a duplicate name silently overwrites the earlier
/// brand's entries (latent gap inherited from the response contract, left
/// unresolved on purpose).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub score: u8,
    pub verdict: String,
    pub overlaps: Vec<Overlap>,
    pub standouts: Vec<String>,
    pub takeaways: Takeaways,
    pub chart: Chart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<BTreeMap<String, ScreenshotEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_screenshots: Option<BTreeMap<String, Option<String>>>,
    pub first_impressions: BTreeMap<String, FirstImpressionEntry>,
}

#[derive(Debug, Serialize)]
pub struct ScreenshotEntry {
    pub url: String,
    /// Base64-encoded PNG.
    pub image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstImpressionEntry {
    pub first_impression: String,
    pub clarity: String,
    pub appeal: String,
    pub meta_title: String,
    pub meta_description: String,
}

/// Tabular comparison for display: one column per brand (focal first), one
/// row per category.
#[derive(Debug, Serialize)]
pub struct Chart {
    pub columns: Vec<String>,
    pub rows: Vec<ChartRow>,
}

#[derive(Debug, Serialize)]
pub struct ChartRow {
    pub category: String,
    pub values: Vec<String>,
}

/// Merges per-brand analyses, the comparison, and the takeaways into the
/// response shape.
///
/// Overlap entries naming brands outside the audited set are passed through
/// untouched; the chart is built from the input brand set only, so unknown
/// names cannot corrupt it.
pub(crate) fn assemble(
    analyses: &[BrandAnalysis],
    comparison: ComparisonResult,
    takeaways: Takeaways,
    capture_enabled: bool,
) -> AuditReport {
    let chart = build_chart(analyses);

    let (screenshots, google_screenshots) = if capture_enabled {
        let mut shots: BTreeMap<String, ScreenshotEntry> = BTreeMap::new();
        let mut search_shots: BTreeMap<String, Option<String>> = BTreeMap::new();
        for analysis in analyses {
            if let Some(image) = &analysis.screenshot {
                shots.insert(
                    analysis.profile.name.clone(),
                    ScreenshotEntry {
                        url: analysis.profile.url.clone(),
                        image: image.clone(),
                    },
                );
            }
            search_shots.insert(
                analysis.profile.name.clone(),
                analysis.search_screenshot.clone(),
            );
        }
        (Some(shots), Some(search_shots))
    } else {
        (None, None)
    };

    let first_impressions = analyses
        .iter()
        .map(|analysis| {
            (
                analysis.profile.name.clone(),
                FirstImpressionEntry {
                    first_impression: analysis.impression.first_impression.clone(),
                    clarity: analysis.impression.clarity.clone(),
                    appeal: analysis.impression.appeal.clone(),
                    meta_title: analysis.content.meta_title.clone(),
                    meta_description: analysis.content.meta_description.clone(),
                },
            )
        })
        .collect();

    AuditReport {
        score: comparison.score,
        verdict: comparison.verdict,
        overlaps: comparison.overlaps,
        standouts: comparison.standouts,
        takeaways,
        chart,
        screenshots,
        google_screenshots,
        first_impressions,
    }
}

fn build_chart(analyses: &[BrandAnalysis]) -> Chart {
    let columns: Vec<String> = analyses
        .iter()
        .map(|analysis| analysis.profile.name.clone())
        .collect();

    let cell = |value: String| -> String {
        if value.trim().is_empty() {
            EMPTY_CELL.to_string()
        } else {
            value
        }
    };

    let positioning = analyses
        .iter()
        .map(|a| {
            cell(
                a.messaging
                    .as_ref()
                    .map(|m| m.positioning.clone())
                    .unwrap_or_default(),
            )
        })
        .collect();

    let voice = analyses
        .iter()
        .map(|a| {
            cell(
                a.messaging
                    .as_ref()
                    .map(|m| m.voice_adjectives.join(", "))
                    .unwrap_or_default(),
            )
        })
        .collect();

    let visual = analyses
        .iter()
        .map(|a| cell(a.visuals.visual_style.clone()))
        .collect();

    Chart {
        columns,
        rows: vec![
            ChartRow {
                category: "Positioning".to_string(),
                values: positioning,
            },
            ChartRow {
                category: "Voice".to_string(),
                values: voice,
            },
            ChartRow {
                category: "Visual Style".to_string(),
                values: visual,
            },
        ],
    }
}
