//! The audit pipeline: validate → collect → infer → compare → advise.

use blens_core::BrandProfile;
use blens_llm::compare::{compare_brands, BrandSummary};
use blens_llm::stages::{
    infer_first_impression, infer_messaging, infer_visuals, suggest_competitors,
};
use blens_llm::takeaways::{generate_takeaways, FocalProfile};
use blens_llm::types::{
    CompetitorSuggestion, FirstImpression, MessagingInference, VisualInference,
};
use blens_llm::{LlmClient, Pacer};
use blens_scraper::{extract, CaptureClient, PageFetcher, StructuredContent, SUGGEST_TEXT_CAP};

use crate::collect::{collect_brands, BrandCollection};
use crate::report::{assemble, AuditReport};
use crate::{AuditError, AuditRequest, SuggestRequest};

/// Long-lived collaborators, built once at process start and shared across
/// requests. `capture` is `None` when no rendering service is configured;
/// audits then run entirely on sentinel visual data.
pub struct AuditDeps {
    pub fetcher: PageFetcher,
    pub capture: Option<CaptureClient>,
    pub llm: LlmClient,
    pub call_delay_ms: u64,
    pub compare_delay_ms: u64,
}

/// One brand's collected content plus its three inference outputs.
pub(crate) struct BrandAnalysis {
    pub profile: BrandProfile,
    pub content: StructuredContent,
    pub screenshot: Option<String>,
    pub search_screenshot: Option<String>,
    /// `None` when the stage failed. Guaranteed `Some` for the focal brand —
    /// a focal failure aborts the audit instead.
    pub messaging: Option<MessagingInference>,
    pub visuals: VisualInference,
    pub impression: FirstImpression,
}

/// Runs a full audit for the focal company plus its competitors.
///
/// Collection is concurrent; all LLM calls are strictly sequential with a
/// fixed pacing delay, the focal brand first. Individual stage failures
/// degrade to sentinel/empty values except the two foundations:
///
/// # Errors
///
/// - [`AuditError::InvalidInput`] — missing/empty fields; returned before
///   any external call is made.
/// - [`AuditError::FocalMessaging`] — the focal company's messaging could
///   not be inferred; remaining stages are skipped.
/// - [`AuditError::Comparison`] — the cross-brand comparison could not be
///   inferred; no partial report is returned.
pub async fn run_audit(
    deps: &AuditDeps,
    request: &AuditRequest,
) -> Result<AuditReport, AuditError> {
    validate_audit_request(request)?;

    let mut brands = Vec::with_capacity(request.competitors.len() + 1);
    brands.push(BrandProfile::new(
        request.company_name.trim(),
        request.company_url.trim(),
    ));
    brands.extend(request.competitors.iter().cloned());

    tracing::info!(
        focal = %brands[0].name,
        competitors = brands.len() - 1,
        "starting brand audit"
    );

    let collections = collect_brands(deps, &brands).await;

    let pacer = Pacer::new(deps.call_delay_ms, deps.compare_delay_ms);
    let mut analyses: Vec<BrandAnalysis> = Vec::with_capacity(collections.len());

    for (index, collection) in collections.into_iter().enumerate() {
        let messaging = infer_messaging(
            &deps.llm,
            &pacer,
            &collection.profile.name,
            &collection.content,
        )
        .await;

        // Checked before the remaining stages run: a focal failure aborts
        // the audit without spending further LLM calls.
        if index == 0 && messaging.is_none() {
            tracing::error!(brand = %collection.profile.name, "focal messaging inference failed");
            return Err(AuditError::FocalMessaging);
        }

        analyses.push(analyze_brand(deps, &pacer, collection, messaging).await);
    }

    let summaries: Vec<BrandSummary> = analyses.iter().map(brand_summary).collect();
    let comparison = compare_brands(&deps.llm, &pacer, &summaries)
        .await
        .ok_or(AuditError::Comparison)?;

    let focal = &analyses[0];
    let focal_profile = FocalProfile {
        name: focal.profile.name.clone(),
        positioning: focal
            .messaging
            .as_ref()
            .map(|m| m.positioning.clone())
            .unwrap_or_default(),
        voice_summary: focal
            .messaging
            .as_ref()
            .map(|m| m.voice_summary.clone())
            .unwrap_or_default(),
        visual_style: focal.visuals.visual_style.clone(),
        first_impression: focal.impression.first_impression.clone(),
    };
    let competitor_names: Vec<String> = analyses[1..]
        .iter()
        .map(|a| a.profile.name.clone())
        .collect();

    let takeaways =
        generate_takeaways(&deps.llm, &pacer, &focal_profile, &competitor_names, &comparison).await;

    Ok(assemble(
        &analyses,
        comparison,
        takeaways,
        deps.capture.is_some(),
    ))
}

/// Runs the lightweight competitor-suggestion flow.
///
/// A fetch failure is tolerated (the stage runs on whatever fields remain);
/// a failed or unparseable suggestion stage is not.
///
/// # Errors
///
/// - [`AuditError::InvalidInput`] — missing/empty fields.
/// - [`AuditError::Suggestion`] — the suggestion stage yielded nothing.
pub async fn run_suggestion(
    deps: &AuditDeps,
    request: &SuggestRequest,
) -> Result<Vec<CompetitorSuggestion>, AuditError> {
    if request.company_name.trim().is_empty() {
        return Err(AuditError::InvalidInput("companyName is required".to_string()));
    }
    if request.company_url.trim().is_empty() {
        return Err(AuditError::InvalidInput("companyUrl is required".to_string()));
    }

    let html = deps.fetcher.fetch_page(&request.company_url).await;
    let content = extract(html.as_deref(), SUGGEST_TEXT_CAP);

    let pacer = Pacer::new(deps.call_delay_ms, deps.compare_delay_ms);
    suggest_competitors(&deps.llm, &pacer, request.company_name.trim(), &content)
        .await
        .ok_or(AuditError::Suggestion)
}

/// Runs the visual and first-impression stages for one brand, messaging
/// having already run (its absence can be fatal and is judged by the caller).
async fn analyze_brand(
    deps: &AuditDeps,
    pacer: &Pacer,
    collection: BrandCollection,
    messaging: Option<MessagingInference>,
) -> BrandAnalysis {
    let BrandCollection {
        profile,
        content,
        screenshot,
        search_screenshot,
    } = collection;

    let visuals = infer_visuals(&deps.llm, pacer, &profile.name, screenshot.as_deref()).await;

    let impression = infer_first_impression(
        &deps.llm,
        pacer,
        &profile.name,
        &content,
        search_screenshot.as_deref(),
        screenshot.as_deref(),
    )
    .await
    .unwrap_or_default();

    BrandAnalysis {
        profile,
        content,
        screenshot,
        search_screenshot,
        messaging,
        visuals,
        impression,
    }
}

fn brand_summary(analysis: &BrandAnalysis) -> BrandSummary {
    BrandSummary {
        name: analysis.profile.name.clone(),
        positioning: analysis
            .messaging
            .as_ref()
            .map(|m| m.positioning.clone())
            .unwrap_or_default(),
        voice: analysis
            .messaging
            .as_ref()
            .map(|m| m.voice_adjectives.join(", "))
            .unwrap_or_default(),
        visual_style: if analysis.visuals.is_unavailable() {
            None
        } else {
            Some(analysis.visuals.visual_style.clone())
        },
    }
}

fn validate_audit_request(request: &AuditRequest) -> Result<(), AuditError> {
    if request.company_name.trim().is_empty() {
        return Err(AuditError::InvalidInput("companyName is required".to_string()));
    }
    if request.company_url.trim().is_empty() {
        return Err(AuditError::InvalidInput("companyUrl is required".to_string()));
    }
    if request.competitors.is_empty() {
        return Err(AuditError::InvalidInput(
            "at least one competitor is required".to_string(),
        ));
    }
    for competitor in &request.competitors {
        if competitor.name.trim().is_empty() || competitor.url.trim().is_empty() {
            return Err(AuditError::InvalidInput(
                "every competitor needs a name and a url".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> AuditRequest {
        AuditRequest {
            company_url: "https://acme.example".to_string(),
            company_name: "Acme".to_string(),
            competitors: vec![BrandProfile::new("Rival", "https://rival.example")],
        }
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        assert!(validate_audit_request(&valid_request()).is_ok());
    }

    #[test]
    fn validate_rejects_empty_company_name() {
        let mut request = valid_request();
        request.company_name = "  ".to_string();
        let err = validate_audit_request(&request).unwrap_err();
        assert!(err.is_input_error(), "got: {err:?}");
    }

    #[test]
    fn validate_rejects_empty_competitor_list() {
        let mut request = valid_request();
        request.competitors.clear();
        let err = validate_audit_request(&request).unwrap_err();
        assert!(err.is_input_error(), "got: {err:?}");
    }

    #[test]
    fn validate_rejects_competitor_without_url() {
        let mut request = valid_request();
        request.competitors[0].url = String::new();
        let err = validate_audit_request(&request).unwrap_err();
        assert!(err.is_input_error(), "got: {err:?}");
    }
}
