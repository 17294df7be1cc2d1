//! The four per-brand inference stages.
//!
//! Each stage is structurally identical: build a natural-language
//! instruction embedding the extracted facts, optionally attach screenshots,
//! invoke [`LlmClient::send_prompt`], and recover the first JSON object from
//! the reply. Failures never escape a stage — transport errors and
//! unparseable replies are logged and become `None` (or the sentinel record,
//! for visuals).

use blens_scraper::StructuredContent;
use serde::Deserialize;

use crate::client::LlmClient;
use crate::json_span::parse_stage;
use crate::pacing::Pacer;
use crate::types::{CompetitorSuggestion, FirstImpression, MessagingInference, VisualInference};

/// Upper bound on competitor suggestions returned to the caller.
const MAX_SUGGESTIONS: usize = 3;

/// Shared instruction for screenshot-bearing prompts: bot walls are not
/// brand design.
const CAPTCHA_CLAUSE: &str = "If a screenshot shows only a CAPTCHA, bot-challenge, or access-denied \
     page, treat that screenshot as unavailable and use the phrase \"could not capture\" for \
     anything you cannot see; otherwise describe the actual visible design.";

#[derive(Deserialize)]
struct SuggestionReply {
    #[serde(default)]
    competitors: Vec<CompetitorSuggestion>,
}

/// Asks the model for up to 3 direct competitors of `company_name`.
///
/// Suggestions are LLM-trusted: no verification that the companies exist.
/// `None` means the stage failed (transport or unparseable reply), as
/// opposed to `Some(vec![])` — a valid "no suggestions" answer.
pub async fn suggest_competitors(
    client: &LlmClient,
    pacer: &Pacer,
    company_name: &str,
    content: &StructuredContent,
) -> Option<Vec<CompetitorSuggestion>> {
    pacer.pace().await;

    let prompt = format!(
        "You are a market analyst. Identify up to 3 direct competitors of the company below.\n\
         \n\
         Company: {company_name}\n\
         Headline: {h1}\n\
         Website text: {text}\n\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"competitors\": [{{\"name\": \"...\", \"url\": \"https://...\", \"reason\": \"...\"}}]}}\n\
         where \"reason\" is 5 words or fewer. No markdown, no commentary.",
        h1 = content.h1,
        text = content.text,
    );

    let reply = send_or_warn(client, &prompt, &[], "competitor_suggestion").await?;
    let parsed: Option<SuggestionReply> = parse_stage(&reply);
    if parsed.is_none() {
        tracing::warn!(company = company_name, "competitor suggestion reply was not parseable");
    }

    let mut suggestions = parsed?.competitors;
    suggestions.truncate(MAX_SUGGESTIONS);
    Some(suggestions)
}

/// Infers brand positioning and voice from page copy.
pub async fn infer_messaging(
    client: &LlmClient,
    pacer: &Pacer,
    company_name: &str,
    content: &StructuredContent,
) -> Option<MessagingInference> {
    pacer.pace().await;

    let prompt = format!(
        "You are a brand strategist. Analyze the messaging of {company_name} from its website \
         content below.\n\
         \n\
         Headline: {h1}\n\
         Subheadline: {subheadline}\n\
         Page text: {text}\n\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"positioning\": \"one sentence on how the brand positions itself\", \
         \"voiceAdjectives\": [\"three\", \"single\", \"adjectives\"], \
         \"voiceSummary\": \"one sentence on the brand voice\"}}\n\
         No markdown, no commentary.",
        h1 = content.h1,
        subheadline = content.subheadline,
        text = content.text,
    );

    let reply = send_or_warn(client, &prompt, &[], "messaging").await?;
    let parsed = parse_stage(&reply);
    if parsed.is_none() {
        tracing::warn!(company = company_name, "messaging reply was not parseable");
    }
    parsed
}

/// Infers visual identity from a page screenshot.
///
/// No screenshot short-circuits to [`VisualInference::unavailable`] without
/// an LLM call; a failed call or unparseable reply degrades to the same
/// sentinel.
pub async fn infer_visuals(
    client: &LlmClient,
    pacer: &Pacer,
    company_name: &str,
    screenshot: Option<&str>,
) -> VisualInference {
    let Some(screenshot) = screenshot else {
        return VisualInference::unavailable();
    };

    pacer.pace().await;

    let prompt = format!(
        "You are a brand designer. Describe the visual identity of {company_name} from the \
         attached homepage screenshot. {CAPTCHA_CLAUSE}\n\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"colors\": \"dominant palette\", \"typography\": \"type choices\", \
         \"visualStyle\": \"one sentence on the overall style\"}}\n\
         No markdown, no commentary.",
    );

    let Some(reply) = send_or_warn(client, &prompt, &[screenshot], "visual_identity").await else {
        return VisualInference::unavailable();
    };

    parse_stage(&reply).unwrap_or_else(|| {
        tracing::warn!(company = company_name, "visual identity reply was not parseable");
        VisualInference::unavailable()
    })
}

/// Infers a first-time visitor's impression from metadata and up to two
/// screenshots (search results first, then the site itself).
pub async fn infer_first_impression(
    client: &LlmClient,
    pacer: &Pacer,
    company_name: &str,
    content: &StructuredContent,
    search_screenshot: Option<&str>,
    page_screenshot: Option<&str>,
) -> Option<FirstImpression> {
    pacer.pace().await;

    let images: Vec<&str> = [search_screenshot, page_screenshot]
        .into_iter()
        .flatten()
        .collect();

    let prompt = format!(
        "You are a prospective customer seeing {company_name} for the first time. The first \
         attached screenshot (if any) is a search results page for the company, the second its \
         homepage. {CAPTCHA_CLAUSE}\n\
         \n\
         Meta title: {meta_title}\n\
         Meta description: {meta_description}\n\
         \n\
         Respond with only a JSON object of the shape\n\
         {{\"firstImpression\": \"one sentence gut reaction\", \
         \"clarity\": \"is it clear what they sell?\", \
         \"appeal\": \"would you keep reading?\"}}\n\
         No markdown, no commentary.",
        meta_title = content.meta_title,
        meta_description = content.meta_description,
    );

    let reply = send_or_warn(client, &prompt, &images, "first_impression").await?;
    let parsed = parse_stage(&reply);
    if parsed.is_none() {
        tracing::warn!(company = company_name, "first impression reply was not parseable");
    }
    parsed
}

/// Sends the prompt and converts any client error into `None` with a `warn`
/// log tagged by stage.
pub(crate) async fn send_or_warn(
    client: &LlmClient,
    prompt: &str,
    images: &[&str],
    stage: &str,
) -> Option<String> {
    match client.send_prompt(prompt, images).await {
        Ok(reply) => Some(reply),
        Err(e) => {
            tracing::warn!(stage, error = %e, "LLM call failed");
            None
        }
    }
}
