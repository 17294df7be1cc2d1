//! Concurrent collection phase: raw HTML and screenshots for every brand.

use blens_core::BrandProfile;
use blens_scraper::{extract, StructuredContent, AUDIT_TEXT_CAP};
use futures::future::join_all;

use crate::pipeline::AuditDeps;

/// Everything collected for one brand before inference starts.
pub(crate) struct BrandCollection {
    pub profile: BrandProfile,
    pub content: StructuredContent,
    pub screenshot: Option<String>,
    pub search_screenshot: Option<String>,
}

/// Fires page fetch and both captures for every brand concurrently and
/// awaits them all. Results are collected positionally — one slot per
/// brand, no shared mutable state — so no ordering issues arise from the
/// concurrency.
pub(crate) async fn collect_brands(
    deps: &AuditDeps,
    brands: &[BrandProfile],
) -> Vec<BrandCollection> {
    join_all(brands.iter().map(|brand| collect_brand(deps, brand))).await
}

async fn collect_brand(deps: &AuditDeps, brand: &BrandProfile) -> BrandCollection {
    let html_fut = deps.fetcher.fetch_page(&brand.url);

    let (html, screenshot, search_screenshot) = match &deps.capture {
        Some(capture) => {
            tokio::join!(
                html_fut,
                capture.capture_page(&brand.url),
                capture.capture_search(&brand.name),
            )
        }
        None => (html_fut.await, None, None),
    };

    if html.is_none() {
        tracing::warn!(brand = %brand.name, url = %brand.url, "no HTML collected for brand");
    }

    BrandCollection {
        profile: brand.clone(),
        content: extract(html.as_deref(), AUDIT_TEXT_CAP),
        screenshot,
        search_screenshot,
    }
}
