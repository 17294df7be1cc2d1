//! Deterministic structured-content extraction from raw HTML.
//!
//! Everything here is regex-driven and pure: the same HTML always yields the
//! same [`StructuredContent`], no parsing library, no DOM. Every field is
//! length-capped before it reaches an LLM prompt so pathological pages cannot
//! blow up prompt size.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

/// Body-text cap for the full audit path.
pub const AUDIT_TEXT_CAP: usize = 1500;
/// Body-text cap for the lightweight competitor-suggestion path.
pub const SUGGEST_TEXT_CAP: usize = 800;

const TITLE_CAP: usize = 200;
const DESCRIPTION_CAP: usize = 300;
const H1_CAP: usize = 200;
const SUBHEADLINE_CAP: usize = 300;
const MAX_COLORS: usize = 5;
const MAX_FONTS: usize = 3;

/// Class-attribute keywords that mark a `<p>` as a hero subheadline.
const SUBHEAD_CLASS_HINTS: [&str; 4] = ["hero", "subtitle", "lead", "intro"];

/// Fixed-shape summary of one webpage, used as LLM input.
///
/// Absent fields are empty strings, never `None` — the prompt builders
/// interpolate them directly. `colors` and `fonts` are comma-joined lists
/// capped at 5 and 3 distinct entries respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredContent {
    pub meta_title: String,
    pub meta_description: String,
    pub h1: String,
    pub subheadline: String,
    pub colors: String,
    pub fonts: String,
    pub text: String,
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));

static META_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+name\s*=\s*["']description["'][^>]+content\s*=\s*["'](.*?)["'][^>]*>"#,
    )
    .expect("valid meta description regex")
});

static META_DESC_SWAPPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+content\s*=\s*["'](.*?)["'][^>]+name\s*=\s*["']description["'][^>]*>"#,
    )
    .expect("valid meta description fallback regex")
});

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid h1 regex"));

static H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").expect("valid h2 regex"));

static P_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<p[^>]+class\s*=\s*["']([^"']*)["'][^>]*>(.*?)</p>"#)
        .expect("valid classed paragraph regex")
});

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:background-color|background|color)\s*:\s*([^;"'}<]+)"#)
        .expect("valid color declaration regex")
});

// Optional leading quote so `font-family: "Helvetica Neue", ...` captures
// the quoted name; the capture stops at the closing quote.
static FONT_FAMILY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)font-family\s*:\s*["']?([^;"'}<>]+)"#).expect("valid font-family regex")
});

static GOOGLE_FONTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']([^"']*fonts\.googleapis\.com/css[^"']*)["']"#)
        .expect("valid google fonts link regex")
});

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));

static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex"));

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Derives a [`StructuredContent`] record from raw HTML.
///
/// `text_cap` bounds the cleaned body text; call sites pass
/// [`AUDIT_TEXT_CAP`] for full audits and [`SUGGEST_TEXT_CAP`] for the
/// competitor-suggestion path. `None` or blank input yields the all-empty
/// record. Never panics, whatever the input.
#[must_use]
pub fn extract(html: Option<&str>, text_cap: usize) -> StructuredContent {
    let Some(html) = html.filter(|h| !h.trim().is_empty()) else {
        return StructuredContent::default();
    };

    StructuredContent {
        meta_title: truncate_chars(&extract_title(html), TITLE_CAP),
        meta_description: truncate_chars(&extract_meta_description(html), DESCRIPTION_CAP),
        h1: truncate_chars(&extract_h1(html), H1_CAP),
        subheadline: truncate_chars(&extract_subheadline(html), SUBHEADLINE_CAP),
        colors: extract_colors(html).join(", "),
        fonts: extract_fonts(html).join(", "),
        text: extract_body_text(html, text_cap),
    }
}

fn extract_title(html: &str) -> String {
    first_capture(&TITLE_RE, html).map(|s| clean_fragment(&s)).unwrap_or_default()
}

fn extract_meta_description(html: &str) -> String {
    first_capture(&META_DESC_RE, html)
        .or_else(|| first_capture(&META_DESC_SWAPPED_RE, html))
        .map(|s| clean_fragment(&s))
        .unwrap_or_default()
}

fn extract_h1(html: &str) -> String {
    first_capture(&H1_RE, html).map(|s| clean_fragment(&s)).unwrap_or_default()
}

/// First `<h2>`; when none exists, the first `<p>` whose class attribute
/// carries one of the hero-copy hints (`hero`, `subtitle`, `lead`, `intro`).
fn extract_subheadline(html: &str) -> String {
    if let Some(h2) = first_capture(&H2_RE, html) {
        let cleaned = clean_fragment(&h2);
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    for cap in P_CLASS_RE.captures_iter(html) {
        let class_attr = cap.get(1).map_or("", |m| m.as_str()).to_lowercase();
        if SUBHEAD_CLASS_HINTS.iter().any(|hint| class_attr.contains(hint)) {
            let cleaned = clean_fragment(cap.get(2).map_or("", |m| m.as_str()));
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
    }

    String::new()
}

/// Collects distinct CSS color values from `color` / `background` /
/// `background-color` declarations, inline or embedded, in first-seen order.
fn extract_colors(html: &str) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();
    for cap in COLOR_RE.captures_iter(html) {
        let value = cap
            .get(1)
            .map_or("", |m| m.as_str())
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_string();
        if value.is_empty() || colors.contains(&value) {
            continue;
        }
        colors.push(value);
        if colors.len() == MAX_COLORS {
            break;
        }
    }
    colors
}

/// Collects distinct font names from `font-family` declarations (first
/// family per declaration, quotes stripped) merged with families decoded
/// from a Google Fonts stylesheet link, then capped at [`MAX_FONTS`].
fn extract_fonts(html: &str) -> Vec<String> {
    let mut fonts: Vec<String> = Vec::new();

    for cap in FONT_FAMILY_RE.captures_iter(html) {
        let declaration = cap.get(1).map_or("", |m| m.as_str());
        let first_family = declaration
            .split(',')
            .next()
            .unwrap_or("")
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .trim()
            .to_string();
        if !first_family.is_empty() && !fonts.contains(&first_family) {
            fonts.push(first_family);
        }
    }

    for family in google_fonts_families(html) {
        if !fonts.contains(&family) {
            fonts.push(family);
        }
    }

    fonts.truncate(MAX_FONTS);
    fonts
}

/// Decodes family names from a Google Fonts stylesheet `family=` query
/// parameter: pipe-separated families, `:weight` suffixes stripped, `+` and
/// percent-escapes decoded.
fn google_fonts_families(html: &str) -> Vec<String> {
    let mut families = Vec::new();

    for cap in GOOGLE_FONTS_RE.captures_iter(html) {
        let href = cap.get(1).map_or("", |m| m.as_str());
        let Some(query) = href.split_once('?').map(|(_, q)| q) else {
            continue;
        };

        for param in query.split('&') {
            let Some(value) = param.strip_prefix("family=") else {
                continue;
            };
            for entry in value.split('|') {
                let name = entry.split(':').next().unwrap_or("");
                let decoded = decode_query_component(name);
                let decoded = decoded.trim();
                if !decoded.is_empty() {
                    families.push(decoded.to_string());
                }
            }
        }
    }

    families
}

fn decode_query_component(s: &str) -> String {
    let plus_decoded = s.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map_or(plus_decoded.clone(), |cow| cow.into_owned())
}

/// Visible body text: `<script>`/`<style>` blocks dropped with their
/// content, remaining tags stripped, a minimal entity set decoded,
/// whitespace collapsed, capped at `text_cap` characters.
fn extract_body_text(html: &str, text_cap: usize) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_styles = STYLE_RE.replace_all(&without_scripts, " ");
    let cleaned = clean_fragment(&without_styles);
    truncate_chars(&cleaned, text_cap)
}

fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|cap| cap.get(1).map(|m| m.as_str().to_string()))
}

/// Strips tags, decodes entities, and collapses whitespace runs.
fn clean_fragment(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    let decoded = decode_entities(&no_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Minimal entity set; `&amp;` is decoded last so `&amp;lt;` does not turn
/// into a bare `<`.
fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn truncate_chars(s: &str, cap: usize) -> String {
    if s.chars().count() <= cap {
        s.to_string()
    } else {
        s.chars().take(cap).collect()
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
