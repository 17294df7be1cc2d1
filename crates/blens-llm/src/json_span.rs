//! Defensive extraction of a JSON object from free-form model text.
//!
//! Models wrap JSON in prose, code fences, or apologies. The recovery
//! heuristic is deliberately crude: take the span from the first `{` to the
//! last `}` and try to parse it. Not a JSON-aware scanner — a reply holding
//! two separate objects parses as neither, which the stages treat the same
//! as any other unparseable reply.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returns the first-`{`-to-last-`}` span of `reply` parsed as JSON, or
/// `None` when no such span exists or it is not valid JSON.
#[must_use]
pub fn first_json_object(reply: &str) -> Option<Value> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

/// Deserializes the recovered JSON object into a stage's typed output.
///
/// Absence is the only failure mode: a missing span, invalid JSON, or a
/// shape mismatch all yield `None`.
#[must_use]
pub fn parse_stage<T: DeserializeOwned>(reply: &str) -> Option<T> {
    let value = first_json_object(reply)?;
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_wrapped_in_prose() {
        let reply = "Sure! Here is the JSON you asked for:\n{\"score\": 42}\nHope that helps.";
        let value = first_json_object(reply).expect("object should parse");
        assert_eq!(value["score"], 42);
    }

    #[test]
    fn extracts_object_inside_code_fence() {
        let reply = "```json\n{\"verdict\": \"crowded\"}\n```";
        let value = first_json_object(reply).expect("object should parse");
        assert_eq!(value["verdict"], "crowded");
    }

    #[test]
    fn greedy_span_covers_nested_objects() {
        let reply = r#"{"overlaps": [{"category": "Voice", "who": ["A", "B"]}], "score": 10}"#;
        let value = first_json_object(reply).expect("nested object should parse");
        assert_eq!(value["overlaps"][0]["who"][1], "B");
    }

    #[test]
    fn no_braces_yields_none() {
        assert!(first_json_object("I could not analyze this website.").is_none());
    }

    #[test]
    fn unbalanced_braces_yield_none() {
        assert!(first_json_object("{\"score\": 42").is_none());
    }

    #[test]
    fn reversed_braces_yield_none() {
        assert!(first_json_object("} nothing here {").is_none());
    }

    #[test]
    fn invalid_json_between_braces_yields_none() {
        assert!(first_json_object("{this is not json}").is_none());
    }

    #[test]
    fn two_objects_in_one_reply_yield_none() {
        // Greedy span from first { to last } covers both objects — invalid.
        assert!(first_json_object(r#"{"a": 1} and {"b": 2}"#).is_none());
    }

    #[test]
    fn parse_stage_maps_shape_mismatch_to_none() {
        #[derive(serde::Deserialize)]
        struct Strict {
            #[allow(dead_code)]
            score: u8,
        }
        assert!(parse_stage::<Strict>(r#"{"score": "not-a-number"}"#).is_none());
    }
}
