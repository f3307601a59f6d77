//! Extraction of lesson content from untrusted model output.
//!
//! Accepts exactly one convention: a JSON object in the shape of
//! [`LessonContent`], either inside a fenced code block or bare in the text.
//! Anything else is a parse failure.

use crate::{LessonContent, LessonError, LessonRequest, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Fenced code block, optionally tagged `json`.
const FENCE_PATTERN: &str = r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n(.*?)```";

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| Regex::new(FENCE_PATTERN).expect("Invalid fence pattern regex"))
}

/// JSON candidates in the order they are tried: fenced blocks, then the
/// span from the first `{` to the last `}`.
fn candidates(text: &str) -> Vec<&str> {
    let mut found: Vec<&str> = get_fence_regex()
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| !body.is_empty())
        .collect();

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            found.push(&text[start..=end]);
        }
    }

    found
}

/// Parse model output into lesson content and check it fits `request`.
///
/// Candidates are tried in order until one both parses and carries the
/// requested tiers. A candidate that parses but fails the check is reported
/// in preference to a syntax error.
pub fn extract_content(text: &str, request: &LessonRequest) -> Result<LessonContent> {
    let candidates = candidates(text);
    if candidates.is_empty() {
        return Err(LessonError::Parse("no JSON object found in response".to_string()));
    }

    let mut rejected = None;
    let mut syntax_error = None;
    for candidate in candidates {
        match serde_json::from_str::<LessonContent>(candidate) {
            Ok(content) => match content.check_against(request) {
                Ok(()) => return Ok(content),
                Err(e) => {
                    rejected.get_or_insert(e);
                }
            },
            Err(e) => {
                syntax_error.get_or_insert(e);
            }
        }
    }

    Err(rejected.unwrap_or_else(|| {
        LessonError::Parse(format!(
            "response is not valid lesson JSON: {}",
            syntax_error.map(|e| e.to_string()).unwrap_or_default()
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LessonRequestInput, TemplateEngine};

    fn request(gifted: bool) -> LessonRequest {
        LessonRequestInput::new("8", "Chemistry", "Chemical Bonding", "1")
            .with_gifted_talented(gifted)
            .validate()
            .unwrap()
    }

    fn ai_json(gifted: bool) -> (LessonContent, String) {
        let mut content = TemplateEngine::new().generate(&request(gifted));
        content.objectives = "Students will be able to design ionic models.".to_string();
        let json = serde_json::to_string_pretty(&content).unwrap();
        (content, json)
    }

    #[test]
    fn test_fenced_json() {
        let (expected, json) = ai_json(false);
        let text = format!("Here is your lesson:\n```json\n{}\n```\nEnjoy!", json);
        assert_eq!(extract_content(&text, &request(false)).unwrap(), expected);
    }

    #[test]
    fn test_untagged_fence() {
        let (expected, json) = ai_json(false);
        let text = format!("```\n{}\n```", json);
        assert_eq!(extract_content(&text, &request(false)).unwrap(), expected);
    }

    #[test]
    fn test_bare_json_with_chatter() {
        let (expected, json) = ai_json(true);
        let text = format!("Sure! {} Let me know if you need changes.", json);
        assert_eq!(extract_content(&text, &request(true)).unwrap(), expected);
    }

    #[test]
    fn test_plain_text_rejected() {
        let text = "1. Objectives\nStudents will learn bonding.\n\n2. Vocabulary\nAtom";
        let err = extract_content(text, &request(false)).unwrap_err();
        assert!(matches!(err, LessonError::Parse(_)));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let text = "```json\n{\"objectives\": \"x\", \"vocabulary\": [\n```";
        assert!(extract_content(text, &request(false)).is_err());
    }

    #[test]
    fn test_missing_keys_rejected() {
        let text = r#"{"objectives": "x", "vocabulary": ["Atom"]}"#;
        assert!(extract_content(text, &request(false)).is_err());
    }

    #[test]
    fn test_unrequested_gifted_tier_rejected() {
        let (_, json) = ai_json(true);
        let err = extract_content(&json, &request(false)).unwrap_err();
        assert!(matches!(err, LessonError::InconsistentTiers(_)));
        assert!(err.to_string().contains("tiers"));
    }

    #[test]
    fn test_later_block_used_after_tier_mismatch() {
        let (_, gifted_json) = ai_json(true);
        let (expected, json) = ai_json(false);
        let text = format!(
            "First draft:\n```json\n{}\n```\nCorrected:\n```json\n{}\n```",
            gifted_json, json
        );
        assert_eq!(extract_content(&text, &request(false)).unwrap(), expected);
    }

    #[test]
    fn test_empty_objectives_rejected() {
        let (mut content, _) = ai_json(false);
        content.objectives = "  ".to_string();
        let json = serde_json::to_string(&content).unwrap();
        let err = extract_content(&json, &request(false)).unwrap_err();
        assert!(matches!(err, LessonError::Parse(_)));
    }

    #[test]
    fn test_missing_gifted_tier_rejected() {
        let (_, json) = ai_json(false);
        let err = extract_content(&json, &request(true)).unwrap_err();
        assert!(matches!(err, LessonError::InconsistentTiers(_)));
    }
}
