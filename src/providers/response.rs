use crate::error::ExtractError;
use crate::model::RecipeRecord;
use regex::Regex;
use std::sync::LazyLock;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_-]*\s*").expect("leading fence pattern is valid"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("trailing fence pattern is valid"));

/// Remove a surrounding markdown code fence (with optional language tag).
///
/// Text that does not start with a fence is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }

    let start = LEADING_FENCE.find(text).map_or(0, |m| m.end());
    let body = &text[start..];
    match TRAILING_FENCE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    }
}

/// Parse the model output into a [`RecipeRecord`] after stripping fences
pub fn parse_recipe(text: &str) -> Result<RecipeRecord, ExtractError> {
    Ok(serde_json::from_str(strip_code_fences(text))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"title":"Adobo","ingredients":[],"instructions":[]}"#;

    #[test]
    fn test_strips_json_fence() {
        let fenced = format!("```json\n{CLEAN}\n```");
        assert_eq!(strip_code_fences(&fenced), CLEAN);
    }

    #[test]
    fn test_strips_bare_fence_and_whitespace() {
        let fenced = format!("  \n```\n{CLEAN}\n```  \n");
        assert_eq!(strip_code_fences(&fenced), CLEAN);
    }

    #[test]
    fn test_clean_input_is_untouched() {
        assert_eq!(strip_code_fences(CLEAN), CLEAN);
        assert_eq!(strip_code_fences(strip_code_fences(CLEAN)), CLEAN);
    }

    #[test]
    fn test_fenced_and_clean_parse_identically() {
        let fenced = parse_recipe(&format!("```json\n{CLEAN}\n```")).unwrap();
        let clean = parse_recipe(CLEAN).unwrap();

        assert_eq!(fenced, clean);
        assert_eq!(clean.title(), "Adobo");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_recipe("Here is your recipe: Adobo").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_non_object_json_is_parse_error() {
        assert!(matches!(
            parse_recipe("[1, 2, 3]"),
            Err(ExtractError::Parse(_))
        ));
    }
}
