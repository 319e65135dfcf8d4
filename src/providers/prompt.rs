/// The instruction template used for extracting a recipe from a video transcript.
///
/// It asks the model to act as a recipe extraction expert, shows the exact
/// JSON schema as a literal example and demands the bare JSON object back.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
///
/// Contains a `{{TRANSCRIPT}}` placeholder filled in by [`build_recipe_prompt`].
pub const RECIPE_EXTRACTION_PROMPT: &str = include_str!("prompt.txt");

/// Embed the transcript verbatim into the extraction template.
pub fn build_recipe_prompt(transcript: &str) -> String {
    RECIPE_EXTRACTION_PROMPT.replace("{{TRANSCRIPT}}", transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!RECIPE_EXTRACTION_PROMPT.is_empty());
        assert!(RECIPE_EXTRACTION_PROMPT.contains("{{TRANSCRIPT}}"));
        assert!(RECIPE_EXTRACTION_PROMPT.contains("recipe extraction expert"));
        assert!(RECIPE_EXTRACTION_PROMPT.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn test_prompt_contains_schema() {
        for field in [
            "\"title\"",
            "\"ingredients\"",
            "\"instructions\"",
            "\"step\": 1",
            "\"servings\": 4",
            "\"chef_tips\"",
            "\"equipment\"",
            "\"tags\"",
        ] {
            assert!(RECIPE_EXTRACTION_PROMPT.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_build_recipe_prompt_embeds_transcript() {
        let transcript = "boil pork in vinegar and soy sauce for 30 minutes";
        let prompt = build_recipe_prompt(transcript);

        assert!(prompt.contains(transcript));
        assert!(!prompt.contains("{{TRANSCRIPT}}"));
        assert_eq!(prompt, build_recipe_prompt(transcript));
    }
}
