use thiserror::Error;

/// Maximum number of characters of an upstream error body kept for diagnostics
pub const ERROR_BODY_LIMIT: usize = 500;

/// Errors that can end a recipe extraction run
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No Gemini API key could be resolved from config, env files or environment
    #[error("GEMINI_API_KEY not found in .env.local")]
    MissingApiKey,

    /// The input does not match any known video URL shape
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    /// Every transcript strategy failed
    #[error("No transcript available")]
    NoTranscript {
        video_id: String,
        reasons: Vec<String>,
    },

    /// The generative API answered with a non-success status
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The generative API answered 200 but without any candidate text
    #[error("Failed to parse recipe: Gemini response contained no candidate text")]
    EmptyResponse,

    /// The model output is not valid recipe JSON
    #[error("Failed to parse recipe: JSON parsing failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport failure talking to the generative API
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ExtractError {
    /// Build an [`ExtractError::Api`] keeping at most [`ERROR_BODY_LIMIT`] characters of the body
    pub fn api(status: u16, body: &str) -> Self {
        ExtractError::Api {
            status,
            body: truncate_chars(body, ERROR_BODY_LIMIT),
        }
    }
}

/// Truncate on a character boundary
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
