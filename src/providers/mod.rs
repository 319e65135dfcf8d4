mod google;
pub mod prompt;
pub mod response;

pub use google::GeminiProvider;
pub use prompt::{build_recipe_prompt, RECIPE_EXTRACTION_PROMPT};
pub use response::{parse_recipe, strip_code_fences};

use crate::error::ExtractError;
use async_trait::async_trait;

/// Unified trait for generative text providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send one prompt and return the raw text of the first answer.
    ///
    /// Exactly one request is made; there is no retry.
    async fn generate(&self, prompt: &str) -> Result<String, ExtractError>;
}
