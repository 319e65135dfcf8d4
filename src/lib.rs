//! Extract structured recipes from cooking videos.
//!
//! The pipeline turns a video URL into a [`RecipeRecord`]: the video id is
//! parsed from the URL, the caption transcript is downloaded, optional video
//! metadata is looked up, and Google Gemini is asked to turn the transcript
//! into recipe JSON.
//!
//! ```no_run
//! use recipe_extractor::{ExtractorConfig, RecipeExtractor, Reporter};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = RecipeExtractor::new(ExtractorConfig::load()?);
//! let result = extractor
//!     .extract("https://youtube.com/watch?v=abc123", &Reporter::quiet())
//!     .await;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod metadata;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod reporter;
pub mod transcripts;
pub mod video_id;

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use model::{
    ExtractionFailure, ExtractionResult, Ingredient, Instruction, RecipeRecord, VideoMetadata,
};
pub use pipeline::{RecipeExtractor, RecipeExtractorBuilder};
pub use reporter::Reporter;
pub use video_id::extract_video_id;

/// Extract a recipe from a video URL using configuration from file and environment.
///
/// Configuration problems are reported as a failed result rather than an error.
pub async fn extract_recipe(video_url: &str, reporter: &Reporter) -> ExtractionResult {
    match ExtractorConfig::load() {
        Ok(config) => RecipeExtractor::new(config).extract(video_url, reporter).await,
        Err(e) => ExtractionFailure::new(ExtractError::from(e).to_string()).into(),
    }
}
