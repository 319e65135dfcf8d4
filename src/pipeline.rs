use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::metadata::{MetadataSource, NoMetadata, YtDlpMetadata};
use crate::model::{ExtractionFailure, ExtractionResult, RecipeRecord, VideoMetadata};
use crate::providers::{build_recipe_prompt, parse_recipe, GeminiProvider, LlmProvider};
use crate::reporter::Reporter;
use crate::transcripts::{fetch_transcript, Transcript, TranscriptApi, YouTubeTranscriptClient};
use crate::video_id::extract_video_id;

/// Transcript-to-recipe extraction pipeline.
///
/// Stages run strictly in order and every failure except the metadata
/// lookup ends the run with an [`ExtractionResult::Failure`].
pub struct RecipeExtractor {
    config: ExtractorConfig,
    transcripts: Option<Box<dyn TranscriptApi>>,
    metadata: Box<dyn MetadataSource>,
    provider: Option<Box<dyn LlmProvider>>,
}

impl RecipeExtractor {
    /// Pipeline with the production transcript, metadata and Gemini clients
    pub fn new(config: ExtractorConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run the whole pipeline for one URL
    pub async fn extract(&self, video_url: &str, reporter: &Reporter) -> ExtractionResult {
        reporter.banner("AI RECIPE EXTRACTOR - Gemini Enhanced");

        // Load API key
        let Some(api_key) = self.config.resolve_api_key() else {
            return failure(ExtractError::MissingApiKey);
        };

        // Extract video ID
        let Some(video_id) = extract_video_id(video_url) else {
            return failure(ExtractError::InvalidUrl);
        };
        reporter.info(format!("Video ID: {video_id}"));

        // Get video info
        reporter.info("Fetching video info...");
        let metadata = self.fetch_metadata(&video_id, reporter).await;
        if !metadata.title.is_empty() {
            reporter.info(format!("   Title: {}", metadata.title));
            let channel = if metadata.channel.is_empty() {
                "Unknown"
            } else {
                metadata.channel.as_str()
            };
            reporter.info(format!("   Channel: {channel}"));
        }

        // Get transcript
        reporter.info("Extracting transcript...");
        let transcript = match self.fetch_transcript(&video_id, reporter).await {
            Ok(transcript) => transcript,
            Err(e) => {
                if let ExtractError::NoTranscript { reasons, .. } = &e {
                    reporter.debug(format!("Transcript failures: {}", reasons.join("; ")));
                }
                return ExtractionFailure::new(e.to_string())
                    .with_video_id(video_id)
                    .into();
            }
        };

        // Parse with Gemini
        reporter.info("Analyzing with AI...");
        let recipe = match self.generate_recipe(&transcript, &api_key, reporter).await {
            Ok(recipe) => recipe,
            Err(e) => {
                reporter.warn(&e);
                return ExtractionFailure::new(e.to_string())
                    .with_transcript_length(transcript.char_count())
                    .into();
            }
        };

        assemble(recipe, video_url, &video_id, &metadata, &transcript).into()
    }

    async fn fetch_metadata(&self, video_id: &str, reporter: &Reporter) -> VideoMetadata {
        match self.metadata.fetch(video_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                reporter.debug(format!("   Video info unavailable: {e}"));
                VideoMetadata::default()
            }
        }
    }

    async fn fetch_transcript(
        &self,
        video_id: &str,
        reporter: &Reporter,
    ) -> Result<Transcript, ExtractError> {
        match &self.transcripts {
            Some(api) => fetch_transcript(api.as_ref(), video_id, reporter).await,
            None => {
                let api = YouTubeTranscriptClient::new(&self.config.transcripts).map_err(|e| {
                    ExtractError::NoTranscript {
                        video_id: video_id.to_string(),
                        reasons: vec![e.to_string()],
                    }
                })?;
                fetch_transcript(&api, video_id, reporter).await
            }
        }
    }

    async fn generate_recipe(
        &self,
        transcript: &Transcript,
        api_key: &str,
        reporter: &Reporter,
    ) -> Result<RecipeRecord, ExtractError> {
        reporter.info("Parsing recipe with Gemini AI...");
        let prompt = build_recipe_prompt(&transcript.text);

        let raw = match &self.provider {
            Some(provider) => provider.generate(&prompt).await?,
            None => {
                GeminiProvider::new(&self.config.gemini, api_key)?
                    .generate(&prompt)
                    .await?
            }
        };

        let recipe = parse_recipe(&raw)?;
        reporter.info("Recipe parsed successfully with Gemini");
        Ok(recipe)
    }
}

fn failure(error: ExtractError) -> ExtractionResult {
    ExtractionFailure::new(error.to_string()).into()
}

/// Merge pipeline context into the parsed recipe; model fields are left as returned
pub fn assemble(
    mut recipe: RecipeRecord,
    video_url: &str,
    video_id: &str,
    metadata: &VideoMetadata,
    transcript: &Transcript,
) -> RecipeRecord {
    recipe.video_id = video_id.to_string();
    recipe.video_url = video_url.to_string();
    recipe.video_title = metadata.title.clone();
    recipe.channel = metadata.channel.clone();
    recipe.thumbnail = metadata.thumbnail.clone();
    recipe.transcript_length = transcript.char_count();
    recipe
}

/// Builder for a [`RecipeExtractor`] with replaceable service boundaries
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    config: Option<ExtractorConfig>,
    transcripts: Option<Box<dyn TranscriptApi>>,
    metadata: Option<Box<dyn MetadataSource>>,
    provider: Option<Box<dyn LlmProvider>>,
}

impl RecipeExtractorBuilder {
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a custom transcript service instead of the YouTube watch page client
    pub fn transcript_api(mut self, api: impl TranscriptApi + 'static) -> Self {
        self.transcripts = Some(Box::new(api));
        self
    }

    /// Use a custom metadata source instead of yt-dlp
    pub fn metadata_source(mut self, source: impl MetadataSource + 'static) -> Self {
        self.metadata = Some(Box::new(source));
        self
    }

    /// Use a custom generative provider instead of Gemini.
    ///
    /// The API key is still required to be resolvable.
    pub fn provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn build(self) -> RecipeExtractor {
        let config = self.config.unwrap_or_default();

        let metadata: Box<dyn MetadataSource> = match self.metadata {
            Some(source) => source,
            None if config.metadata.enabled => Box::new(YtDlpMetadata::new(&config.metadata)),
            None => Box::new(NoMetadata),
        };

        RecipeExtractor {
            transcripts: self.transcripts,
            metadata,
            provider: self.provider,
            config,
        }
    }
}
