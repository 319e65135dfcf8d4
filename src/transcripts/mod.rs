mod youtube;

pub use youtube::YouTubeTranscriptClient;

use crate::error::ExtractError;
use crate::reporter::Reporter;
use async_trait::async_trait;
use thiserror::Error;

/// One timed caption fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
}

/// A caption track available for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTrack {
    pub language_code: String,
    pub name: String,
    pub base_url: String,
    /// Auto-generated (speech recognition) rather than uploaded captions
    pub is_generated: bool,
}

/// Full transcript text of a video
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub segment_count: usize,
    pub language: Option<String>,
}

impl Transcript {
    /// Join segment texts in order with a single space
    pub fn from_segments(
        segments: &[Segment],
        language: Option<String>,
    ) -> Result<Self, TranscriptError> {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Err(TranscriptError::Empty);
        }

        Ok(Transcript {
            text,
            segment_count: segments.len(),
            language,
        })
    }

    /// Length in characters
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Failure of a single transcript request
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transcripts are disabled for this video")]
    NoCaptionTracks,

    #[error("no transcript found for languages {0:?}")]
    NoMatchingLanguage(Vec<String>),

    #[error("none of the {0} available tracks could be fetched")]
    AllTracksFailed(usize),

    #[error("malformed caption data: {0}")]
    Malformed(String),

    #[error("transcript is empty")]
    Empty,
}

/// Boundary to the external transcript service
#[async_trait]
pub trait TranscriptApi: Send + Sync {
    /// Fetch the transcript in the preferred languages
    async fn fetch(&self, video_id: &str) -> Result<Vec<Segment>, TranscriptError>;

    /// List every available caption track
    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>, TranscriptError>;

    /// Fetch one specific track
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<Segment>, TranscriptError>;
}

/// Ways of obtaining a transcript, tried in [`Strategy::ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Ask the service directly for the preferred languages
    Direct,
    /// List every track and take the first one that can be fetched
    EnumerateTracks,
}

impl Strategy {
    pub const ORDER: [Strategy; 2] = [Strategy::Direct, Strategy::EnumerateTracks];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct fetch",
            Strategy::EnumerateTracks => "track listing",
        }
    }

    async fn run(
        &self,
        api: &dyn TranscriptApi,
        video_id: &str,
        reporter: &Reporter,
    ) -> Result<Transcript, TranscriptError> {
        match self {
            Strategy::Direct => {
                let segments = api.fetch(video_id).await?;
                let transcript = Transcript::from_segments(&segments, None)?;
                reporter.info(format!(
                    "Transcript extracted: {} chars, {} segments",
                    transcript.char_count(),
                    transcript.segment_count
                ));
                Ok(transcript)
            }
            Strategy::EnumerateTracks => {
                let tracks = api.list(video_id).await?;
                for track in &tracks {
                    let result = api.fetch_track(track).await.and_then(|segments| {
                        Transcript::from_segments(&segments, Some(track.language_code.clone()))
                    });

                    match result {
                        Ok(transcript) => {
                            reporter.info(format!(
                                "Transcript ({}): {} chars",
                                track.language_code,
                                transcript.char_count()
                            ));
                            return Ok(transcript);
                        }
                        Err(e) => {
                            reporter.debug(format!("  Track {} failed: {}", track.language_code, e));
                        }
                    }
                }
                Err(TranscriptError::AllTracksFailed(tracks.len()))
            }
        }
    }
}

/// Run every strategy in order; the first transcript with text wins.
///
/// When all of them fail the per-strategy reasons are collected into
/// [`ExtractError::NoTranscript`].
pub async fn fetch_transcript(
    api: &dyn TranscriptApi,
    video_id: &str,
    reporter: &Reporter,
) -> Result<Transcript, ExtractError> {
    let mut reasons = Vec::new();

    for strategy in Strategy::ORDER {
        match strategy.run(api, video_id, reporter).await {
            Ok(transcript) => return Ok(transcript),
            Err(e) => {
                reporter.warn(format!("  {} failed: {}", strategy.name(), e));
                reasons.push(format!("{}: {}", strategy.name(), e));
            }
        }
    }

    Err(ExtractError::NoTranscript {
        video_id: video_id.to_string(),
        reasons,
    })
}
