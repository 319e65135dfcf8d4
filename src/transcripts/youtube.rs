use super::{Segment, TranscriptApi, TranscriptError, TranscriptTrack};
use crate::config::TranscriptConfig;
use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Marker preceding the caption track list inside the watch page player response
const CAPTION_TRACKS_MARKER: &str = "\"captionTracks\":";

/// Transcript client reading the caption tracks published on a YouTube watch page
pub struct YouTubeTranscriptClient {
    client: Client,
    base_url: String,
    languages: Vec<String>,
}

impl YouTubeTranscriptClient {
    pub fn new(config: &TranscriptConfig) -> Result<Self, TranscriptError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            languages: config.languages.clone(),
        })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, TranscriptError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptApi for YouTubeTranscriptClient {
    async fn fetch(&self, video_id: &str) -> Result<Vec<Segment>, TranscriptError> {
        let tracks = self.list(video_id).await?;
        let track = select_track(&tracks, &self.languages)
            .ok_or_else(|| TranscriptError::NoMatchingLanguage(self.languages.clone()))?;
        debug!(
            "Selected {} track ({})",
            track.language_code,
            if track.is_generated { "generated" } else { "manual" }
        );
        self.fetch_track(track).await
    }

    async fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>, TranscriptError> {
        let url = format!("{}/watch", self.base_url);
        let html = self
            .get_text(
                self.client
                    .get(&url)
                    .query(&[("v", video_id)])
                    .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
            )
            .await?;

        parse_caption_tracks(&html)
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<Segment>, TranscriptError> {
        let body = self
            .get_text(self.client.get(&track.base_url).query(&[("fmt", "json3")]))
            .await?;

        parse_json3(&body)
    }
}

/// Pick the first track for the earliest preferred language, manual captions before generated ones
fn select_track<'a>(tracks: &'a [TranscriptTrack], languages: &[String]) -> Option<&'a TranscriptTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| &t.language_code == lang);
        let first = matching.clone().find(|t| !t.is_generated);
        first.or_else(|| matching.next())
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    name: Value,
}

impl From<CaptionTrack> for TranscriptTrack {
    fn from(track: CaptionTrack) -> Self {
        // Names come as {"simpleText": ".."} or {"runs": [{"text": ".."}]}
        let name = track.name["simpleText"]
            .as_str()
            .or_else(|| track.name["runs"][0]["text"].as_str())
            .unwrap_or(track.language_code.as_str())
            .to_string();

        TranscriptTrack {
            is_generated: track.kind.as_deref() == Some("asr"),
            language_code: track.language_code,
            name,
            base_url: track.base_url,
        }
    }
}

/// Read the caption track array embedded in a watch page
pub(crate) fn parse_caption_tracks(html: &str) -> Result<Vec<TranscriptTrack>, TranscriptError> {
    let start = html
        .find(CAPTION_TRACKS_MARKER)
        .ok_or(TranscriptError::NoCaptionTracks)?
        + CAPTION_TRACKS_MARKER.len();

    // The array is followed by the rest of the player response; only the first value is read
    let mut stream =
        serde_json::Deserializer::from_str(&html[start..]).into_iter::<Vec<CaptionTrack>>();

    match stream.next() {
        Some(Ok(tracks)) if !tracks.is_empty() => {
            Ok(tracks.into_iter().map(TranscriptTrack::from).collect())
        }
        Some(Ok(_)) => Err(TranscriptError::NoCaptionTracks),
        Some(Err(e)) => Err(TranscriptError::Malformed(e.to_string())),
        None => Err(TranscriptError::Malformed(
            "caption track list is truncated".to_string(),
        )),
    }
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a `fmt=json3` caption document into segments, dropping events without text
pub(crate) fn parse_json3(body: &str) -> Result<Vec<Segment>, TranscriptError> {
    if body.trim().is_empty() {
        return Err(TranscriptError::Empty);
    }

    let doc: Json3 =
        serde_json::from_str(body).map_err(|e| TranscriptError::Malformed(e.to_string()))?;

    Ok(doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            Some(Segment {
                text: text.to_string(),
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}
