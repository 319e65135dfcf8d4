use crate::config::MetadataConfig;
use crate::model::VideoMetadata;
use crate::video_id::watch_url;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::error::Error;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Boundary to the external video-info service.
///
/// Failures are reported to the caller, which treats them as non-fatal.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>>;
}

/// Metadata source backed by the `yt-dlp` command line tool
pub struct YtDlpMetadata {
    binary: String,
    timeout: Duration,
}

impl YtDlpMetadata {
    pub fn new(config: &MetadataConfig) -> Self {
        Self {
            binary: config.ytdlp_path.clone(),
            timeout: Duration::from_secs(config.timeout),
        }
    }
}

#[async_trait]
impl MetadataSource for YtDlpMetadata {
    async fn fetch(&self, video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>> {
        let mut command = Command::new(&self.binary);
        command
            .args(["--dump-json", "--skip-download", "--no-warnings", "--quiet"])
            .arg(watch_url(video_id))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!("Running {} for {}", self.binary, video_id);
        let output = timeout(self.timeout, command.output())
            .await
            .map_err(|_| format!("{} timed out after {:?}", self.binary, self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} exited with {}: {}", self.binary, output.status, stderr.trim()).into());
        }

        parse_ytdlp_info(&output.stdout)
    }
}

/// Source used when metadata lookup is disabled
pub struct NoMetadata;

#[async_trait]
impl MetadataSource for NoMetadata {
    async fn fetch(&self, _video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>> {
        Ok(VideoMetadata::default())
    }
}

/// Map a `yt-dlp --dump-json` document onto [`VideoMetadata`]
pub(crate) fn parse_ytdlp_info(json: &[u8]) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>> {
    let info: Value = serde_json::from_slice(json)?;
    let text = |key: &str| info[key].as_str().unwrap_or_default().to_string();

    let channel = match text("channel") {
        channel if channel.is_empty() => text("uploader"),
        channel => channel,
    };

    Ok(VideoMetadata {
        title: text("title"),
        description: text("description"),
        channel,
        duration: info["duration"]
            .as_u64()
            .or_else(|| info["duration"].as_f64().map(|d| d.max(0.0).round() as u64))
            .unwrap_or_default(),
        thumbnail: text("thumbnail"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ytdlp_info() {
        let json = br#"{
            "id": "abc123",
            "title": "Filipino Chicken Adobo",
            "description": "Lola's recipe",
            "channel": "Panlasang Pinoy",
            "duration": 612.4,
            "thumbnail": "https://i.ytimg.com/vi/abc123/maxresdefault.jpg"
        }"#;

        let metadata = parse_ytdlp_info(json).unwrap();

        assert_eq!(metadata.title, "Filipino Chicken Adobo");
        assert_eq!(metadata.channel, "Panlasang Pinoy");
        assert_eq!(metadata.duration, 612);
        assert_eq!(
            metadata.thumbnail,
            "https://i.ytimg.com/vi/abc123/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_channel_falls_back_to_uploader() {
        let metadata = parse_ytdlp_info(br#"{"title": "Pancit", "uploader": "Tita"}"#).unwrap();
        assert_eq!(metadata.channel, "Tita");
        assert_eq!(metadata.duration, 0);
        assert!(metadata.description.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_ytdlp_info(b"ERROR: Video unavailable").is_err());
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let source = YtDlpMetadata::new(&MetadataConfig {
            enabled: true,
            ytdlp_path: "/nonexistent/yt-dlp-binary".to_string(),
            timeout: 5,
        });

        assert!(source.fetch("abc123").await.is_err());
    }
}
