use regex::Regex;
use std::sync::LazyLock;

/// Ordered URL patterns, first match wins. Each captures the video id.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)",
        r"youtube\.com/shorts/([^&\n?#]+)",
        r"[?&]v=([^&\n?#]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("video id pattern is valid"))
    .collect()
});

/// Extract the video identifier from a watch, short-link, embed, shorts or
/// generic `v=` URL. Returns `None` when nothing matches.
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_url_shapes_yield_same_id() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=share",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ];

        for url in urls {
            assert_eq!(
                extract_video_id(url).as_deref(),
                Some("dQw4w9WgXcQ"),
                "failed for {url}"
            );
        }
    }

    #[test]
    fn test_short_ids_are_accepted() {
        assert_eq!(
            extract_video_id("https://youtube.com/watch?v=abc123").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_fragment_terminates_id() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/abc123#t=10").as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_unparseable_urls() {
        assert_eq!(extract_video_id("https://example.com/recipes/adobo"), None);
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }
}
