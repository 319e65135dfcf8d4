use config::{Config, ConfigError, Environment, File};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main extractor configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractorConfig {
    /// Env files searched for the API key, first match wins
    #[serde(default = "default_env_files")]
    pub env_files: Vec<PathBuf>,
    /// Name of the variable holding the API key
    #[serde(default = "default_api_key_var")]
    pub api_key_var: String,
    /// Directory where `recipe_<video id>.json` is written in non-quiet mode
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Generative API configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Transcript service configuration
    #[serde(default)]
    pub transcripts: TranscriptConfig,
    /// Video metadata configuration
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Configuration for the Gemini provider
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// API key (can also come from env files or the environment)
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout: u64,
    /// Base URL for the API endpoint (for proxies and tests)
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout: default_llm_timeout(),
            base_url: default_gemini_base_url(),
        }
    }
}

/// Configuration for transcript retrieval
#[derive(Debug, Deserialize, Clone)]
pub struct TranscriptConfig {
    /// Base URL of the video site
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
    /// Preferred caption languages for the direct fetch, in order
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            base_url: default_youtube_base_url(),
            languages: default_languages(),
            timeout: default_fetch_timeout(),
        }
    }
}

/// Configuration for the yt-dlp metadata lookup
#[derive(Debug, Deserialize, Clone)]
pub struct MetadataConfig {
    /// Whether metadata lookup runs at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path or name of the yt-dlp binary
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: String,
    /// Timeout in seconds for the yt-dlp process
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ytdlp_path: default_ytdlp_path(),
            timeout: default_fetch_timeout(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            env_files: default_env_files(),
            api_key_var: default_api_key_var(),
            output_dir: default_output_dir(),
            gemini: GeminiConfig::default(),
            transcripts: TranscriptConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

// Default value functions
fn default_env_files() -> Vec<PathBuf> {
    vec![
        PathBuf::from(".env.local"),
        PathBuf::from(".env"),
        PathBuf::from("../.env.local"),
    ]
}

fn default_api_key_var() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_youtube_base_url() -> String {
    "https://www.youtube.com".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_ytdlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_true() -> bool {
    true
}

impl ExtractorConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACTOR__ prefix
    /// 2. recipe-extractor.toml file in current directory
    /// 3. Default values
    ///
    /// When no API key is configured, the plain `GEMINI_API_KEY` process
    /// variable is used as the last resort after the env files.
    ///
    /// Environment variable format: RECIPE_EXTRACTOR__GEMINI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Resolve the API key: config value first, then the env files in order.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.gemini.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }

        self.env_files
            .iter()
            .find_map(|path| read_key_from_env_file(path, &self.api_key_var))
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<ExtractorConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe-extractor").required(false))
        // Use double underscore for nested: RECIPE_EXTRACTOR__GEMINI__MODEL
        .add_source(
            Environment::with_prefix("RECIPE_EXTRACTOR")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: ExtractorConfig = settings.try_deserialize()?;

    if config.resolve_api_key().is_none() {
        config.gemini.api_key = std::env::var(&config.api_key_var)
            .ok()
            .filter(|key| !key.trim().is_empty());
    }

    Ok(config)
}

/// Read one variable from a dotenv-style file, ignoring unreadable files and lines
fn read_key_from_env_file(path: &Path, var: &str) -> Option<String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            debug!("Skipping env file {}: {}", path.display(), e);
            return None;
        }
    };

    iter.filter_map(Result::ok)
        .find(|(key, value)| key == var && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
