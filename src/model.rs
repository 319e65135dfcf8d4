use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recipe as returned by the model, plus fields appended by the pipeline.
///
/// The model's JSON object is kept verbatim in `fields`: missing keys stay
/// missing and values of an unexpected shape are serialized back exactly as
/// they came. The typed accessors below are read-only views over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    /// Everything the model returned, untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    // Appended by the pipeline
    #[serde(default, deserialize_with = "lenient::string")]
    pub video_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub video_url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub video_title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub channel: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub transcript_length: usize,
}

impl RecipeRecord {
    /// Raw value of a model field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Recipe title, empty when missing or not a string
    pub fn title(&self) -> &str {
        self.get("title").and_then(Value::as_str).unwrap_or_default()
    }

    /// Ingredients shaped like [`Ingredient`]; other elements are skipped here but kept in `fields`
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.list("ingredients")
    }

    /// Steps shaped like [`Instruction`]; other elements are skipped here but kept in `fields`
    pub fn instructions(&self) -> Vec<Instruction> {
        self.list("instructions")
    }

    fn list<T: serde::de::DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ingredient {
    #[serde(deserialize_with = "lenient::string")]
    pub item: String,
    #[serde(deserialize_with = "lenient::string")]
    pub amount: String,
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instruction {
    /// 1-based step number, 0 when absent
    #[serde(deserialize_with = "lenient::count")]
    pub step: usize,
    #[serde(deserialize_with = "lenient::string")]
    pub action: String,
    #[serde(deserialize_with = "lenient::string")]
    pub tip: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Best-effort video metadata. Empty when the lookup fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub channel: String,
    /// Duration in seconds
    pub duration: u64,
    pub thumbnail: String,
}

/// Diagnostic payload of a failed run
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionFailure {
    pub error: String,
    pub video_id: Option<String>,
    pub transcript_length: Option<usize>,
}

impl ExtractionFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            video_id: None,
            transcript_length: None,
        }
    }

    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    pub fn with_transcript_length(mut self, length: usize) -> Self {
        self.transcript_length = Some(length);
        self
    }
}

/// Outcome of one extraction run.
///
/// Serializes as `{"success": true, "recipe": {..}}` or
/// `{"success": false, "error": "..", ...diagnostics}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Success(Box<RecipeRecord>),
    Failure(ExtractionFailure),
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }

    pub fn recipe(&self) -> Option<&RecipeRecord> {
        match self {
            ExtractionResult::Success(recipe) => Some(&**recipe),
            ExtractionResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ExtractionFailure> {
        match self {
            ExtractionResult::Success(_) => None,
            ExtractionResult::Failure(failure) => Some(failure),
        }
    }
}

impl From<RecipeRecord> for ExtractionResult {
    fn from(recipe: RecipeRecord) -> Self {
        ExtractionResult::Success(Box::new(recipe))
    }
}

impl From<ExtractionFailure> for ExtractionResult {
    fn from(failure: ExtractionFailure) -> Self {
        ExtractionResult::Failure(failure)
    }
}

impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExtractionResult::Success(recipe) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("recipe", recipe)?;
                map.end()
            }
            ExtractionResult::Failure(failure) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &failure.error)?;
                if let Some(video_id) = &failure.video_id {
                    map.serialize_entry("video_id", video_id)?;
                }
                if let Some(length) = failure.transcript_length {
                    map.serialize_entry("transcript_length", &length)?;
                }
                map.end()
            }
        }
    }
}

/// Deserializers for the typed views and pipeline fields; they never reject a value
mod lenient {
    use super::*;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or_default())
    }
}
