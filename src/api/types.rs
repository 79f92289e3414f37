use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An answer returned by the study-buddy endpoint.
///
/// The backend is loose about shape: it may return a bare string, a
/// structured object with optional semantic fields, or (in degraded cases)
/// any other JSON value. The variants are tried in order; `Other` is the
/// catch-all so deserialization can never fail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerPayload {
    /// A plain answer string.
    Text(String),
    /// The structured answer object.
    Structured(StructuredAnswer),
    /// Anything else (arrays, numbers, null, objects with mistyped fields).
    Other(Value),
}

/// The structured study-buddy answer. Every field is optional; unknown
/// fields are retained so a structural dump can reproduce the full payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredAnswer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_takeaways: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AnswerPayload {
    /// Wrap a failure message so it renders as a titled `Error:` block
    /// under the same convention as normal answers.
    pub fn error(message: impl AsRef<str>) -> Self {
        AnswerPayload::Text(format!("Error:\n{}", message.as_ref()))
    }

    pub fn text(content: impl Into<String>) -> Self {
        AnswerPayload::Text(content.into())
    }
}

/// Response body of `POST /hints`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintsResponse {
    pub hints: Vec<String>,
}

/// Response body of `POST /quiz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
}

/// Application-level failure body (`{ "error": "..." }`).
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
