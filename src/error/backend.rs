use serde::Deserialize;
use serde_json::Value;

/// Error payload returned by the hosted backend.
///
/// The table API (`code`, `message`, `details`, `hint`), the auth API
/// (`error`, `error_description`, `msg`, `error_code`) and the storage API
/// (`statusCode`, `error`, `message`) all land in the same struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl BackendErrorBody {
    /// Parses an error body, keeping a preview of the raw text when it is not JSON.
    pub fn parse(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_else(|_| {
            let text = String::from_utf8_lossy(raw);
            Self {
                message: Some(super::preview(text.trim())).filter(|m| !m.is_empty()),
                ..Self::default()
            }
        })
    }

    pub fn code(&self) -> Option<String> {
        self.error_code.clone().or_else(|| match &self.code {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn message(&self) -> &str {
        [
            &self.message,
            &self.msg,
            &self.error_description,
            &self.error,
        ]
        .into_iter()
        .find_map(|m| m.as_deref().filter(|m| !m.is_empty()))
        .unwrap_or("no error message")
    }
}
