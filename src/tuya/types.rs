use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

/// One outbound call: what gets signed and what gets sent.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the host, including any query string.
    pub path: String,
    pub body: Option<String>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new<P: Into<String>>(method: Method, path: P, body: Option<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.filter(|b| !b.is_empty()),
        }
    }

    #[must_use]
    pub fn get<P: Into<String>>(path: P) -> Self {
        Self::new(Method::GET, path, None)
    }

    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        self.body.as_deref().unwrap_or_default().as_bytes()
    }
}

/// The vendor's universal response wrapper.
///
/// `code` and `msg` are only populated on failure; `result` is only
/// meaningful when `success` is true.
#[non_exhaustive]
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub t: i64,
    #[serde(default)]
    pub tid: String,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

/// `result` of the token endpoint. `expire_time` is relative, in seconds.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub expire_time: i64,
    #[serde(default)]
    pub uid: String,
}
