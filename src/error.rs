use std::error::Error as StdError;
use std::fmt;

use reqwest::{Method, StatusCode};

/// Broad category of an [`Error`], used by callers to pick a response.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Kind {
    /// Nonce generation, MAC setup or header encoding failed for a single attempt.
    Signature,
    /// Connection failure, timeout, unusable request URL, HTTP status >= 400, or a
    /// body that is not an envelope.
    Transport,
    /// The vendor answered with `success = false`.
    Upstream,
    /// The envelope was fine but `result` did not have the expected shape.
    Decode,
    /// The access token could not be obtained or replaced.
    TokenRefresh,
    /// Invalid input or configuration supplied by the caller.
    Validation,
    /// The caller identity has no linked vendor account.
    AccountNotLinked,
    /// The target device is not among the caller's devices.
    DeviceNotOwned,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let source = self.source.as_deref()?;
        source.downcast_ref::<E>()
    }

    /// Returns the vendor rejection carried by this error, looking through a
    /// [`Kind::TokenRefresh`] wrapper.
    #[must_use]
    pub fn upstream(&self) -> Option<&Upstream> {
        self.downcast_ref::<Upstream>()
            .or_else(|| self.downcast_ref::<Error>()?.upstream())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn upstream_rejection<S: Into<String>>(code: i64, message: S) -> Self {
        Upstream {
            code,
            message: message.into(),
        }
        .into()
    }

    pub fn status<S: Into<String>>(
        status_code: StatusCode,
        method: Method,
        path: String,
        message: S,
    ) -> Self {
        Status {
            status_code,
            method,
            path,
            message: message.into(),
        }
        .into()
    }

    pub fn decode<S: Into<String>>(target: &'static str, reason: S) -> Self {
        Decode {
            target,
            reason: reason.into(),
        }
        .into()
    }

    pub fn signature<S: Into<String>>(reason: S) -> Self {
        Self::with_source(
            Kind::Signature,
            Message {
                text: reason.into(),
            },
        )
    }

    /// Wraps a failure that happened while obtaining a fresh token.
    #[must_use]
    pub fn token_refresh(cause: Error) -> Self {
        if cause.kind == Kind::TokenRefresh {
            return cause;
        }
        Self::with_source(Kind::TokenRefresh, cause)
    }

    #[must_use]
    pub fn account_not_linked(user_id: &str) -> Self {
        Self::with_source(
            Kind::AccountNotLinked,
            Message {
                text: format!("no vendor account is linked to user {user_id}"),
            },
        )
    }

    #[must_use]
    pub fn device_not_owned(device_id: &str) -> Self {
        Self::with_source(
            Kind::DeviceNotOwned,
            Message {
                text: format!("device {device_id} does not belong to user"),
            },
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Vendor rejection, surfaced verbatim.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upstream {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vendor error {}: {}", self.code, self.message)
    }
}

impl StdError for Upstream {}

impl From<Upstream> for Error {
    fn from(e: Upstream) -> Self {
        Error::with_source(Kind::Upstream, e)
    }
}

/// Non-success HTTP status returned before an envelope could be read.
#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
    pub message: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error({}) making {} call to {} with {}",
            self.status_code, self.method, self.path, self.message
        )
    }
}

impl StdError for Status {}

impl From<Status> for Error {
    fn from(e: Status) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Decode {
    pub target: &'static str,
    pub reason: String,
}

impl fmt::Display for Decode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to decode {}: {}", self.target, self.reason)
    }
}

impl StdError for Decode {}

impl From<Decode> for Error {
    fn from(e: Decode) -> Self {
        Error::with_source(Kind::Decode, e)
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

impl From<Validation> for Error {
    fn from(e: Validation) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

#[derive(Debug)]
struct Message {
    text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl StdError for Message {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Signature, e)
    }
}
