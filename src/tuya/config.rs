use std::env;
use std::time::Duration;

use bon::Builder;
use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;
use crate::tuya::RefreshPolicy;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ACCESS_ID_VAR: &str = "TUYA_ACCESS_ID";
pub const ACCESS_SECRET_VAR: &str = "TUYA_ACCESS_SECRET";
pub const BASE_URL_VAR: &str = "TUYA_BASE_URL";

/// Raw credential values typically read from process configuration.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RawCredentials {
    pub access_id: String,
    pub access_secret: SecretString,
}

impl RawCredentials {
    #[must_use]
    pub fn new<S: Into<String>>(access_id: S, access_secret: SecretString) -> Self {
        Self {
            access_id: access_id.into(),
            access_secret,
        }
    }
}

/// Client bootstrap configuration.
#[non_exhaustive]
#[derive(Clone, Debug, Builder)]
pub struct TuyaConfig {
    pub host: Url,
    pub credentials: Credentials,
    /// Applied to every outbound call, token requests included.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    #[builder(default)]
    pub refresh_policy: RefreshPolicy,
}

impl TuyaConfig {
    pub fn from_raw(host: &str, raw: RawCredentials) -> Result<Self> {
        let host = Url::parse(host)?;
        if !matches!(host.scheme(), "http" | "https") {
            return Err(Error::validation(format!(
                "base url must be http(s), got {}",
                host.scheme()
            )));
        }
        let credentials = Credentials::new(raw.access_id, raw.access_secret)?;

        Ok(Self::builder().host(host).credentials(credentials).build())
    }

    /// Reads `TUYA_ACCESS_ID`, `TUYA_ACCESS_SECRET` and `TUYA_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let access_id = required_var(ACCESS_ID_VAR)?;
        let access_secret = SecretString::from(required_var(ACCESS_SECRET_VAR)?);
        let host = required_var(BASE_URL_VAR)?;

        Self::from_raw(&host, RawCredentials::new(access_id, access_secret))
    }
}

fn required_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::validation(format!("{name} must be set"))),
    }
}
