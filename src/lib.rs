//! Signed, token-managed client for a cloud IoT platform.
//!
//! The crate covers the outbound half of a smart-device gateway:
//! - [`auth`] signs every request and keeps the access token fresh
//! - [`tuya`] executes calls with a single retry after token expiry and
//!   exposes the vendor endpoints
//! - [`device`] lists a user's devices, enriches multi-gang devices with their
//!   channel names concurrently, and forwards commands to owned devices

pub mod auth;
pub mod device;
pub mod error;
pub mod tuya;

use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::tuya::types::{Envelope, RequestDescriptor};

pub type Result<T> = std::result::Result<T, Error>;

/// Milliseconds since the Unix epoch, as sent in the `t` header.
pub type Timestamp = i64;

/// Signs `descriptor` against `access_token`, sends it, and parses the vendor
/// envelope. Anything that prevents reading an envelope is a transport error.
pub(crate) async fn request(
    client: &ReqwestClient,
    host: &Url,
    credentials: &Credentials,
    access_token: &str,
    descriptor: &RequestDescriptor,
) -> Result<Envelope> {
    let signature = auth::sign::sign(credentials, access_token, descriptor)?;
    let headers = signature.headers(credentials, access_token, descriptor.body.is_some())?;

    let url = host
        .join(&descriptor.path)
        .map_err(|e| Error::with_source(error::Kind::Transport, e))?;

    let mut builder = client.request(descriptor.method.clone(), url).headers(headers);
    if let Some(body) = &descriptor.body {
        builder = builder.body(body.clone());
    }

    let response = builder.send().await?;
    let status_code = response.status();
    let text = response.text().await?;

    if !status_code.is_success() {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            status = %status_code,
            method = %descriptor.method,
            path = %descriptor.path,
            "vendor request failed before envelope"
        );
        return Err(Error::status(
            status_code,
            descriptor.method.clone(),
            descriptor.path.clone(),
            text,
        ));
    }

    serde_json::from_str::<Envelope>(&text).map_err(|e| {
        Error::with_source(
            error::Kind::Transport,
            error::Decode {
                target: "response envelope",
                reason: e.to_string(),
            },
        )
    })
}

/// Decodes a successful envelope's `result` into `T`.
pub(crate) fn decode<T: DeserializeOwned>(target: &'static str, value: Value) -> Result<T> {
    #[cfg(feature = "tracing")]
    {
        serde_path_to_error::deserialize::<_, T>(value).map_err(|e| {
            let path = e.path().to_string();
            tracing::warn!(%path, shape = target, error = %e.inner(), "unable to decode vendor result");
            Error::decode(target, format!("{} at {path}", e.inner()))
        })
    }

    #[cfg(not(feature = "tracing"))]
    {
        serde_json::from_value::<T>(value).map_err(|e| Error::decode(target, e.to_string()))
    }
}
