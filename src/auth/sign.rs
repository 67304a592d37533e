use chrono::Utc;
use hmac::{Hmac, Mac as _};
use rand::TryRngCore as _;
use rand::rngs::OsRng;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret as _;
use sha2::{Digest as _, Sha256};

use crate::auth::Credentials;
use crate::error::Error;
use crate::tuya::types::RequestDescriptor;
use crate::{Result, Timestamp};

pub const SIGN_METHOD: &str = "HMAC-SHA256";

const NONCE_LEN: usize = 16;

/// Per-attempt request signature. Never reused across attempts.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub sign: String,
    pub timestamp: String,
    pub nonce: String,
    pub sign_method: &'static str,
}

impl Signature {
    /// Builds the header set the vendor expects on every signed call.
    pub fn headers(
        &self,
        credentials: &Credentials,
        access_token: &str,
        has_body: bool,
    ) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();

        map.insert("client_id", HeaderValue::from_str(credentials.access_id())?);
        map.insert("sign", HeaderValue::from_str(&self.sign)?);
        map.insert("t", HeaderValue::from_str(&self.timestamp)?);
        map.insert("sign_method", HeaderValue::from_static(self.sign_method));
        map.insert("access_token", HeaderValue::from_str(access_token)?);
        map.insert("nonce", HeaderValue::from_str(&self.nonce)?);
        if has_body {
            map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(map)
    }
}

/// Signs `request` with a fresh timestamp and nonce.
///
/// `access_token` is the empty string for the token endpoint itself.
pub fn sign(
    credentials: &Credentials,
    access_token: &str,
    request: &RequestDescriptor,
) -> Result<Signature> {
    let mut nonce = [0_u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| Error::signature(format!("failed to generate nonce: {e}")))?;

    sign_with(
        credentials,
        access_token,
        request,
        Utc::now().timestamp_millis(),
        &hex::encode(nonce),
    )
}

/// Deterministic signing with caller-provided timestamp and nonce.
pub fn sign_with(
    credentials: &Credentials,
    access_token: &str,
    request: &RequestDescriptor,
    timestamp: Timestamp,
    nonce: &str,
) -> Result<Signature> {
    let body_hash = hex::encode(Sha256::digest(request.body_bytes()));
    let string_to_sign = format!("{}\n{body_hash}\n\n{}", request.method, request.path);
    let timestamp = timestamp.to_string();
    let message = format!(
        "{}{access_token}{timestamp}{nonce}{string_to_sign}",
        credentials.access_id()
    );

    let mut mac = Hmac::<Sha256>::new_from_slice(
        credentials.access_secret().expose_secret().as_bytes(),
    )
    .map_err(|e| Error::signature(format!("invalid signing key: {e}")))?;
    mac.update(message.as_bytes());

    Ok(Signature {
        sign: hex::encode_upper(mac.finalize().into_bytes()),
        timestamp,
        nonce: nonce.to_owned(),
        sign_method: SIGN_METHOD,
    })
}
