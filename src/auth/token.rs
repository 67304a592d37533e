//! Access-token lifecycle.
//!
//! The held token moves through `Empty -> Valid -> Expired -> Refreshing ->
//! Valid`. Signing reads a snapshot under the read lock; a refresh holds the
//! write lock for the whole token call, so readers wait for the new token
//! instead of signing with a half-replaced one.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Client as ReqwestClient;
use secrecy::{ExposeSecret as _, SecretString};
use tokio::sync::RwLock;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::error::Error;
use crate::tuya::RefreshPolicy;
use crate::tuya::types::{RequestDescriptor, TokenGrant};

pub const TOKEN_PATH: &str = "/v1.0/token?grant_type=1";

/// Vendor-issued access token. Replaced as a whole, never mutated.
#[derive(Clone)]
pub struct Token {
    access_token: SecretString,
    refresh_token: SecretString,
    expires_at: i64,
    vendor_user_id: String,
}

impl Token {
    pub(crate) fn from_grant(grant: TokenGrant, now: i64) -> Self {
        Self {
            access_token: SecretString::from(grant.access_token),
            refresh_token: SecretString::from(grant.refresh_token),
            expires_at: now.saturating_add(grant.expire_time),
            vendor_user_id: grant.uid,
        }
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    #[must_use]
    pub fn refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    /// Absolute expiry, in Unix seconds.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    #[must_use]
    pub fn vendor_user_id(&self) -> &str {
        &self.vendor_user_id
    }

    #[must_use]
    pub fn is_stale_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now().timestamp())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("expires_at", &self.expires_at)
            .field("vendor_user_id", &self.vendor_user_id)
            .finish_non_exhaustive()
    }
}

fn is_fresh(token: Option<&Arc<Token>>) -> bool {
    token.is_some_and(|t| !t.is_stale())
}

/// Owns the current token and refreshes it through the vendor token endpoint.
#[derive(Debug)]
pub struct TokenManager {
    client: ReqwestClient,
    host: Url,
    credentials: Credentials,
    policy: RefreshPolicy,
    current: RwLock<Option<Arc<Token>>>,
}

impl TokenManager {
    #[must_use]
    pub fn new(
        client: ReqwestClient,
        host: Url,
        credentials: Credentials,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            client,
            host,
            credentials,
            policy,
            current: RwLock::new(None),
        }
    }

    /// Token to sign the next attempt with. `None` before the first refresh.
    pub async fn snapshot(&self) -> Option<Arc<Token>> {
        self.current.read().await.clone()
    }

    /// Refreshes the token unless the held one expires strictly in the future.
    ///
    /// On failure the previously held token, if any, stays in place.
    pub async fn ensure_valid(&self) -> Result<()> {
        if is_fresh(self.current.read().await.as_ref()) {
            return Ok(());
        }

        let mut current = self.current.write().await;
        if is_fresh(current.as_ref()) {
            return Ok(());
        }

        let token = self.fetch().await?;
        *current = Some(Arc::new(token));
        Ok(())
    }

    /// Replaces the token after the vendor rejected `rejected` as expired,
    /// regardless of the local expiry clock.
    pub async fn force_refresh(&self, rejected: Option<&Arc<Token>>) -> Result<()> {
        let mut current = self.current.write().await;

        let still_held = match (current.as_ref(), rejected) {
            (Some(held), Some(rejected)) => Arc::ptr_eq(held, rejected),
            (None, None) => true,
            _ => false,
        };
        if !self.policy.should_refresh(still_held) {
            #[cfg(feature = "tracing")]
            tracing::debug!("token already replaced by a concurrent refresh");
            return Ok(());
        }

        let token = self.fetch().await?;
        *current = Some(Arc::new(token));
        Ok(())
    }

    async fn fetch(&self) -> Result<Token> {
        self.request_grant().await.map_err(Error::token_refresh)
    }

    async fn request_grant(&self) -> Result<Token> {
        let descriptor = RequestDescriptor::get(TOKEN_PATH);
        let envelope = crate::request(
            &self.client,
            &self.host,
            &self.credentials,
            "",
            &descriptor,
        )
        .await?;

        if !envelope.success {
            #[cfg(feature = "tracing")]
            tracing::warn!(code = envelope.code, msg = %envelope.msg, "token request rejected");
            return Err(Error::upstream_rejection(envelope.code, envelope.msg));
        }

        let grant: TokenGrant = crate::decode("token grant", envelope.result)?;
        let token = Token::from_grant(grant, Utc::now().timestamp());

        #[cfg(feature = "tracing")]
        tracing::debug!(expires_at = token.expires_at, "access token refreshed");

        Ok(token)
    }
}
