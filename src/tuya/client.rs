use std::sync::Arc;

use reqwest::Client as ReqwestClient;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::auth::{Credentials, Token, TokenManager};
use crate::error::Error;
use crate::tuya::TuyaConfig;
use crate::tuya::types::RequestDescriptor;

/// Vendor code meaning the access token must be refreshed before retrying.
pub const TOKEN_EXPIRED_CODE: i64 = 1010;

/// Position in the two-attempt call sequence. `AfterRefresh` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    Initial,
    AfterRefresh,
}

/// Signed client for the vendor's OpenAPI.
///
/// Every call is signed with the token held at send time and retried at
/// most once, after a forced refresh, when the vendor reports the token as
/// expired.
#[derive(Debug)]
pub struct TuyaClient {
    host: Url,
    credentials: Credentials,
    client: ReqwestClient,
    tokens: TokenManager,
}

impl TuyaClient {
    /// Creates a client and fetches the initial access token.
    pub async fn bootstrap(config: TuyaConfig) -> Result<Self> {
        let client = ReqwestClient::builder().timeout(config.timeout).build()?;
        Self::bootstrap_with_client(config, client).await
    }

    /// Creates a client on top of a caller-supplied HTTP client.
    ///
    /// The client's own timeout applies; `config.timeout` is ignored.
    pub async fn bootstrap_with_client(config: TuyaConfig, client: ReqwestClient) -> Result<Self> {
        let tokens = TokenManager::new(
            client.clone(),
            config.host.clone(),
            config.credentials.clone(),
            config.refresh_policy,
        );
        tokens.ensure_valid().await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(host = %config.host, "vendor client ready");

        Ok(Self {
            host: config.host,
            credentials: config.credentials,
            client,
            tokens,
        })
    }

    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Current token snapshot.
    pub async fn token(&self) -> Option<Arc<Token>> {
        self.tokens.snapshot().await
    }

    /// Executes one call and returns the envelope's `result`.
    ///
    /// Transport faults fail immediately. A rejection with
    /// [`TOKEN_EXPIRED_CODE`] on the first attempt forces a refresh and
    /// retries once; any other rejection is returned as [`Kind::Upstream`].
    ///
    /// [`Kind::Upstream`]: crate::error::Kind::Upstream
    pub async fn execute(&self, method: Method, path: &str, body: Option<String>) -> Result<Value> {
        let descriptor = RequestDescriptor::new(method, path, body);
        let mut attempt = Attempt::Initial;

        loop {
            let token = self.tokens.snapshot().await;
            let access_token = token.as_deref().map_or("", Token::access_token);

            let envelope = crate::request(
                &self.client,
                &self.host,
                &self.credentials,
                access_token,
                &descriptor,
            )
            .await?;

            if envelope.success {
                return Ok(envelope.result);
            }

            match attempt {
                Attempt::Initial if envelope.code == TOKEN_EXPIRED_CODE => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(path = %descriptor.path, "token rejected as expired, refreshing");

                    self.tokens.force_refresh(token.as_ref()).await?;
                    attempt = Attempt::AfterRefresh;
                }
                Attempt::Initial | Attempt::AfterRefresh => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        path = %descriptor.path,
                        code = envelope.code,
                        msg = %envelope.msg,
                        ?attempt,
                        "vendor rejected request"
                    );

                    return Err(Error::upstream_rejection(envelope.code, envelope.msg));
                }
            }
        }
    }
}
