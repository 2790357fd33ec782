//! Identity verification client

use async_trait::async_trait;
use tracing::debug;
use vitrine_api_types::IdentityResponse;
use vitrine_config::SessionConfig;

use crate::error::{SessionError, SessionResult};
use crate::token::AuthToken;

/// Seam between the resolver and the identity service.
///
/// Production uses [`HttpIdentityVerifier`]; tests substitute fakes.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token and return the raw response envelope.
    ///
    /// A non-200 envelope is a successful call carrying a rejection; only
    /// transport and decoding problems are errors.
    async fn verify(&self, token: &AuthToken) -> SessionResult<IdentityResponse>;
}

/// `reqwest`-backed verifier hitting the configured identity endpoint
#[derive(Debug, Clone)]
pub struct HttpIdentityVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpIdentityVerifier {
    /// Build a verifier from session configuration
    pub fn from_config(config: &SessionConfig) -> SessionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SessionError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            verify_url: config.verify_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &AuthToken) -> SessionResult<IdentityResponse> {
        debug!(url = %self.verify_url, "calling identity verification endpoint");

        let response = self
            .client
            .post(&self.verify_url)
            .bearer_auth(token.expose())
            .send()
            .await?;

        let envelope = response
            .json::<IdentityResponse>()
            .await
            .map_err(|e| SessionError::invalid_payload(e.to_string()))?;

        debug!(code = envelope.code, "identity verification answered");
        Ok(envelope)
    }
}
