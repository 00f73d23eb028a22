//! randomuser.me profile provider

use crate::{
    constants::{RANDOMUSER_API_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::ProviderError,
    provider::ProfileProvider,
    types::{RandomUserResponse, UserProfile},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Profile provider backed by randomuser.me
pub struct RandomUserProvider {
    client: Client,
    base_url: String,
}

impl RandomUserProvider {
    /// Creates a new provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(RANDOMUSER_API_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Creates a provider against a compatible base URL
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    fn single_user_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}?results=1", self.base_url)
        } else {
            format!("{}/?results=1", self.base_url)
        }
    }
}

/// Picks the single profile out of the envelope
fn first_profile(response: RandomUserResponse) -> Result<UserProfile, ProviderError> {
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::invalid_response("randomuser returned no results"))
}

#[async_trait]
impl ProfileProvider for RandomUserProvider {
    async fn fetch_profile(&self) -> Result<UserProfile, ProviderError> {
        let url = self.single_user_url();
        tracing::debug!(url = %url, "Fetching user profile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::NetworkError)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(ProviderError::api(format!("HTTP {}", response.status())));
        }

        let envelope: RandomUserResponse = response.json().await.map_err(|e| {
            ProviderError::invalid_response(format!("Failed to parse profile: {}", e))
        })?;

        first_profile(envelope)
    }

    fn provider_name(&self) -> &'static str {
        "randomuser"
    }
}
