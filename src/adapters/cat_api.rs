//! Breed lookups against TheCatAPI (`GET {base_url}/breeds`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BreedApiConfig;
use crate::error::{AgencyError, Result};
use crate::services::BreedValidator;

#[derive(Debug, Deserialize)]
struct Breed {
    name: String,
}

#[derive(Clone)]
pub struct CatApiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| {
            AgencyError::Internal(format!("invalid breed API base URL {base_url}: {e}"))
        })?;

        let http = Client::builder()
            .user_agent("cat-agency/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| AgencyError::Internal(format!("failed to build breed API client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn from_config(config: &BreedApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.api_key.clone(), config.timeout())
    }

    async fn fetch_breeds(&self) -> Result<Vec<Breed>> {
        let url = format!("{}/breeds", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| unavailable("request failed", e))?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "breed API returned an error status");
            return Err(AgencyError::ServiceUnavailable(format!(
                "breed API responded with {status}"
            )));
        }

        response
            .json::<Vec<Breed>>()
            .await
            .map_err(|e| unavailable("malformed breed list", e))
    }
}

fn unavailable(context: &str, err: reqwest::Error) -> AgencyError {
    warn!(error = %err, "breed API {context}");
    AgencyError::ServiceUnavailable(format!("breed API {context}: {err}"))
}

fn contains_breed(breeds: &[Breed], breed: &str) -> bool {
    let wanted = breed.trim();
    breeds
        .iter()
        .any(|b| b.name.trim().eq_ignore_ascii_case(wanted))
}

#[async_trait]
impl BreedValidator for CatApiClient {
    async fn is_known_breed(&self, breed: &str) -> Result<bool> {
        let breeds = self.fetch_breeds().await?;
        debug!(count = breeds.len(), "fetched breed list");
        Ok(contains_breed(&breeds, breed))
    }
}
