use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use mindful_core::model::{ProgramId, SessionId};

use super::{CompletionInfo, ProgramApi, ProgramRecord};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// `ProgramApi` over the REST backend.
#[derive(Clone)]
pub struct HttpProgramApi {
    client: Client,
    config: ApiConfig,
}

impl HttpProgramApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies, TLS roots).
    #[must_use]
    pub fn with_client(config: ApiConfig, client: Client) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.inspect_err(|err| {
            warn!(%url, error = %err, "request failed");
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_owned()));
        }
        if !status.is_success() {
            warn!(%url, %status, "backend returned an error status");
            return Err(ApiError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ProgramApi for HttpProgramApi {
    async fn list_programs(&self) -> Result<Vec<ProgramRecord>, ApiError> {
        self.get_json("programs").await
    }

    async fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, ApiError> {
        self.get_json(&format!("programs/{id}")).await
    }

    async fn get_completion_info(
        &self,
        session_id: SessionId,
    ) -> Result<CompletionInfo, ApiError> {
        match self
            .get_json(&format!("sessions/{session_id}/completion-info"))
            .await
        {
            // No completion record yet means the participant has not done the session.
            Err(ApiError::NotFound(_)) => {
                debug!(session = %session_id, "no completion info, treating as not completed");
                Ok(CompletionInfo {
                    session_id,
                    completed: false,
                    completed_at: None,
                })
            }
            other => other,
        }
    }
}
