//! NiFi REST implementation of [`AccessApi`] and [`FlowApi`]
//!
//! Every call except the token exchange carries the session's
//! `Authorization` value. Non-success responses are surfaced with their
//! status and raw body; nothing is retried.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, instrument};

use nifi_align_core::{
    AccessApi, AlignError, AlignResult, FlowApi, FlowSnapshot, GroupId, GroupRef, Position, Session,
};

use crate::dto::{ProcessGroupFlowEntity, ProcessGroupPositionUpdate};

/// Configuration for the NiFi client
#[derive(Debug, Clone)]
pub struct NifiClientConfig {
    /// Base URL of the NiFi instance, e.g. `https://nifi.example.com:8443`
    pub base_url: Url,
    /// Timeout in seconds for HTTP requests
    pub timeout_secs: u64,
    /// Accept self-signed or otherwise invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl NifiClientConfig {
    /// Configuration with default timeout and strict TLS
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

/// Client for the NiFi REST API
#[derive(Debug, Clone)]
pub struct NifiClient {
    config: NifiClientConfig,
    client: Client,
}

impl NifiClient {
    /// Create a client for the configured instance
    pub fn new(config: NifiClientConfig) -> AlignResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| AlignError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// `{base}/nifi-api/{segments..}` with every segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> AlignResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(AlignError::Configuration(format!(
                "Invalid path segment ({}) in request.",
                bad
            )));
        }

        let mut url = self.config.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                AlignError::Configuration(format!("Invalid NiFi URL ({}) provided.", self.config.base_url))
            })?
            .pop_if_empty()
            .push("nifi-api")
            .extend(segments);
        Ok(url)
    }

    /// Maps a transport failure to an AlignError
    fn map_http_error(error: reqwest::Error) -> AlignError {
        if error.is_timeout() {
            AlignError::Transport(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            AlignError::Transport(format!("Connection error: {}", error))
        } else {
            AlignError::Transport(format!("HTTP error: {}", error))
        }
    }

    /// Turns a non-success response into a remote error carrying the raw body
    async fn remote_error(response: Response) -> AlignError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP error: {}", status));
        AlignError::remote(status.as_u16(), body)
    }
}

#[async_trait]
impl AccessApi for NifiClient {
    #[instrument(skip(self, password), fields(username = %username))]
    async fn request_token(&self, username: &str, password: &str) -> AlignResult<String> {
        let url = self.endpoint(&["access", "token"])?;
        debug!("Requesting access token");

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "text/plain")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(Self::map_http_error)?;

        match response.status() {
            status if status.is_success() => {
                let token = response.text().await.map_err(Self::map_http_error)?;
                let token = token.trim();
                if token.is_empty() {
                    return Err(AlignError::Authentication(
                        "Server returned an empty access token".to_string(),
                    ));
                }
                Ok(token.to_string())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(AlignError::Authentication("Unauthorized!".to_string()))
            }
            _ => Err(Self::remote_error(response).await),
        }
    }

    #[instrument(skip(self, session))]
    async fn logout(&self, session: &Session) -> AlignResult<()> {
        let url = self.endpoint(&["access", "logout"])?;
        debug!("Logging out");

        let response = self
            .client
            .delete(url)
            .header(AUTHORIZATION, session.authorization_value())
            .send()
            .await
            .map_err(Self::map_http_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        }
    }
}

#[async_trait]
impl FlowApi for NifiClient {
    #[instrument(skip(self, session), fields(group_id = %group_id))]
    async fn fetch_snapshot(&self, session: &Session, group_id: &GroupId) -> AlignResult<FlowSnapshot> {
        let url = self.endpoint(&["flow", "process-groups", group_id.as_str()])?;
        debug!("Fetching process group flow");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, session.authorization_value())
            .send()
            .await
            .map_err(Self::map_http_error)?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }

        let body = response.bytes().await.map_err(Self::map_http_error)?;
        let entity: ProcessGroupFlowEntity = serde_json::from_slice(&body)?;
        let snapshot = FlowSnapshot::from(entity);
        debug!(
            resolved = %snapshot.group_id,
            children = snapshot.child_groups.len(),
            elements = snapshot.contents.total(),
            last_refreshed = ?snapshot.last_refreshed,
            "Fetched process group flow"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self, session, group), fields(group_id = %group.id, version = group.revision.version))]
    async fn update_position(
        &self,
        session: &Session,
        group: &GroupRef,
        position: Position,
    ) -> AlignResult<()> {
        let url = self.endpoint(&["process-groups", group.id.as_str()])?;
        let request = ProcessGroupPositionUpdate::new(group, position);

        let response = self
            .client
            .put(url)
            .header(AUTHORIZATION, session.authorization_value())
            .json(&request)
            .send()
            .await
            .map_err(Self::map_http_error)?;

        if response.status().is_success() {
            debug!(x = position.x, y = position.y, "Process group moved");
            Ok(())
        } else {
            Err(Self::remote_error(response).await)
        }
    }
}
