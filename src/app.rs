//! Command execution
//!
//! A run validates its configuration, opens a session, aligns, and always
//! closes the session again before reporting the outcome.

use nifi_align_client::NifiClient;
use nifi_align_core::{AccessApi, AlignmentEngine, AlignmentReport, FlowApi, SessionManager};
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::logging::LogExt;

/// Run a parsed command line against the configured NiFi instance
pub async fn run(cli: Cli) -> AppResult<AlignmentReport> {
    let config = AppConfig::from_cli(&cli)
        .map_err(AppError::Configuration)
        .log_err("Invalid configuration")?;
    let client = NifiClient::new(config.client_config())
        .map_err(AppError::Configuration)
        .log_err("Unable to create NiFi client")?;

    align(client.clone(), client, &config).await
}

/// Authenticate, align and release the session
pub async fn align<A, F>(access: A, flow: F, config: &AppConfig) -> AppResult<AlignmentReport>
where
    A: AccessApi,
    F: FlowApi,
{
    if config.request.max_depth.is_zero() {
        info!("Depth is 0, nothing to align.");
        return Ok(AlignmentReport::default());
    }

    let mut sessions = SessionManager::new(access);
    let engine = AlignmentEngine::new(flow);

    let outcome = match sessions
        .authenticate(&config.credentials.username, config.credentials.password())
        .await
    {
        Ok(session) => engine
            .align(session, &config.request)
            .await
            .map_err(AppError::Alignment),
        Err(e) => Err(AppError::Authentication(e)),
    };

    if let Err(e) = &outcome {
        error!("{}", e);
    }

    sessions.release().await;
    outcome
}
