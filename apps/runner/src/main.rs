//! Runs one datasource permission reconciliation against Grafana.

#![forbid(unsafe_code)]

mod desired_file;
mod runner_config;

use std::sync::Arc;
use std::time::Duration;

use dsperm_application::DatasourcePermissionService;
use dsperm_core::AppError;
use dsperm_domain::DatasourcePermissionState;
use dsperm_infrastructure::GrafanaDatasourcePermissionClient;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::desired_file::load_desired;
use crate::runner_config::{ReconcileAction, RunnerConfig};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RunnerConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let service = DatasourcePermissionService::new(Arc::new(
        GrafanaDatasourcePermissionClient::new(http_client, config.grafana.clone()),
    ));

    info!(
        grafana_url = %config.grafana.base_url(),
        datasource_id = %config.datasource_id,
        action = ?config.action,
        "dsperm-runner started"
    );

    let mut state = DatasourcePermissionState::new(config.datasource_id);
    let output = match &config.action {
        ReconcileAction::Apply { permissions_file } => {
            let desired = load_desired(permissions_file)?;
            let summary = service.create(&mut state, &desired).await?;
            json!({
                "added": summary.added,
                "removed": summary.removed,
                "state": state,
            })
        }
        ReconcileAction::Read => {
            state.mark_tracked();
            service.read(&mut state).await?;
            json!({ "state": state })
        }
        ReconcileAction::Delete => {
            state.mark_tracked();
            let removed = service.delete(&mut state).await?;
            json!({
                "removed": removed,
                "state": state,
            })
        }
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|error| AppError::Internal(format!("failed to render state: {error}")))?;
    println!("{rendered}");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
