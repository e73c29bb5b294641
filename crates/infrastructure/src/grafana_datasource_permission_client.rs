use async_trait::async_trait;
use dsperm_application::{
    AddPermissionPayload, DatasourcePermissionClient, DatasourcePermissionList,
};
use dsperm_core::{AppError, AppResult};
use dsperm_domain::DatasourceId;
use reqwest::StatusCode;
use tracing::debug;

mod config;
mod dto;

pub use config::{GrafanaClientConfig, GrafanaCredentials};

use dto::{AddDatasourcePermissionRequest, DatasourcePermissionsResponse, GrafanaErrorResponse};

/// Grafana HTTP API implementation of the data source permission port.
///
/// Failed calls are returned as-is; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct GrafanaDatasourcePermissionClient {
    http_client: reqwest::Client,
    config: GrafanaClientConfig,
}

impl GrafanaDatasourcePermissionClient {
    /// Creates a client over a preconfigured HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: GrafanaClientConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn permissions_endpoint(&self, datasource_id: DatasourceId) -> String {
        format!(
            "{}/api/datasources/{datasource_id}/permissions",
            self.config.base_url()
        )
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = match self.config.credentials() {
            GrafanaCredentials::Token(token) => builder.bearer_auth(token),
            GrafanaCredentials::Basic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        };

        match self.config.org_id() {
            Some(org_id) => builder.header("X-Grafana-Org-Id", org_id.to_string()),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> AppResult<reqwest::Response> {
        let response = self.authorize(builder).send().await.map_err(|error| {
            AppError::Internal(format!("failed to call grafana to {operation}: {error}"))
        })?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "grafana responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        Err(status_error(status, body.as_str()))
    }
}

/// Maps a non-success Grafana response to an error category.
fn status_error(status: StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<GrafanaErrorResponse>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_owned());
    let detail = format!("status: {}, body: {message}", status.as_u16());

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(detail),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(detail),
        StatusCode::FORBIDDEN => AppError::Forbidden(detail),
        StatusCode::CONFLICT => AppError::Conflict(detail),
        _ => AppError::Internal(detail),
    }
}

#[async_trait]
impl DatasourcePermissionClient for GrafanaDatasourcePermissionClient {
    async fn add_permission(
        &self,
        datasource_id: DatasourceId,
        payload: AddPermissionPayload,
    ) -> AppResult<()> {
        let request = self
            .http_client
            .post(self.permissions_endpoint(datasource_id))
            .json(&AddDatasourcePermissionRequest::from(payload));

        self.send(request, "add datasource permission").await?;
        Ok(())
    }

    async fn list_permissions(
        &self,
        datasource_id: DatasourceId,
    ) -> AppResult<DatasourcePermissionList> {
        let request = self.http_client.get(self.permissions_endpoint(datasource_id));
        let response = self.send(request, "list datasource permissions").await?;

        let body = response
            .json::<DatasourcePermissionsResponse>()
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to parse grafana datasource permissions response: {error}"
                ))
            })?;

        Ok(body.into())
    }

    async fn remove_permission(
        &self,
        datasource_id: DatasourceId,
        permission_code: i64,
    ) -> AppResult<()> {
        let request = self.http_client.delete(format!(
            "{}/{permission_code}",
            self.permissions_endpoint(datasource_id)
        ));

        self.send(request, "remove datasource permission").await?;
        Ok(())
    }
}
