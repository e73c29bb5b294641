use std::collections::HashMap;

use async_trait::async_trait;
use dsperm_application::{
    AddPermissionPayload, DatasourcePermissionClient, DatasourcePermissionList,
    RemotePermissionRecord,
};
use dsperm_core::{AppError, AppResult};
use dsperm_domain::DatasourceId;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct InMemoryPermissionState {
    datasources: HashMap<DatasourceId, Vec<RemotePermissionRecord>>,
    next_record_id: i64,
}

/// In-memory simulation of the remote permission API.
///
/// Mirrors Grafana: duplicate grants conflict and removal takes the first
/// record carrying the permission code.
#[derive(Debug, Default)]
pub struct InMemoryDatasourcePermissionClient {
    state: RwLock<InMemoryPermissionState>,
}

impl InMemoryDatasourcePermissionClient {
    /// Creates a client with no data sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a data source with no permissions.
    pub async fn register_datasource(&self, datasource_id: DatasourceId) {
        self.state
            .write()
            .await
            .datasources
            .entry(datasource_id)
            .or_default();
    }

    /// Deletes a data source and every permission attached to it.
    pub async fn remove_datasource(&self, datasource_id: DatasourceId) -> bool {
        self.state
            .write()
            .await
            .datasources
            .remove(&datasource_id)
            .is_some()
    }
}

fn datasource_not_found(datasource_id: DatasourceId) -> AppError {
    AppError::NotFound(format!("datasource '{datasource_id}' does not exist"))
}

#[async_trait]
impl DatasourcePermissionClient for InMemoryDatasourcePermissionClient {
    async fn add_permission(
        &self,
        datasource_id: DatasourceId,
        payload: AddPermissionPayload,
    ) -> AppResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let records = state
            .datasources
            .get_mut(&datasource_id)
            .ok_or_else(|| datasource_not_found(datasource_id))?;

        if records.iter().any(|record| record.key() == payload.key()) {
            return Err(AppError::Conflict(format!(
                "permission {} for team '{}' user '{}' already exists on datasource '{datasource_id}'",
                payload.permission_code, payload.team_id, payload.user_id
            )));
        }

        state.next_record_id += 1;
        records.push(RemotePermissionRecord {
            id: Some(state.next_record_id),
            team_id: payload.team_id,
            user_id: payload.user_id,
            permission_code: payload.permission_code,
        });

        Ok(())
    }

    async fn list_permissions(
        &self,
        datasource_id: DatasourceId,
    ) -> AppResult<DatasourcePermissionList> {
        let state = self.state.read().await;
        let permissions = state
            .datasources
            .get(&datasource_id)
            .cloned()
            .ok_or_else(|| datasource_not_found(datasource_id))?;

        Ok(DatasourcePermissionList { permissions })
    }

    async fn remove_permission(
        &self,
        datasource_id: DatasourceId,
        permission_code: i64,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let records = state
            .datasources
            .get_mut(&datasource_id)
            .ok_or_else(|| datasource_not_found(datasource_id))?;

        let position = records
            .iter()
            .position(|record| record.permission_code == permission_code)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "permission {permission_code} is not attached to datasource '{datasource_id}'"
                ))
            })?;
        records.remove(position);

        Ok(())
    }
}
