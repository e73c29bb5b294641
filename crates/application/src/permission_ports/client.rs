use async_trait::async_trait;

use dsperm_core::AppResult;
use dsperm_domain::DatasourceId;

use super::records::{AddPermissionPayload, DatasourcePermissionList};

/// Remote API port for data source permission management.
///
/// Implementations report a missing data source as `AppError::NotFound` and
/// must not retry failed calls.
#[async_trait]
pub trait DatasourcePermissionClient: Send + Sync {
    /// Attaches one grant to a data source.
    async fn add_permission(
        &self,
        datasource_id: DatasourceId,
        payload: AddPermissionPayload,
    ) -> AppResult<()>;

    /// Lists every grant attached to a data source, in server order.
    async fn list_permissions(
        &self,
        datasource_id: DatasourceId,
    ) -> AppResult<DatasourcePermissionList>;

    /// Removes a grant from a data source by permission code.
    async fn remove_permission(
        &self,
        datasource_id: DatasourceId,
        permission_code: i64,
    ) -> AppResult<()>;
}
