use super::reconcile::forget_vanished;
use super::*;

impl DatasourcePermissionService {
    /// Starts managing permissions for a data source.
    pub async fn create(
        &self,
        state: &mut DatasourcePermissionState,
        desired: &DesiredPermissionSet,
    ) -> AppResult<ReconcileSummary> {
        self.apply_desired(state, desired).await
    }

    /// Refreshes state from the server.
    ///
    /// A vanished data source clears the tracking identifier and succeeds.
    pub async fn read(&self, state: &mut DatasourcePermissionState) -> AppResult<()> {
        match self.fetch_permissions(state.datasource_id).await {
            Ok(records) => {
                state.permissions = records
                    .iter()
                    .map(RemotePermissionRecord::to_grant)
                    .collect();
                Ok(())
            }
            Err(error) if error.is_not_found() => {
                forget_vanished(state);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    /// Converges a managed data source to a changed declared set.
    pub async fn update(
        &self,
        state: &mut DatasourcePermissionState,
        desired: &DesiredPermissionSet,
    ) -> AppResult<ReconcileSummary> {
        self.apply_desired(state, desired).await
    }

    /// Stops managing permissions, removing every remote grant.
    pub async fn delete(&self, state: &mut DatasourcePermissionState) -> AppResult<usize> {
        let removed = self.remove_all(state).await?;
        state.clear_tracking();
        Ok(removed)
    }
}
