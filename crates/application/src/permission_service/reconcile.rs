use super::*;

impl DatasourcePermissionService {
    /// Fetches every permission record attached to a data source.
    ///
    /// A missing data source is returned as `AppError::NotFound` for the
    /// caller to classify.
    pub async fn fetch_permissions(
        &self,
        datasource_id: DatasourceId,
    ) -> AppResult<Vec<RemotePermissionRecord>> {
        let listing = self.client.list_permissions(datasource_id).await?;
        Ok(listing.permissions)
    }

    /// Converges remote permissions to the declared set.
    ///
    /// An empty set means permissions are unmanaged and issues no remote call.
    /// Unrecognized permission symbols are rejected before any mutation.
    ///
    /// Unlike `read` and `remove_all`, the state read taken here does not
    /// treat a missing data source as drift: it returns `AppError::NotFound`,
    /// since permissions cannot be attached to a data source that is gone.
    pub async fn apply_desired(
        &self,
        state: &mut DatasourcePermissionState,
        desired: &DesiredPermissionSet,
    ) -> AppResult<ReconcileSummary> {
        if desired.is_empty() {
            debug!(
                datasource_id = %state.datasource_id,
                "no permissions declared, skipping reconciliation"
            );
            return Ok(ReconcileSummary::default());
        }

        desired.validate()?;

        let datasource_id = state.datasource_id;
        let remote = self.fetch_permissions(datasource_id).await?;
        let plan = ReconcilePlan::compute(desired, &remote);

        if plan.is_converged() {
            debug!(%datasource_id, "datasource permissions already converged");
        } else if plan.is_rebuild() {
            info!(
                %datasource_id,
                removals = plan.removals.len(),
                additions = plan.additions.len(),
                "stale datasource permissions found, rebuilding affected codes"
            );
        }

        let removed = self.remove_records(datasource_id, &plan.removals).await?;
        let added = self.add_payloads(datasource_id, &plan.additions).await?;

        info!(%datasource_id, added, removed, "datasource permissions reconciled");

        state.mark_tracked();
        self.read(state).await?;

        Ok(ReconcileSummary { added, removed })
    }

    /// Removes every permission currently attached to the data source.
    ///
    /// A missing data source counts as already removed and clears tracking.
    pub async fn remove_all(&self, state: &mut DatasourcePermissionState) -> AppResult<usize> {
        let datasource_id = state.datasource_id;
        let remote = match self.fetch_permissions(datasource_id).await {
            Ok(remote) => remote,
            Err(error) if error.is_not_found() => {
                forget_vanished(state);
                return Ok(0);
            }
            Err(error) => return Err(error),
        };

        let removed = self.remove_records(datasource_id, &remote).await?;
        info!(%datasource_id, removed, "datasource permissions removed");

        Ok(removed)
    }

    async fn add_payloads(
        &self,
        datasource_id: DatasourceId,
        payloads: &[AddPermissionPayload],
    ) -> AppResult<usize> {
        for payload in payloads {
            debug!(
                %datasource_id,
                team_id = payload.team_id,
                user_id = payload.user_id,
                permission_code = payload.permission_code,
                "adding datasource permission"
            );
            self.client.add_permission(datasource_id, *payload).await?;
        }

        Ok(payloads.len())
    }

    async fn remove_records(
        &self,
        datasource_id: DatasourceId,
        records: &[RemotePermissionRecord],
    ) -> AppResult<usize> {
        for record in records {
            debug!(
                %datasource_id,
                team_id = record.team_id,
                user_id = record.user_id,
                permission_code = record.permission_code,
                "removing datasource permission"
            );
            self.client
                .remove_permission(datasource_id, record.permission_code)
                .await?;
        }

        Ok(records.len())
    }
}

pub(super) fn forget_vanished(state: &mut DatasourcePermissionState) {
    warn!(
        datasource_id = %state.datasource_id,
        "removing datasource permissions from state because the datasource no longer exists"
    );
    state.clear_tracking();
}
