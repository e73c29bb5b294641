use std::sync::Arc;

use dsperm_core::AppResult;
use dsperm_domain::{DatasourceId, DatasourcePermissionState, DesiredPermissionSet};
use tracing::{debug, info, warn};

use crate::permission_ports::{
    AddPermissionPayload, DatasourcePermissionClient, RemotePermissionRecord,
};

mod lifecycle;
mod plan;
mod reconcile;

pub use plan::ReconcilePlan;

/// Counts of remote mutations issued by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Grants attached.
    pub added: usize,
    /// Grants removed.
    pub removed: usize,
}

/// Reconciles declared data source permissions against the remote server.
///
/// Calls are issued one at a time; the first failure aborts the invocation
/// and mutations already applied stay applied.
#[derive(Clone)]
pub struct DatasourcePermissionService {
    client: Arc<dyn DatasourcePermissionClient>,
}

impl DatasourcePermissionService {
    /// Creates a reconciler over a remote permission client.
    #[must_use]
    pub fn new(client: Arc<dyn DatasourcePermissionClient>) -> Self {
        Self { client }
    }
}
