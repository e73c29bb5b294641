use std::fmt::{Display, Formatter};
use std::str::FromStr;

use dsperm_core::AppError;
use serde::{Deserialize, Serialize};

use crate::grant::PermissionGrant;

/// Remote identifier of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceId(i64);

impl DatasourceId {
    /// Creates a data source identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the tracking identifier derived from this data source.
    #[must_use]
    pub fn tracking_id(&self) -> String {
        self.0.to_string()
    }
}

impl Display for DatasourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for DatasourceId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self).map_err(|error| {
            AppError::Validation(format!("invalid datasource id '{value}': {error}"))
        })
    }
}

/// Locally tracked state of one managed data source permission resource.
///
/// A `None` tracking identifier tells the lifecycle owner the resource is no
/// longer managed and must be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourcePermissionState {
    /// Data source the permissions belong to. Immutable after creation.
    pub datasource_id: DatasourceId,
    /// Tracking identifier, set once the resource has been reconciled.
    pub tracking_id: Option<String>,
    /// Last server-confirmed permissions, in server order.
    pub permissions: Vec<PermissionGrant>,
}

impl DatasourcePermissionState {
    /// Creates untracked state for a data source.
    #[must_use]
    pub fn new(datasource_id: DatasourceId) -> Self {
        Self {
            datasource_id,
            tracking_id: None,
            permissions: Vec::new(),
        }
    }

    /// Returns whether the lifecycle owner still tracks this resource.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracking_id
            .as_deref()
            .is_some_and(|tracking_id| !tracking_id.is_empty())
    }

    /// Records the tracking identifier derived from the data source.
    pub fn mark_tracked(&mut self) {
        self.tracking_id = Some(self.datasource_id.tracking_id());
    }

    /// Drops tracking after the remote resource disappeared or was deleted.
    pub fn clear_tracking(&mut self) {
        self.tracking_id = None;
        self.permissions.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{DatasourceId, DatasourcePermissionState};
    use crate::{DatasourcePermission, PermissionGrant};

    #[test]
    fn tracking_id_is_decimal_form() {
        assert_eq!(DatasourceId::new(42).tracking_id(), "42");
        assert_eq!(DatasourceId::new(-3).tracking_id(), "-3");
    }

    #[test]
    fn datasource_id_parses_trimmed_integers() {
        let parsed = DatasourceId::from_str(" 17 ");
        assert!(parsed.is_ok());
        assert_eq!(parsed.map(|id| id.as_i64()).unwrap_or_default(), 17);
        assert!(DatasourceId::from_str("abc").is_err());
    }

    #[test]
    fn state_tracking_lifecycle() {
        let mut state = DatasourcePermissionState::new(DatasourceId::new(9));
        assert!(!state.is_tracked());

        state.mark_tracked();
        state
            .permissions
            .push(PermissionGrant::for_team(1, DatasourcePermission::Query));
        assert!(state.is_tracked());
        assert_eq!(state.tracking_id.as_deref(), Some("9"));

        state.clear_tracking();
        assert!(!state.is_tracked());
        assert!(state.permissions.is_empty());
    }
}
