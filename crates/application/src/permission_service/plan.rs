use std::collections::BTreeSet;

use dsperm_domain::{DesiredPermissionSet, GrantKey};

use crate::permission_ports::{AddPermissionPayload, RemotePermissionRecord};

/// Mutations needed to converge remote permissions to a declared set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Remote records to remove, in listed order.
    pub removals: Vec<RemotePermissionRecord>,
    /// Grants to attach after removals complete.
    pub additions: Vec<AddPermissionPayload>,
}

impl ReconcilePlan {
    /// Computes the plan for a declared set against the listed remote state.
    ///
    /// Grants already present remotely are skipped. The removal primitive is
    /// keyed by permission code and cannot target a single subject, so a code
    /// carrying any stale remote grant is rebuilt: every remote record with
    /// that code is removed and every declared grant with that code is
    /// re-added. Codes without stale grants only receive missing additions.
    #[must_use]
    pub fn compute(desired: &DesiredPermissionSet, remote: &[RemotePermissionRecord]) -> Self {
        let desired_payloads = unique_payloads(desired);
        let desired_keys: BTreeSet<GrantKey> =
            desired_payloads.iter().map(AddPermissionPayload::key).collect();
        let remote_keys: BTreeSet<GrantKey> =
            remote.iter().map(RemotePermissionRecord::key).collect();
        let rebuilt_codes: BTreeSet<i64> = remote
            .iter()
            .filter(|record| !desired_keys.contains(&record.key()))
            .map(|record| record.permission_code)
            .collect();

        Self {
            removals: remote
                .iter()
                .filter(|record| rebuilt_codes.contains(&record.permission_code))
                .cloned()
                .collect(),
            additions: desired_payloads
                .into_iter()
                .filter(|payload| {
                    rebuilt_codes.contains(&payload.permission_code)
                        || !remote_keys.contains(&payload.key())
                })
                .collect(),
        }
    }

    /// Returns whether no mutation is required.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }

    /// Returns whether the plan tears down remote grants before re-adding.
    #[must_use]
    pub fn is_rebuild(&self) -> bool {
        !self.removals.is_empty()
    }
}

fn unique_payloads(desired: &DesiredPermissionSet) -> Vec<AddPermissionPayload> {
    let mut seen = BTreeSet::new();
    desired
        .iter()
        .map(AddPermissionPayload::from_grant)
        .filter(|payload| seen.insert(payload.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use dsperm_domain::{DatasourcePermission, DesiredPermissionSet, PermissionGrant};

    use super::ReconcilePlan;
    use crate::permission_ports::RemotePermissionRecord;

    fn record(id: i64, team_id: i64, user_id: i64) -> RemotePermissionRecord {
        RemotePermissionRecord {
            id: Some(id),
            team_id,
            user_id,
            permission_code: 1,
        }
    }

    fn desired(grants: &[PermissionGrant]) -> DesiredPermissionSet {
        grants.iter().cloned().collect()
    }

    #[test]
    fn empty_remote_adds_every_grant() {
        let plan = ReconcilePlan::compute(
            &desired(&[
                PermissionGrant::for_team(5, DatasourcePermission::Query),
                PermissionGrant::for_user(7, DatasourcePermission::Query),
            ]),
            &[],
        );

        assert!(!plan.is_rebuild());
        assert_eq!(plan.additions.len(), 2);
    }

    #[test]
    fn present_grants_are_skipped() {
        let plan = ReconcilePlan::compute(
            &desired(&[
                PermissionGrant::for_team(5, DatasourcePermission::Query),
                PermissionGrant::for_user(7, DatasourcePermission::Query),
            ]),
            &[record(1, 5, 0)],
        );

        assert!(!plan.is_rebuild());
        assert_eq!(plan.additions.len(), 1);
        assert_eq!(plan.additions[0].user_id, 7);
    }

    #[test]
    fn matching_state_is_converged() {
        let plan = ReconcilePlan::compute(
            &desired(&[PermissionGrant::for_team(5, DatasourcePermission::Query)]),
            &[record(1, 5, 0)],
        );

        assert!(plan.is_converged());
    }

    #[test]
    fn stale_remote_grant_forces_rebuild() {
        let plan = ReconcilePlan::compute(
            &desired(&[PermissionGrant::for_team(5, DatasourcePermission::Query)]),
            &[record(1, 5, 0), record(2, 0, 3)],
        );

        assert!(plan.is_rebuild());
        assert_eq!(plan.removals, vec![record(1, 5, 0), record(2, 0, 3)]);
        assert_eq!(plan.additions.len(), 1);
        assert_eq!(plan.additions[0].team_id, 5);
    }

    #[test]
    fn rebuild_is_limited_to_codes_with_stale_grants() {
        let plan = ReconcilePlan::compute(
            &desired(&[PermissionGrant::for_team(5, DatasourcePermission::Query)]),
            &[
                record(1, 5, 0),
                RemotePermissionRecord {
                    id: Some(2),
                    team_id: 6,
                    user_id: 0,
                    permission_code: 2,
                },
            ],
        );

        assert!(plan.is_rebuild());
        assert_eq!(
            plan.removals
                .iter()
                .map(|record| record.permission_code)
                .collect::<Vec<_>>(),
            vec![2]
        );
        assert!(plan.additions.is_empty());
    }

    #[test]
    fn unset_identifier_variants_collapse() {
        let plan = ReconcilePlan::compute(
            &desired(&[
                PermissionGrant {
                    team_id: 5,
                    user_id: -1,
                    permission: "Query".to_owned(),
                },
                PermissionGrant {
                    team_id: 5,
                    user_id: 0,
                    permission: "Query".to_owned(),
                },
            ]),
            &[],
        );

        assert_eq!(plan.additions.len(), 1);
        assert_eq!(plan.additions[0].user_id, 0);
    }
}
