use std::collections::BTreeSet;
use std::str::FromStr;

use dsperm_core::AppResult;
use serde::{Deserialize, Serialize};

use crate::permission::{DatasourcePermission, encode};

/// Subject identifier value meaning "not set".
pub const UNSET_SUBJECT_ID: i64 = 0;

/// Kind of principal a grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// Grant targets a team.
    Team,
    /// Grant targets a user.
    User,
}

/// One assignment of a permission level to a team or user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Team identifier, `0` when unset.
    #[serde(default)]
    pub team_id: i64,
    /// User identifier, `0` when unset.
    #[serde(default)]
    pub user_id: i64,
    /// Symbolic permission name such as `Query`.
    pub permission: String,
}

impl PermissionGrant {
    /// Creates a grant for a team.
    #[must_use]
    pub fn for_team(team_id: i64, permission: DatasourcePermission) -> Self {
        Self {
            team_id,
            user_id: UNSET_SUBJECT_ID,
            permission: permission.as_str().to_owned(),
        }
    }

    /// Creates a grant for a user.
    #[must_use]
    pub fn for_user(user_id: i64, permission: DatasourcePermission) -> Self {
        Self {
            team_id: UNSET_SUBJECT_ID,
            user_id,
            permission: permission.as_str().to_owned(),
        }
    }

    /// Returns the kind of subject this grant targets.
    ///
    /// Teams win when both identifiers are set; the remote API accepts both.
    #[must_use]
    pub fn subject_kind(&self) -> Option<SubjectKind> {
        if subject_id_is_set(self.team_id) {
            Some(SubjectKind::Team)
        } else if subject_id_is_set(self.user_id) {
            Some(SubjectKind::User)
        } else {
            None
        }
    }

    /// Returns the wire code of the permission, or the invalid sentinel.
    #[must_use]
    pub fn permission_code(&self) -> i64 {
        encode(self.permission.as_str())
    }

    /// Parses the symbolic permission, rejecting unknown symbols.
    pub fn validated_permission(&self) -> AppResult<DatasourcePermission> {
        DatasourcePermission::from_str(self.permission.as_str())
    }

    /// Returns the identity used to compare declared and remote grants.
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.team_id, self.user_id, self.permission_code())
    }
}

/// Comparable identity of a grant on the wire.
///
/// Unset subject identifiers are normalized so `-1` and `0` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GrantKey {
    /// Normalized team identifier.
    pub team_id: i64,
    /// Normalized user identifier.
    pub user_id: i64,
    /// Permission wire code.
    pub permission_code: i64,
}

impl GrantKey {
    /// Creates a key, normalizing unset subject identifiers.
    #[must_use]
    pub fn new(team_id: i64, user_id: i64, permission_code: i64) -> Self {
        Self {
            team_id: normalize_subject_id(team_id),
            user_id: normalize_subject_id(user_id),
            permission_code,
        }
    }
}

/// Maps any unset subject identifier to [`UNSET_SUBJECT_ID`].
#[must_use]
pub fn normalize_subject_id(value: i64) -> i64 {
    if subject_id_is_set(value) {
        value
    } else {
        UNSET_SUBJECT_ID
    }
}

fn subject_id_is_set(value: i64) -> bool {
    value > UNSET_SUBJECT_ID
}

/// Complete declared permission state for one data source.
///
/// Insertion order is irrelevant and duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesiredPermissionSet(BTreeSet<PermissionGrant>);

impl DesiredPermissionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no grants are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of declared grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates grants in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionGrant> {
        self.0.iter()
    }

    /// Rejects the set if any grant carries an unrecognized permission symbol.
    pub fn validate(&self) -> AppResult<()> {
        for grant in &self.0 {
            grant.validated_permission()?;
        }

        Ok(())
    }
}

impl FromIterator<PermissionGrant> for DesiredPermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionGrant>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DesiredPermissionSet {
    type Item = &'a PermissionGrant;
    type IntoIter = std::collections::btree_set::Iter<'a, PermissionGrant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
