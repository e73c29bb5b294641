use dsperm_domain::{GrantKey, PermissionGrant, decode, normalize_subject_id};

/// Payload for attaching one grant to a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPermissionPayload {
    /// Team identifier, `0` when unset.
    pub team_id: i64,
    /// User identifier, `0` when unset.
    pub user_id: i64,
    /// Permission wire code.
    pub permission_code: i64,
}

impl AddPermissionPayload {
    /// Builds the wire payload for a declared grant.
    ///
    /// Both subject identifiers are forwarded when set.
    #[must_use]
    pub fn from_grant(grant: &PermissionGrant) -> Self {
        Self {
            team_id: normalize_subject_id(grant.team_id),
            user_id: normalize_subject_id(grant.user_id),
            permission_code: grant.permission_code(),
        }
    }

    /// Returns the comparable identity of this payload.
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.team_id, self.user_id, self.permission_code)
    }
}

/// Server view of one grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePermissionRecord {
    /// Opaque server-assigned identifier, when the server reports one.
    pub id: Option<i64>,
    /// Team identifier, `0` when unset.
    pub team_id: i64,
    /// User identifier, `0` when unset.
    pub user_id: i64,
    /// Permission wire code.
    pub permission_code: i64,
}

impl RemotePermissionRecord {
    /// Projects the record into its declared form.
    ///
    /// Unknown codes surface as the `"-1"` symbol instead of failing.
    #[must_use]
    pub fn to_grant(&self) -> PermissionGrant {
        PermissionGrant {
            team_id: self.team_id,
            user_id: self.user_id,
            permission: decode(self.permission_code),
        }
    }

    /// Returns the comparable identity of this record.
    #[must_use]
    pub fn key(&self) -> GrantKey {
        GrantKey::new(self.team_id, self.user_id, self.permission_code)
    }
}

/// Permission listing returned by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasourcePermissionList {
    /// Attached grants, in server order.
    pub permissions: Vec<RemotePermissionRecord>,
}
