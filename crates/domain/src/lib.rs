//! Domain types for datasource permission reconciliation.

#![forbid(unsafe_code)]

mod datasource;
mod grant;
mod permission;

pub use datasource::{DatasourceId, DatasourcePermissionState};
pub use grant::{
    DesiredPermissionSet, GrantKey, PermissionGrant, SubjectKind, UNSET_SUBJECT_ID,
    normalize_subject_id,
};
pub use permission::{
    DatasourcePermission, INVALID_PERMISSION_CODE, INVALID_PERMISSION_SYMBOL, decode, encode,
};
