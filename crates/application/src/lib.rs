//! Application services and ports.

#![forbid(unsafe_code)]

mod permission_ports;
mod permission_service;

pub use permission_ports::{
    AddPermissionPayload, DatasourcePermissionClient, DatasourcePermissionList,
    RemotePermissionRecord,
};
pub use permission_service::{DatasourcePermissionService, ReconcilePlan, ReconcileSummary};
