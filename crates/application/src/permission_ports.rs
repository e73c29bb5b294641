mod client;
mod records;

pub use client::DatasourcePermissionClient;
pub use records::{AddPermissionPayload, DatasourcePermissionList, RemotePermissionRecord};
