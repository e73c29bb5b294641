//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod grafana_datasource_permission_client;
mod in_memory_datasource_permission_client;

pub use grafana_datasource_permission_client::{
    GrafanaClientConfig, GrafanaCredentials, GrafanaDatasourcePermissionClient,
};
pub use in_memory_datasource_permission_client::InMemoryDatasourcePermissionClient;
