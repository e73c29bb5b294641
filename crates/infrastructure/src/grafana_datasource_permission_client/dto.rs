use dsperm_application::{AddPermissionPayload, DatasourcePermissionList, RemotePermissionRecord};
use dsperm_domain::UNSET_SUBJECT_ID;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DatasourcePermissionsResponse {
    #[serde(default)]
    pub permissions: Option<Vec<DatasourcePermissionResponse>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DatasourcePermissionResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub team_id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub permission: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AddDatasourcePermissionRequest {
    #[serde(skip_serializing_if = "is_unset")]
    pub team_id: i64,
    #[serde(skip_serializing_if = "is_unset")]
    pub user_id: i64,
    pub permission: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct GrafanaErrorResponse {
    pub message: String,
}

fn is_unset(value: &i64) -> bool {
    *value == UNSET_SUBJECT_ID
}

impl From<AddPermissionPayload> for AddDatasourcePermissionRequest {
    fn from(payload: AddPermissionPayload) -> Self {
        Self {
            team_id: payload.team_id,
            user_id: payload.user_id,
            permission: payload.permission_code,
        }
    }
}

impl From<DatasourcePermissionsResponse> for DatasourcePermissionList {
    fn from(response: DatasourcePermissionsResponse) -> Self {
        Self {
            permissions: response
                .permissions
                .unwrap_or_default()
                .into_iter()
                .map(|permission| RemotePermissionRecord {
                    id: permission.id,
                    team_id: permission.team_id,
                    user_id: permission.user_id,
                    permission_code: permission.permission,
                })
                .collect(),
        }
    }
}
