use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use dsperm_core::{AppError, AppResult};
use dsperm_domain::DatasourceId;
use dsperm_infrastructure::{GrafanaClientConfig, GrafanaCredentials};

/// Lifecycle verb the runner executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileAction {
    Apply { permissions_file: PathBuf },
    Read,
    Delete,
}

impl ReconcileAction {
    fn from_lookup<F>(lookup: &F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verb = non_empty(lookup, "RECONCILE_ACTION").unwrap_or_else(|| "apply".to_owned());
        match verb.to_ascii_lowercase().as_str() {
            "apply" => {
                let permissions_file = non_empty(lookup, "PERMISSIONS_FILE").ok_or_else(|| {
                    AppError::Validation(
                        "PERMISSIONS_FILE is required when RECONCILE_ACTION is apply".to_owned(),
                    )
                })?;
                Ok(Self::Apply {
                    permissions_file: PathBuf::from(permissions_file),
                })
            }
            "read" => Ok(Self::Read),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "invalid RECONCILE_ACTION value '{verb}', expected apply, read or delete"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub grafana: GrafanaClientConfig,
    pub timeout_seconds: u64,
    pub datasource_id: DatasourceId,
    pub action: ReconcileAction,
}

impl RunnerConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let grafana_url = required(&lookup, "GRAFANA_URL")?;
        let credentials = GrafanaCredentials::parse(required(&lookup, "GRAFANA_AUTH")?.as_str())?;
        let org_id = optional_parsed::<i64, _>(&lookup, "GRAFANA_ORG_ID")?;
        let timeout_seconds =
            optional_parsed::<u64, _>(&lookup, "GRAFANA_TIMEOUT_SECONDS")?.unwrap_or(15);
        let datasource_id = DatasourceId::from_str(required(&lookup, "DATASOURCE_ID")?.as_str())?;
        let action = ReconcileAction::from_lookup(&lookup)?;

        if timeout_seconds == 0 {
            return Err(AppError::Validation(
                "GRAFANA_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            grafana: GrafanaClientConfig::new(grafana_url.as_str(), credentials, org_id)?,
            timeout_seconds,
            datasource_id,
            action,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, name: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn optional_parsed<T, F>(lookup: &F, name: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name)
        .map(|value| {
            value.parse::<T>().map_err(|error| {
                AppError::Validation(format!("invalid {name} value '{value}': {error}"))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::{ReconcileAction, RunnerConfig};

    fn load(pairs: &[(&str, &str)]) -> Result<RunnerConfig, String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        RunnerConfig::from_lookup(|name| values.get(name).cloned())
            .map_err(|error| error.to_string())
    }

    #[test]
    fn defaults_apply_with_fifteen_second_timeout() {
        let config = load(&[
            ("GRAFANA_URL", "http://localhost:3000/"),
            ("GRAFANA_AUTH", "admin:admin"),
            ("DATASOURCE_ID", "12"),
            ("PERMISSIONS_FILE", "permissions.json"),
        ]);

        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(
            config.action,
            ReconcileAction::Apply {
                permissions_file: PathBuf::from("permissions.json"),
            }
        );
        assert_eq!(config.timeout_seconds, 15);
        assert_eq!(config.datasource_id.as_i64(), 12);
        assert_eq!(config.grafana.base_url(), "http://localhost:3000");
        assert_eq!(config.grafana.org_id(), None);
    }

    #[test]
    fn apply_requires_permissions_file() {
        let error = load(&[
            ("GRAFANA_URL", "http://localhost:3000"),
            ("GRAFANA_AUTH", "token"),
            ("DATASOURCE_ID", "12"),
        ]);

        assert_eq!(
            error.err().as_deref(),
            Some("validation error: PERMISSIONS_FILE is required when RECONCILE_ACTION is apply")
        );
    }

    #[test]
    fn permissions_file_is_ignored_outside_apply() {
        let config = load(&[
            ("GRAFANA_URL", "http://localhost:3000"),
            ("GRAFANA_AUTH", "token"),
            ("DATASOURCE_ID", "12"),
            ("RECONCILE_ACTION", "delete"),
            ("PERMISSIONS_FILE", "permissions.json"),
        ]);

        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.action, ReconcileAction::Delete);
    }

    #[test]
    fn read_does_not_require_permissions_file() {
        let config = load(&[
            ("GRAFANA_URL", "http://localhost:3000"),
            ("GRAFANA_AUTH", "token"),
            ("GRAFANA_ORG_ID", "2"),
            ("DATASOURCE_ID", "12"),
            ("RECONCILE_ACTION", "Read"),
        ]);

        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.action, ReconcileAction::Read);
        assert_eq!(config.grafana.org_id(), Some(2));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = [
            ("GRAFANA_URL", "http://localhost:3000"),
            ("GRAFANA_AUTH", "token"),
            ("RECONCILE_ACTION", "delete"),
        ];

        let missing_id = load(&base);
        assert_eq!(
            missing_id.err().as_deref(),
            Some("validation error: DATASOURCE_ID is required")
        );

        let mut bad_timeout = base.to_vec();
        bad_timeout.push(("DATASOURCE_ID", "1"));
        bad_timeout.push(("GRAFANA_TIMEOUT_SECONDS", "0"));
        assert!(load(&bad_timeout).is_err());

        let mut bad_action = base.to_vec();
        bad_action.push(("DATASOURCE_ID", "1"));
        bad_action[2] = ("RECONCILE_ACTION", "purge");
        assert!(load(&bad_action).is_err());
    }
}
