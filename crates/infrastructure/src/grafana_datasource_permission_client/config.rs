use dsperm_core::{AppError, AppResult};
use url::Url;

/// Credentials used to authenticate against the Grafana HTTP API.
#[derive(Clone, PartialEq, Eq)]
pub enum GrafanaCredentials {
    /// API key or service account token, sent as a bearer token.
    Token(String),
    /// Basic authentication.
    Basic {
        /// Login name.
        username: String,
        /// Password.
        password: String,
    },
}

impl GrafanaCredentials {
    /// Parses a credential string.
    ///
    /// `user:password` selects basic authentication, anything else is a token.
    pub fn parse(value: &str) -> AppResult<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(
                "grafana credentials must not be empty".to_owned(),
            ));
        }

        match value.split_once(':') {
            Some((username, password)) if !username.is_empty() => Ok(Self::Basic {
                username: username.to_owned(),
                password: password.to_owned(),
            }),
            Some(_) => Err(AppError::Validation(
                "grafana basic auth credentials require a username".to_owned(),
            )),
            None => Ok(Self::Token(value.to_owned())),
        }
    }
}

impl std::fmt::Debug for GrafanaCredentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => formatter.write_str("Token(<redacted>)"),
            Self::Basic { username, .. } => formatter
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Connection settings for the Grafana permission client.
#[derive(Debug, Clone)]
pub struct GrafanaClientConfig {
    base_url: String,
    credentials: GrafanaCredentials,
    org_id: Option<i64>,
}

impl GrafanaClientConfig {
    /// Creates a validated configuration.
    pub fn new(
        base_url: &str,
        credentials: GrafanaCredentials,
        org_id: Option<i64>,
    ) -> AppResult<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|error| {
            AppError::Validation(format!("invalid grafana url '{base_url}': {error}"))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "grafana url '{base_url}' must use http or https"
            )));
        }

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
            credentials,
            org_id,
        })
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns the configured credentials.
    #[must_use]
    pub fn credentials(&self) -> &GrafanaCredentials {
        &self.credentials
    }

    /// Returns the organization sent in `X-Grafana-Org-Id`, if any.
    #[must_use]
    pub fn org_id(&self) -> Option<i64> {
        self.org_id
    }
}
