//! Configuration types for the SambaDNS system
//!
//! Credentials for `samba-tool` plus how to invoke it. Values can be supplied
//! explicitly (e.g. deserialized from a host's configuration) and are then
//! overridden by the `SAMBADNS_*` environment variables when those are set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Username environment variable
pub const ENV_USERNAME: &str = "SAMBADNS_USERNAME";
/// Password environment variable
pub const ENV_PASSWORD: &str = "SAMBADNS_PASSWORD";
/// Program path environment variable
pub const ENV_TOOL_PATH: &str = "SAMBADNS_TOOL_PATH";
/// Per-invocation deadline environment variable, in seconds
pub const ENV_TIMEOUT_SECS: &str = "SAMBADNS_TIMEOUT_SECS";

/// Main SambaDNS configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct SambaDnsConfig {
    /// Username for samba-tool authentication (e.g. `terraform@example.com`)
    #[serde(default)]
    pub username: String,

    /// Password for samba-tool authentication
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub password: String,

    /// Program to execute
    #[serde(default = "default_tool_path")]
    pub tool_path: String,

    /// Optional deadline for each invocation; no deadline when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SambaDnsConfig {
    /// Create a configuration with the given credentials and defaults elsewhere
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            tool_path: default_tool_path(),
            timeout_secs: None,
        }
    }

    /// Load configuration purely from the environment
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::new("", "").with_env_overrides()
    }

    /// Apply `SAMBADNS_*` environment overrides on top of this configuration.
    ///
    /// Non-empty environment values win over explicitly configured ones.
    pub fn with_env_overrides(self) -> Result<Self, crate::Error> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, crate::Error> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(username) = var(ENV_USERNAME) {
            self.username = username;
        }
        if let Some(password) = var(ENV_PASSWORD) {
            self.password = password;
        }
        if let Some(tool_path) = var(ENV_TOOL_PATH) {
            self.tool_path = tool_path;
        }
        if let Some(raw) = var(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse().map_err(|_| {
                crate::Error::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got {raw:?}"))
            })?;
            self.timeout_secs = Some(secs);
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(crate::Error::config("username and password are required"));
        }

        if self.tool_path.is_empty() {
            return Err(crate::Error::config("tool path cannot be empty"));
        }

        if self.timeout_secs == Some(0) {
            return Err(crate::Error::config("timeout must be > 0 seconds"));
        }

        Ok(())
    }

    /// Credentials for the auth argument pair
    pub fn credentials(&self) -> Result<Credentials, crate::Error> {
        Credentials::new(&self.username, &self.password)
    }

    /// Per-invocation deadline, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SambaDnsConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for SambaDnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SambaDnsConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("tool_path", &self.tool_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_tool_path() -> String {
    "samba-tool".to_string()
}

/// Validated samba-tool credentials
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials; both parts are required
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, crate::Error> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(crate::Error::config("username and password are required"));
        }
        Ok(Self { username, password })
    }

    /// `-U <username>%<password>`
    pub fn auth_args(&self) -> [String; 2] {
        [
            "-U".to_string(),
            format!("{}%{}", self.username, self.password),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = SambaDnsConfig::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: username and password are required"
        );
        assert!(SambaDnsConfig::new("admin", "").validate().is_err());
        assert!(Credentials::new("", "secret").is_err());
    }

    #[test]
    fn test_env_overrides_explicit_values() {
        let config = SambaDnsConfig::new("from-config", "cfg-pass")
            .with_overrides(env(&[(ENV_USERNAME, "from-env"), (ENV_PASSWORD, "")]))
            .unwrap();
        assert_eq!(config.username, "from-env");
        // empty env values do not override
        assert_eq!(config.password, "cfg-pass");
        assert_eq!(config.tool_path, "samba-tool");
    }

    #[test]
    fn test_timeout_from_env() {
        let config = SambaDnsConfig::new("u", "p")
            .with_overrides(env(&[(ENV_TIMEOUT_SECS, "30"), (ENV_TOOL_PATH, "/usr/bin/samba-tool")]))
            .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.tool_path, "/usr/bin/samba-tool");

        let err = SambaDnsConfig::new("u", "p")
            .with_overrides(env(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SambaDnsConfig::new("u", "p");
        config.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_args_format() {
        let creds = Credentials::new("terraform@example.com", "s3cret").unwrap();
        assert_eq!(
            creds.auth_args(),
            ["-U".to_string(), "terraform@example.com%s3cret".to_string()]
        );
    }

    #[test]
    fn test_password_not_exposed_in_debug() {
        let config = SambaDnsConfig::new("admin", "secret_password_123");
        let creds = config.credentials().unwrap();

        for debug_str in [format!("{config:?}"), format!("{creds:?}")] {
            assert!(!debug_str.contains("secret_password_123"));
            assert!(debug_str.contains("admin"));
        }
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SambaDnsConfig =
            serde_json::from_str(r#"{"username":"u","password":"p"}"#).unwrap();
        assert_eq!(config.tool_path, "samba-tool");
        assert_eq!(config.timeout_secs, None);
        assert!(config.validate().is_ok());
    }
}
