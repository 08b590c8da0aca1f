//! Provider configuration

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use tccloud_common::{Error, Result, RetryPolicy};

use crate::state::{get_optional_string_attr, DynamicValue};

pub const ENV_SECRET_ID: &str = "TENCENTCLOUD_SECRET_ID";
pub const ENV_SECRET_KEY: &str = "TENCENTCLOUD_SECRET_KEY";
pub const ENV_SECURITY_TOKEN: &str = "TENCENTCLOUD_SECURITY_TOKEN";
pub const ENV_REGION: &str = "TENCENTCLOUD_REGION";

pub const DEFAULT_REGION: &str = "ap-guangzhou";

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API secret id
    pub secret_id: Option<String>,

    /// API secret key
    pub secret_key: Option<String>,

    /// Temporary session token
    pub security_token: Option<String>,

    /// Region every call is made in; unset means the environment, then
    /// `ap-guangzhou`
    pub region: Option<String>,

    /// Endpoint domain suffix, e.g. `pts.<domain>`
    pub domain: String,

    /// `https` or `http`
    pub protocol: String,

    /// Full endpoint URL used instead of `<protocol>://<service>.<domain>`
    pub endpoint_override: Option<String>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// API calls per second allowed for one action; 0 disables limiting
    pub rate_limit_per_second: u32,

    /// Retry budgets
    pub retry: RetryConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            secret_id: None,
            secret_key: None,
            security_token: None,
            region: None,
            domain: "tencentcloudapi.com".to_string(),
            protocol: "https".to_string(),
            endpoint_override: None,
            request_timeout_secs: 30,
            rate_limit_per_second: tccloud_common::ratelimit::DEFAULT_RATE_LIMIT,
            retry: RetryConfig::default(),
        }
    }
}

/// Retry budgets in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            read_timeout_secs: tccloud_common::retry::READ_TIMEOUT.as_secs(),
            write_timeout_secs: tccloud_common::retry::WRITE_TIMEOUT.as_secs(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                Error::InvalidConfig(format!("{}: {}", path.display(), e))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::Internal(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default location, `~/.config/tccloud/config.toml` on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tccloud")
            .join("config.toml")
    }

    /// Fill credentials and region left unset from the environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if self.secret_id.is_none() {
            self.secret_id = get(ENV_SECRET_ID);
        }
        if self.secret_key.is_none() {
            self.secret_key = get(ENV_SECRET_KEY);
        }
        if self.security_token.is_none() {
            self.security_token = get(ENV_SECURITY_TOKEN);
        }
        if self.region.is_none() {
            self.region = get(ENV_REGION);
        }
    }

    /// Override file values with the provider block of a configuration.
    pub fn merge_block(&mut self, block: &DynamicValue) -> Result<()> {
        if block.is_null() {
            return Ok(());
        }
        if block.as_map().is_none() {
            return Err(Error::InvalidConfig(format!(
                "provider block must be an object, found {}",
                block.type_name()
            )));
        }
        if let Some(v) = get_optional_string_attr(block, "secret_id") {
            self.secret_id = Some(v);
        }
        if let Some(v) = get_optional_string_attr(block, "secret_key") {
            self.secret_key = Some(v);
        }
        if let Some(v) = get_optional_string_attr(block, "security_token") {
            self.security_token = Some(v);
        }
        if let Some(v) = get_optional_string_attr(block, "region") {
            self.region = Some(v);
        }
        if let Some(v) = get_optional_string_attr(block, "domain") {
            self.domain = v;
        }
        if let Some(v) = get_optional_string_attr(block, "protocol") {
            self.protocol = v;
        }
        if let Some(v) = get_optional_string_attr(block, "endpoint") {
            self.endpoint_override = Some(v);
        }
        if let Some(v) = block.get("request_timeout").and_then(DynamicValue::as_i64) {
            self.request_timeout_secs = u64::try_from(v)
                .map_err(|_| Error::InvalidConfig("request_timeout must not be negative".into()))?;
        }
        if let Some(v) = block.get("rate_limit").and_then(DynamicValue::as_i64) {
            self.rate_limit_per_second = u32::try_from(v)
                .map_err(|_| Error::InvalidConfig("rate_limit is out of range".into()))?;
        }
        Ok(())
    }

    /// Check that the configuration can reach the API.
    pub fn validate(&self) -> Result<()> {
        if self.secret_id.as_deref().unwrap_or_default().is_empty()
            || self.secret_key.as_deref().unwrap_or_default().is_empty()
        {
            return Err(Error::InvalidConfig(format!(
                "credentials are missing: set secret_id and secret_key or {} and {}",
                ENV_SECRET_ID, ENV_SECRET_KEY
            )));
        }
        if self.region().is_empty() {
            return Err(Error::InvalidConfig("region must not be empty".into()));
        }
        if !matches!(self.protocol.as_str(), "https" | "http") {
            return Err(Error::InvalidConfig(format!(
                "unsupported protocol `{}`",
                self.protocol
            )));
        }
        Ok(())
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn read_policy(&self) -> RetryPolicy {
        RetryPolicy::read().with_timeout(Duration::from_secs(self.retry.read_timeout_secs))
    }

    pub fn write_policy(&self) -> RetryPolicy {
        RetryPolicy::write().with_timeout(Duration::from_secs(self.retry.write_timeout_secs))
    }
}
