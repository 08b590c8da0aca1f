//! CLI Commands

pub mod data;
pub mod resource;
pub mod schema;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::debug;

use tccloud_provider::provider::has_errors;
use tccloud_provider::state::{decode_dynamic_value, encode_dynamic_value};
use tccloud_provider::{DynamicValue, ProviderConfig, TencentCloudProvider};

use crate::output::print_diagnostics;

/// Provider settings. Flags override the config file; anything still unset
/// comes from the environment.
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Provider config file (TOML)
    #[arg(long, env = "TCCLOUD_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Region to operate in
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// API secret id
    #[arg(long, global = true)]
    pub secret_id: Option<String>,

    /// API secret key
    #[arg(long, global = true)]
    pub secret_key: Option<String>,

    /// Full endpoint URL used for every service
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API calls per second allowed for one action; 0 disables limiting
    #[arg(long, global = true)]
    pub rate_limit: Option<u32>,
}

impl ProviderArgs {
    /// The provider block built from flags.
    fn block(&self) -> DynamicValue {
        let mut fields = std::collections::BTreeMap::new();
        let strings = [
            ("region", &self.region),
            ("secret_id", &self.secret_id),
            ("secret_key", &self.secret_key),
            ("endpoint", &self.endpoint),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                fields.insert(name.to_string(), DynamicValue::String(value.clone()));
            }
        }
        if let Some(limit) = self.rate_limit {
            fields.insert("rate_limit".to_string(), DynamicValue::Int(i64::from(limit)));
        }
        DynamicValue::Map(fields)
    }
}

/// Build a configured provider.
pub async fn connect(args: &ProviderArgs) -> Result<TencentCloudProvider> {
    let path = args
        .config_file
        .clone()
        .unwrap_or_else(ProviderConfig::default_path);
    debug!("Loading provider config from {}", path.display());
    let config = ProviderConfig::load(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;

    let provider = TencentCloudProvider::new();
    let diagnostics = provider.configure_with(config, &args.block()).await;
    print_diagnostics(&diagnostics);
    if has_errors(&diagnostics) {
        bail!("provider configuration failed");
    }
    Ok(provider)
}

/// Read an attribute tree from a JSON or YAML file.
pub fn read_tree(path: &Path) -> Result<DynamicValue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("{} is not valid YAML", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?,
    };
    Ok(DynamicValue::from(&value))
}

/// Read a state file; a missing or empty file is the null state.
pub fn read_state(path: &Path) -> Result<DynamicValue> {
    if !path.exists() {
        return Ok(DynamicValue::Null);
    }
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_dynamic_value(&data).with_context(|| format!("{} is not a state file", path.display()))
}

pub fn write_state(path: &Path, state: &DynamicValue) -> Result<()> {
    let data = encode_dynamic_value(state)?;
    std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Wrote state to {}", path.display());
    Ok(())
}

/// Show diagnostics and fail when any is an error.
pub fn check(diagnostics: &[tccloud_provider::Diagnostic], what: &str) -> Result<()> {
    print_diagnostics(diagnostics);
    if has_errors(diagnostics) {
        bail!("{} failed", what);
    }
    Ok(())
}
