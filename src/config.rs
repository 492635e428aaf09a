use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub const CONFIG_ENV: &str = "TF_INVENTORY_CONFIG";
pub const DEFAULT_TERRAFORM_DIR: &str = "../environments/dev";
pub const DEFAULT_GROUP: &str = "webservers";
pub const DEFAULT_OUTPUT: &str = "vm_connection";
const META_KEY: &str = "_meta";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    #[serde(default)]
    pub terraform: TerraformSection,
    #[serde(default)]
    pub inventory: InventorySection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerraformSection {
    /// Explicit terraform binary; must exist when set.
    pub path: Option<PathBuf>,
    /// Directory holding the applied terraform state.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventorySection {
    #[serde(default = "default_group")]
    pub group: String,
    /// Name of the terraform output carrying the VM connection details.
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_vars")]
    pub vars: IndexMap<String, Value>,
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            group: default_group(),
            output: default_output(),
            vars: default_vars(),
        }
    }
}

fn default_group() -> String {
    DEFAULT_GROUP.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

/// Connection variables applied to every host in the group.
pub fn default_vars() -> IndexMap<String, Value> {
    [
        ("ansible_user", "azureuser"),
        ("ansible_ssh_private_key_file", "~/.ssh/terraform-demo/id_rsa"),
        ("ansible_ssh_common_args", "-o StrictHostKeyChecking=no"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
    .collect()
}

impl InventoryConfig {
    /// The group name shares the top level with `_meta`, so it cannot take that key.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.inventory.group != META_KEY,
            "inventory.group cannot be `{META_KEY}`; that key is reserved for hostvars"
        );
        Ok(())
    }

    pub fn terraform_dir(&self) -> PathBuf {
        self.terraform
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TERRAFORM_DIR))
    }
}

pub fn load(path_override: Option<&Path>) -> Result<InventoryConfig> {
    let env_override = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let explicit = path_override.map(Path::to_path_buf).or(env_override);
    load_from(explicit.as_deref())
}

pub fn load_from(path_override: Option<&Path>) -> Result<InventoryConfig> {
    let Some(path) = path_override.map(Path::to_path_buf).or_else(config_path) else {
        return Ok(InventoryConfig::default());
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(InventoryConfig::default());
    }

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config: InventoryConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut dir| {
        dir.push("terraform-inventory");
        dir.push("config.toml");
        dir
    })
}
