//! Ansible dynamic-inventory document and the generator that fills it from
//! terraform outputs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::InventorySection;
use crate::outputs::TerraformOutputs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(flatten)]
    pub groups: IndexMap<String, Group>,
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub hosts: Vec<String>,
    pub vars: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub hostvars: IndexMap<String, HostVars>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVars {
    pub ansible_host: String,
    pub private_ip: String,
    pub vm_name: String,
}

impl Inventory {
    /// `{"_meta": {"hostvars": {}}}`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn host_vars(&self, host: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(host)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds the inventory for one run.
///
/// No outputs at all yields the empty document. Otherwise the configured
/// group is always present, and the VM is added only when it has a public IP.
pub fn generate(outputs: &TerraformOutputs, settings: &InventorySection) -> Inventory {
    if outputs.is_empty() {
        return Inventory::empty();
    }

    let mut group = Group {
        hosts: Vec::new(),
        vars: settings.vars.clone(),
    };
    let mut meta = Meta::default();

    if let Some(conn) = outputs.vm_connection(&settings.output) {
        if conn.public_ip.is_empty() {
            tracing::info!(vm = %conn.vm_name, "vm has no public ip, skipping host");
        } else {
            tracing::debug!(vm = %conn.vm_name, host = %conn.public_ip, "adding host");
            group.hosts.push(conn.vm_name.clone());
            meta.hostvars.insert(
                conn.vm_name.clone(),
                HostVars {
                    ansible_host: conn.public_ip,
                    private_ip: conn.private_ip,
                    vm_name: conn.vm_name,
                },
            );
        }
    } else {
        tracing::info!(output = %settings.output, "connection output not found");
    }

    let mut groups = IndexMap::new();
    groups.insert(settings.group.clone(), group);
    Inventory { groups, meta }
}
