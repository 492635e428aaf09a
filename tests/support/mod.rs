#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const VM_OUTPUTS: &str = r#"{
  "resource_details": {
    "sensitive": false,
    "type": ["object", {"resource_group_name": "string"}],
    "value": {"resource_group_name": "rg-terraform-demo-dev"}
  },
  "vm_connection": {
    "sensitive": false,
    "type": ["object", {}],
    "value": {
      "vm_name": "vm-web-dev",
      "public_ip": "20.42.7.11",
      "private_ip": "10.0.1.4",
      "ssh_command": "ssh azureuser@20.42.7.11"
    }
  }
}"#;

/// Temp tree laid out like the provisioning repo:
/// `ansible/` is the working directory and `environments/dev/` holds the state.
pub struct Workspace {
    _dir: TempDir,
    pub root: PathBuf,
    pub terraform: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::create_dir_all(root.join("ansible")).unwrap();
        fs::create_dir_all(root.join("environments/dev")).unwrap();
        let terraform = root.join("bin").join("terraform");
        Self {
            _dir: dir,
            root,
            terraform,
        }
    }

    pub fn ansible_dir(&self) -> PathBuf {
        self.root.join("ansible")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join("environments/dev")
    }

    /// Stub that prints `outputs.json` from its working directory.
    pub fn terraform_printing(&self, outputs: &str) -> &Self {
        fs::write(self.state_dir().join("outputs.json"), outputs).unwrap();
        write_stub(
            &self.terraform,
            r#"[ "$1 $2" = "output -json" ] || exit 64
cat outputs.json"#,
        );
        self
    }

    pub fn terraform_script(&self, script: &str) -> &Self {
        write_stub(&self.terraform, script);
        self
    }

    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("terraform-inventory");
        cmd.current_dir(self.ansible_dir())
            .env("TF_INVENTORY_TERRAFORM_PATH", &self.terraform)
            .env("TF_INVENTORY_CONFIG", self.root.join("no-config.toml"))
            .env_remove("TF_INVENTORY_TERRAFORM_DIR")
            .env_remove("TF_INVENTORY_LOG");
        cmd
    }
}

fn write_stub(path: &Path, script: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{script}\n")).unwrap();

    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}
