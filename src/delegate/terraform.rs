use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use which::which;

use crate::config::InventoryConfig;
use crate::outputs::TerraformOutputs;
use crate::util::json::parse_json_bytes;
use crate::util::process::{self, CommandOutput, CommandSpec, StreamMode};

const TOOL_NAME: &str = "terraform";
pub const TERRAFORM_PATH_ENV: &str = "TF_INVENTORY_TERRAFORM_PATH";

#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("{0}")]
    Resolve(String),
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` returned non-zero exit status {code}")]
    Exit { command: String, code: i32 },
    #[error("`{command}` was terminated by a signal")]
    Killed { command: String },
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

impl TerraformError {
    /// Operator-facing line, using the prefixes the inventory consumer greps for.
    pub fn report(&self) -> String {
        match self {
            TerraformError::Parse(err) => format!("Error parsing Terraform JSON: {err}"),
            other => format!("Error getting Terraform output: {other}"),
        }
    }
}

pub struct TerraformDelegate {
    program: OsString,
    working_dir: PathBuf,
}

impl TerraformDelegate {
    pub fn new(program: impl Into<OsString>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn from_config(
        config: &InventoryConfig,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self, TerraformError> {
        let program = resolve_program(config)?;
        Ok(Self::new(program, working_dir))
    }

    /// Runs `terraform output -json` in the working directory and decodes the result.
    pub fn outputs(&self) -> Result<TerraformOutputs, TerraformError> {
        let spec = CommandSpec::new(self.program.clone())
            .arg("output")
            .arg("-json")
            .current_dir(&self.working_dir)
            .capture(StreamMode::Capture, StreamMode::Capture);
        let command = spec.display();
        tracing::debug!(%command, dir = %self.working_dir.display(), "running terraform");

        let output = process::run(&spec).map_err(|source| TerraformError::Spawn {
            command: command.clone(),
            source,
        })?;
        log_stderr(&output);
        ensure_success(&command, &output)?;

        let stdout = output.stdout.unwrap_or_default();
        let outputs: TerraformOutputs = parse_json_bytes(&stdout)?;
        tracing::debug!(count = outputs.len(), "decoded terraform outputs");
        Ok(outputs)
    }
}

fn ensure_success(command: &str, output: &CommandOutput) -> Result<(), TerraformError> {
    if output.status.success() {
        return Ok(());
    }
    match output.status.code() {
        Some(code) => Err(TerraformError::Exit {
            command: command.to_string(),
            code,
        }),
        None => Err(TerraformError::Killed {
            command: command.to_string(),
        }),
    }
}

fn log_stderr(output: &CommandOutput) {
    let Some(stderr) = output.stderr.as_deref() else {
        return;
    };
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if !text.is_empty() {
        tracing::debug!(stderr = %text, "terraform stderr");
    }
}

/// Resolve the terraform binary using env override, config, then PATH.
fn resolve_program(config: &InventoryConfig) -> Result<OsString, TerraformError> {
    if let Some(env_override) = std::env::var_os(TERRAFORM_PATH_ENV) {
        let path = PathBuf::from(env_override);
        if !path.exists() {
            return Err(TerraformError::Resolve(format!(
                "{TERRAFORM_PATH_ENV} points to `{}` but it does not exist",
                path.display()
            )));
        }
        return Ok(path.into_os_string());
    }

    if let Some(custom) = config.terraform.path.as_ref() {
        if !custom.exists() {
            return Err(TerraformError::Resolve(format!(
                "configured terraform path `{}` does not exist",
                custom.display()
            )));
        }
        return Ok(custom.as_os_str().to_os_string());
    }

    which(TOOL_NAME)
        .map(PathBuf::into_os_string)
        .map_err(|error| {
            TerraformError::Resolve(format!(
                "terraform is required but was not found ({error}). Install terraform and \
                 ensure it is on your PATH, set {TERRAFORM_PATH_ENV}, or set [terraform].path \
                 in config."
            ))
        })
}
