use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "terraform-inventory")]
#[command(version)]
#[command(about = "Ansible dynamic inventory built from Terraform outputs")]
pub struct Cli {
    /// Print the whole inventory (default when no mode is given)
    #[arg(long, conflicts_with = "host")]
    pub list: bool,
    /// Print the variables of a single host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,
    /// Directory holding the applied terraform state
    #[arg(long, value_name = "DIR", env = "TF_INVENTORY_TERRAFORM_DIR")]
    pub terraform_dir: Option<PathBuf>,
    /// Config file (defaults to $TF_INVENTORY_CONFIG, then the user config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Host(String),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match &self.host {
            Some(host) => Mode::Host(host.clone()),
            None => Mode::List,
        }
    }
}
