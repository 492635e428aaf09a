pub mod cli;
pub mod config;
pub mod delegate;
pub mod inventory;
pub mod outputs;
pub mod util;

pub use delegate::terraform::{TerraformDelegate, TerraformError};
pub use inventory::{Inventory, generate};
