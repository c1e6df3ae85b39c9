//! @acp:module "Init Command"
//! @acp:summary "Write a default project configuration"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::{Config, CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Force overwrite existing config
    pub force: bool,
    /// Config file to create
    pub path: PathBuf,
    /// Rule table workbook to reference
    pub workbook: Option<PathBuf>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            force: false,
            path: PathBuf::from(CONFIG_FILE),
            workbook: None,
        }
    }
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.path.exists() && !options.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            options.path.display()
        );
    }

    let config = Config {
        workbook: options.workbook,
        ..Config::default()
    };
    config.save(&options.path)?;
    println!("{} Created {}", style("✓").green(), options.path.display());
    Ok(())
}
