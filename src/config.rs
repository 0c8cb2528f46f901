//! Settings-file support.
//!
//! A JSON file supplies defaults for anything the command line leaves out:
//!
//! ```json
//! { "org": "OneBusAway", "output": "html", "ignore": ["sandbox"], "open": true }
//! ```
//!
//! Command-line arguments always win over file values.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

/// Where the ranked queue goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Html,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub org: Option<String>,
    pub output: Option<OutputFormat>,
    #[serde(default)]
    pub ignore: Vec<String>,
    pub open: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file '{}'", path.display()))?;
        serde_json::from_reader(file)
            .with_context(|| format!("invalid config file '{}'", path.display()))
    }
}
