use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::config::{ConfigFile, OutputFormat};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

/// Default settings file consulted when neither an org argument nor
/// `--config` is given.
const DEFAULT_SETTINGS: &str = "settings.json";

#[derive(Parser, Debug, Default)]
#[command(name = "prtriage")]
#[command(
    about = "Rank every open PR in a GitHub organization by whether it needs your review"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
pub struct Args {
    /// GitHub organization name (falls back to the config file)
    pub org: Option<String>,

    /// Path to a JSON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Repository names to exclude (comma-separated, can specify multiple)
    #[arg(long, value_name = "REPO", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Don't open the HTML report in the default browser
    #[arg(long = "no-open")]
    pub no_open: bool,
}

/// Fully-resolved settings for one run: CLI over config file over defaults.
#[derive(Debug, PartialEq)]
pub struct RunSettings {
    pub org: String,
    pub output: OutputFormat,
    pub ignore: HashSet<String>,
    pub open_browser: bool,
}

/// Resolves CLI arguments against an optional settings file.
///
/// With no org argument and no `--config`, a `settings.json` next to the
/// invocation is required, matching how the tool is used from cron.
pub fn resolve_settings(args: Args) -> Result<RunSettings> {
    let config = match (&args.config, &args.org) {
        (Some(path), _) => ConfigFile::load(path)?,
        (None, None) => {
            let default = Path::new(DEFAULT_SETTINGS);
            if !default.exists() {
                bail!("no organization given and no {DEFAULT_SETTINGS} found");
            }
            ConfigFile::load(default)?
        }
        (None, Some(_)) => ConfigFile::default(),
    };

    merge(args, config)
}

fn merge(args: Args, config: ConfigFile) -> Result<RunSettings> {
    let org = args
        .org
        .or(config.org)
        .context("org is required (via argument or --config)")?;

    let ignore = if args.ignore.is_empty() {
        config.ignore
    } else {
        args.ignore
    };
    let ignore = ignore
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    Ok(RunSettings {
        org,
        output: args.output.or(config.output).unwrap_or_default(),
        ignore,
        open_browser: !args.no_open && config.open.unwrap_or(true),
    })
}
