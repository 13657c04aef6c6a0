use anyhow::{Context as AnyhowContext, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::settings::RunSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "spec-adapter")]
#[command(about = "Discover and run NSpec-style specs from module manifests", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Run settings file (JSON or YAML)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE", global = true)]
    pub output_file: Option<PathBuf>,

    /// Output format (json, text)
    #[arg(short = 'f', long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the test cases found in the given binaries
    Discover(SourceArgs),
    /// Discover and run the test cases found in the given binaries
    Run(SourceArgs),
}

#[derive(ClapArgs, Debug)]
pub struct SourceArgs {
    /// Module manifests, or directories containing them
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Only spec classes whose full name matches this regular expression
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Only examples carrying this tag. Can be specified multiple times.
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,

    /// Skip examples carrying this tag. Can be specified multiple times.
    #[arg(long, value_name = "TAG")]
    pub exclude_tag: Vec<String>,

    /// Discover binaries in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Do not parse module sources for navigation data
    #[arg(long)]
    pub no_source_fallback: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        for path in &self.command.sources().paths {
            validate_path(path)?;
        }
        if let Some(ref settings_path) = self.settings {
            if !settings_path.is_file() {
                anyhow::bail!("Settings file does not exist: {}", settings_path.display());
            }
        }
        Ok(())
    }

    /// Settings file values, overridden by the flags given on the command line.
    pub fn run_settings(&self) -> Result<RunSettings> {
        let mut settings = match &self.settings {
            Some(path) => RunSettings::load(path)
                .with_context(|| format!("Invalid settings file: {}", path.display()))?,
            None => RunSettings::default(),
        };
        self.command.sources().apply_to(&mut settings);
        Ok(settings)
    }
}

impl Command {
    pub fn sources(&self) -> &SourceArgs {
        match self {
            Command::Discover(args) | Command::Run(args) => args,
        }
    }
}

impl SourceArgs {
    fn apply_to(&self, settings: &mut RunSettings) {
        if self.filter.is_some() {
            settings.class_filter = self.filter.clone();
        }
        if !self.tag.is_empty() {
            settings.include_tags = self.tag.clone();
        }
        if !self.exclude_tag.is_empty() {
            settings.exclude_tags = self.exclude_tag.clone();
        }
        if self.parallel {
            settings.parallel = true;
        }
        if self.no_source_fallback {
            settings.source_fallback = false;
        }
    }
}

pub fn validate_path(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    } else if path.is_dir() {
        std::fs::metadata(path)
            .with_context(|| format!("Cannot read directory: {}", path.display()))?;
    } else {
        anyhow::bail!("Path is neither a file nor a directory: {}", path.display());
    }

    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
