//! CLI argument definitions for the record normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recnorm",
    version,
    about = "Record normalizer - convert XML payloads and normalize flat records",
    long_about = "Convert API XML payloads into JSON and normalize flat JSON records.\n\n\
                  Module configurations map each source field to a rename target,\n\
                  a dtype and an inclusion flag."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert an XML payload into JSON.
    Xml(XmlArgs),

    /// Show the sanitized form of raw field names.
    Sanitize(SanitizeArgs),

    /// Generate or validate module configurations.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Normalize JSON records with a module configuration.
    Normalize(NormalizeArgs),
}

#[derive(Parser)]
pub struct XmlArgs {
    /// XML payload to convert.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Parser)]
pub struct SanitizeArgs {
    /// Raw field names.
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Generate a module configuration from rename and dtype files.
    Build(ConfigBuildArgs),

    /// Resolve a configuration file and list its fields.
    Check(ConfigCheckArgs),
}

#[derive(Parser)]
pub struct ConfigBuildArgs {
    /// Module (data source) name.
    #[arg(long = "module", value_name = "NAME")]
    pub module: String,

    /// JSON object of field name to dtype string (or null).
    #[arg(long = "dtypes", value_name = "PATH")]
    pub dtypes: PathBuf,

    /// JSON object of field name to rename target (or null).
    ///
    /// When omitted, every field of the dtype file is renamed to its
    /// sanitized name.
    #[arg(long = "renames", value_name = "PATH")]
    pub renames: Option<PathBuf>,

    /// Merge the generated module into this configuration file and write it back.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConfigCheckArgs {
    /// Configuration file to resolve.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Configuration file holding the module.
    #[arg(long = "config", value_name = "PATH")]
    pub config: PathBuf,

    /// Module whose configuration applies.
    #[arg(long = "module", value_name = "NAME")]
    pub module: String,

    /// JSON file with one record object or an array of them.
    #[arg(value_name = "RECORDS")]
    pub records: PathBuf,

    /// Keep fields the module does not configure, coerced to strings.
    ///
    /// Fields configured with `include: false` are still dropped.
    #[arg(long = "keep-unconfigured")]
    pub keep_unconfigured: bool,

    /// Print single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
