//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("listdsl")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Check, format and apply list schema DSL definitions")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::check::command())
            .subcommand(commands::fmt::command())
            .subcommand(commands::export::command())
            .subcommand(commands::validate_data::command())
            .subcommand(commands::defaults::command())
            .subcommand(commands::stats::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("check", sub_matches)) => commands::check::run(sub_matches).await,
            Some(("fmt", sub_matches)) => commands::fmt::run(sub_matches).await,
            Some(("export", sub_matches)) => commands::export::run(sub_matches).await,
            Some(("validate-data", sub_matches)) => {
                commands::validate_data::run(sub_matches).await
            }
            Some(("defaults", sub_matches)) => commands::defaults::run(sub_matches).await,
            Some(("stats", sub_matches)) => commands::stats::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use crate::schema::DslSchema;
    use crate::{CheckedSchema, Config, ListDsl, OutputFormat};
    use anyhow::{anyhow, Context, Result};
    use clap::{Arg, ArgMatches};
    use std::path::{Path, PathBuf};
    use tokio::io::AsyncReadExt;
    use tracing::{debug, warn};

    /// Default configuration file names, in lookup order
    pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
        ".listdsl.yaml",
        ".listdsl.yml",
        "listdsl.yaml",
        "listdsl.yml",
    ];

    /// The `--config` argument shared by commands that read configuration
    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path")
            .value_name("FILE")
    }

    /// The `--format` argument shared by commands with structured output
    pub fn format_arg() -> Arg {
        Arg::new("format")
            .short('f')
            .long("format")
            .help("Output format (text, json, yaml)")
            .value_name("FORMAT")
    }

    /// Get configuration file path from arguments or the default locations.
    ///
    /// Returns `None` when no `--config` was given and no default file exists.
    pub fn get_config_path(matches: &ArgMatches) -> Result<Option<PathBuf>> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Ok(Some(PathBuf::from(config_path)));
        }

        for name in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        let user_config = crate::utils::get_config_dir()?.join("config.yaml");
        if user_config.exists() {
            return Ok(Some(user_config));
        }

        Ok(None)
    }

    /// Load configuration, falling back to defaults when there is no file
    pub fn load_config(matches: &ArgMatches) -> Result<Config> {
        match get_config_path(matches)? {
            Some(path) => {
                debug!("Using configuration file {}", path.display());
                Config::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Load configuration and apply the `--format` override, if present
    pub fn load_config_with_format(matches: &ArgMatches) -> Result<Config> {
        let mut config = load_config(matches)?;
        if let Some(format) = matches.get_one::<String>("format") {
            config.output.format = format.parse::<OutputFormat>()?;
        }
        Ok(config)
    }

    /// Create ListDsl instance
    pub fn create_app(config: Config) -> ListDsl {
        ListDsl::new(config)
    }

    /// Read a file, or standard input when `source` is `-`
    pub async fn read_input(source: &str) -> Result<String> {
        if source == "-" {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read standard input")?;
            return Ok(text);
        }

        tokio::fs::read_to_string(Path::new(source))
            .await
            .with_context(|| format!("Failed to read {source}"))
    }

    /// Read and check a schema from a file or standard input
    pub async fn load_checked(app: &ListDsl, source: &str) -> Result<CheckedSchema> {
        let text = read_input(source).await?;
        Ok(app.check_source(&text, source)?)
    }

    /// Read a schema and reject it unless it passes schema validation
    pub async fn load_valid_schema(app: &ListDsl, source: &str) -> Result<DslSchema> {
        let checked = load_checked(app, source).await?;

        for warning in &checked.result.warnings {
            warn!("{source}: {warning}");
        }
        if !checked.result.is_valid {
            let errors: Vec<String> = checked.result.errors.iter().map(|e| e.to_string()).collect();
            return Err(anyhow!(
                "{source} is not a valid schema:\n  {}",
                errors.join("\n  ")
            ));
        }

        Ok(checked.schema)
    }

    /// The required positional argument `name`
    pub fn required_value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
        matches
            .get_one::<String>(name)
            .map(String::as_str)
            .ok_or_else(|| anyhow!("Missing argument <{}>", name.to_uppercase()))
    }
}
