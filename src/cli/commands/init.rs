//! Init command implementation

use crate::utils::ensure_directory;
use crate::Config;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

const EXAMPLE_SCHEMA: &str = include_str!("../../../schemas/task-tracker.dsl");

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(".listdsl.yaml"),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .help("Also write an example schema into the schema directory")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("force")
                .long("force")
                .help("Overwrite existing files")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = PathBuf::from(
        matches
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or(".listdsl.yaml"),
    );
    let example = matches.get_flag("example");
    let force = matches.get_flag("force");

    if output_path.exists() && !force {
        return Err(anyhow!(
            "{} already exists; use --force to overwrite it",
            output_path.display()
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    let config = Config::default();
    config.save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);

    if example {
        let base = output_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let schema_dir = match config.schema_paths.first() {
            Some(path) => base.join(path),
            None => base.join("schemas"),
        };
        ensure_directory(&schema_dir)?;

        let schema_path = schema_dir.join("task-tracker.dsl");
        if schema_path.exists() && !force {
            return Err(anyhow!(
                "{} already exists; use --force to overwrite it",
                schema_path.display()
            ));
        }
        tokio::fs::write(&schema_path, EXAMPLE_SCHEMA).await?;

        println!("Configuration and example schema created.");
        println!("Edit {} or add more .dsl files next to it.", schema_path.display());
    } else {
        println!("Configuration file created.");
        println!("Add .dsl schema files under the configured schema paths to get started.");
    }

    Ok(())
}
