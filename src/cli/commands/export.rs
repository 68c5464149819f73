//! Export command implementation

use crate::cli::utils;
use crate::schema::transform::sort_fields;
use crate::OutputFormat;
use anyhow::Result;
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("export")
        .about("Export a parsed schema as JSON or YAML")
        .arg(utils::config_arg())
        .arg(utils::format_arg())
        .arg(
            clap::Arg::new("schema")
                .help("Schema file, or - for standard input")
                .value_name("SCHEMA")
                .required(true),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Write to a file instead of standard output")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("sorted")
                .long("sorted")
                .help("List fields in display order")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("compact")
                .long("compact")
                .help("Do not pretty-print JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = utils::load_config_with_format(matches)?;
    if matches.get_flag("compact") {
        config.output.pretty = false;
    }
    let format = config.output.format;

    let app = utils::create_app(config);
    let source = utils::required_value(matches, "schema")?;
    let mut schema = utils::load_valid_schema(&app, source).await?;

    if matches.get_flag("sorted") {
        schema = sort_fields(&schema);
    }

    let mut rendered = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&schema)?,
        _ => app.export_json(&schema)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match matches.get_one::<String>("output") {
        Some(output) => {
            let path = PathBuf::from(output);
            tokio::fs::write(&path, rendered).await?;
            info!("Exported {} to {:?}", schema.name, path);
            println!("Exported '{}' to {}", schema.name, path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
