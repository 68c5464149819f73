//! Defaults command implementation

use crate::cli::utils;
use crate::validation::{default_values, visible_fields};
use anyhow::Result;
use clap::{ArgMatches, Command};
use serde_json::Value;

pub fn command() -> Command {
    Command::new("defaults")
        .about("Print the initial values of a schema's fields")
        .arg(utils::config_arg())
        .arg(utils::format_arg())
        .arg(
            clap::Arg::new("schema")
                .help("Schema file, or - for standard input")
                .value_name("SCHEMA")
                .required(true),
        )
        .arg(
            clap::Arg::new("visible")
                .long("visible")
                .help("Only include fields that are visible for the default values")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config_with_format(matches)?;
    let output = config.output.clone();

    let app = utils::create_app(config);
    let source = utils::required_value(matches, "schema")?;
    let schema = utils::load_valid_schema(&app, source).await?;

    let mut values = default_values(&schema.fields);
    if matches.get_flag("visible") {
        let shown: Vec<String> = visible_fields(&schema.fields, &values)
            .iter()
            .map(|f| f.property_key.clone())
            .collect();
        values = values
            .into_iter()
            .filter(|(key, _)| shown.contains(key))
            .collect();
    }

    println!("{}", output.render(&Value::Object(values))?);

    Ok(())
}
