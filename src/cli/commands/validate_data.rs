//! Validate-data command implementation

use crate::cli::utils;
use crate::{OutputFormat, RecordReport};
use anyhow::{anyhow, Context, Result};
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate-data")
        .about("Validate JSON data rows against a schema")
        .arg(utils::config_arg())
        .arg(utils::format_arg())
        .arg(
            clap::Arg::new("schema")
                .help("Schema file")
                .value_name("SCHEMA")
                .required(true),
        )
        .arg(
            clap::Arg::new("data")
                .help("JSON file holding one object or an array of objects, or - for standard input")
                .value_name("DATA")
                .required(true),
        )
        .arg(
            clap::Arg::new("deny-unknown")
                .long("deny-unknown")
                .help("Reject keys that the schema does not declare")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = utils::load_config_with_format(matches)?;
    if matches.get_flag("deny-unknown") {
        config.validation.allow_unknown_fields = false;
    }
    let output = config.output.clone();

    let app = utils::create_app(config);
    let schema_source = utils::required_value(matches, "schema")?;
    let data_source = utils::required_value(matches, "data")?;

    let schema = utils::load_valid_schema(&app, schema_source).await?;
    let data_text = utils::read_input(data_source).await?;
    let data: serde_json::Value = serde_json::from_str(&data_text)
        .with_context(|| format!("{data_source} is not valid JSON"))?;

    info!("Validating {data_source} against schema '{}'", schema.name);
    let reports = app.validate_records(&schema, &data)?;

    match output.format {
        OutputFormat::Text => print_reports(&reports),
        _ => println!("{}", output.render(&reports)?),
    }

    let failed = reports.iter().filter(|r| !r.result.is_valid).count();
    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} record(s) failed validation",
            reports.len()
        ));
    }

    Ok(())
}

fn print_reports(reports: &[RecordReport]) {
    for report in reports {
        if report.result.is_valid {
            println!("record {}: ok", report.index);
            continue;
        }
        println!("record {}: {} error(s)", report.index, report.result.errors.len());
        for error in &report.result.errors {
            println!("  {error}");
        }
    }
}
