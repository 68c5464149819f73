//! Stats command implementation

use crate::cli::utils;
use crate::validation::{summarize, SchemaSummary};
use crate::OutputFormat;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("stats")
        .about("Show field statistics for schema files")
        .arg(utils::config_arg())
        .arg(utils::format_arg())
        .arg(
            clap::Arg::new("schemas")
                .help("Schema files, or - for standard input")
                .value_name("SCHEMA")
                .num_args(1..)
                .required(true),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config_with_format(matches)?;
    let output = config.output.clone();
    let app = utils::create_app(config);

    let mut summaries = Vec::new();
    for source in matches.get_many::<String>("schemas").into_iter().flatten() {
        let checked = utils::load_checked(&app, source).await?;
        summaries.push(summarize(&checked.schema, app.schema_validator()));
    }

    match output.format {
        OutputFormat::Text => summaries.iter().for_each(print_summary),
        _ => println!("{}", output.render(&summaries)?),
    }

    Ok(())
}

fn print_summary(summary: &SchemaSummary) {
    let stats = &summary.stats;

    println!("{}", summary.name);
    println!("  Fields: {}", stats.field_count);
    println!("  Required: {}", stats.required_field_count);
    println!("  Optional: {}", stats.optional_field_count);
    println!("  Conditional: {}", stats.conditional_field_count);
    println!("  Types:");
    for (field_type, count) in &stats.field_types {
        println!("    {field_type}: {count}");
    }
    println!(
        "  Valid: {}{}",
        if summary.is_valid { "yes" } else { "no" },
        if summary.warnings.is_empty() {
            String::new()
        } else {
            format!(" ({} warning(s))", summary.warnings.len())
        }
    );
}
