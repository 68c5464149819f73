//! Check command implementation

use crate::cli::utils;
use crate::{OutputFormat, SchemaReport};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("check")
        .about("Parse and validate schema files")
        .arg(utils::config_arg())
        .arg(utils::format_arg())
        .arg(
            clap::Arg::new("paths")
                .help("Schema files or directories (defaults to the configured schema paths)")
                .value_name("PATH")
                .num_args(0..),
        )
        .arg(
            clap::Arg::new("strict")
                .long("strict")
                .help("Treat warnings as errors")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = utils::load_config_with_format(matches)?;

    if matches.get_flag("strict") {
        config.validation.strict = true;
    }
    if let Some(paths) = matches.get_many::<String>("paths") {
        config.schema_paths = paths.map(PathBuf::from).collect();
    }

    info!("Checking schemas in {:?}", config.schema_paths);

    let output = config.output.clone();
    let app = utils::create_app(config);
    let reports = app.check_all(&std::env::current_dir()?)?;

    if reports.is_empty() {
        println!("No schema files found.");
        return Ok(());
    }

    match output.format {
        OutputFormat::Text => print_reports(&reports),
        _ => println!("{}", output.render(&reports)?),
    }

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} schema file(s) failed checks",
            reports.len()
        ));
    }

    Ok(())
}

fn print_reports(reports: &[SchemaReport]) {
    for report in reports {
        let path = report.path.display();

        if !report.parse_errors.is_empty() {
            println!("FAIL  {path}");
            for error in &report.parse_errors {
                println!("      {error}");
            }
            continue;
        }

        let Some(summary) = &report.summary else {
            continue;
        };

        if summary.is_valid {
            println!("ok    {path} ({} fields)", summary.stats.field_count);
        } else {
            println!("FAIL  {path}");
        }
        for error in &summary.errors {
            println!("      error: {error}");
        }
        for warning in &summary.warnings {
            println!("      warning: {warning}");
        }
        if report.canonical == Some(false) {
            println!("      note: not in canonical form (run `listdsl fmt --write`)");
        }
    }
}
