//! Fmt command implementation

use crate::cli::utils;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use tracing::{debug, info};

pub fn command() -> Command {
    Command::new("fmt")
        .about("Rewrite schema files in canonical form")
        .arg(utils::config_arg())
        .arg(
            clap::Arg::new("files")
                .help("Schema files, or - for standard input")
                .value_name("FILE")
                .num_args(1..)
                .required(true),
        )
        .arg(
            clap::Arg::new("write")
                .short('w')
                .long("write")
                .help("Write the canonical text back to each file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("check")
                .long("check")
                .help("Fail if any file is not in canonical form")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("write"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::load_config(matches)?;
    let app = utils::create_app(config);

    let write = matches.get_flag("write");
    let check = matches.get_flag("check");
    let files: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();

    let mut unformatted = Vec::new();

    for file in files {
        let text = utils::read_input(file).await?;
        let canonical = app.format_text(&text, file)?;

        if check {
            if canonical != text {
                println!("{file} is not in canonical form");
                unformatted.push(file.clone());
            } else {
                debug!("{file} is canonical");
            }
        } else if write && file != "-" {
            if canonical != text {
                tokio::fs::write(file, &canonical).await?;
                info!("Formatted {file}");
                println!("Formatted {file}");
            }
        } else {
            print!("{canonical}");
        }
    }

    if !unformatted.is_empty() {
        return Err(anyhow!(
            "{} file(s) need formatting",
            unformatted.len()
        ));
    }

    Ok(())
}
