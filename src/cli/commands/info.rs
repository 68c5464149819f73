//! Info command implementation

use crate::schema::FieldType;
use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show the DSL reference")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("listdsl - List Schema DSL toolkit");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));

    if detailed {
        println!("\nField types:");
        for field_type in FieldType::ALL {
            println!("  - {field_type}");
        }
        println!("\nFlags: required, hidden");
        println!("Modifiers: label= default= help= placeholder= order=");
        println!("Text rules: min_length= max_length= pattern=");
        println!("Number rules: min= max= step=");
        println!("Date rules: min= max=");
        println!("Choice rules: options=[a,b,\"c d\"]");
        println!("Conditions (visible_if=): k=v k!=v k~=v k!~=v k>v k<v k>=v k<=v empty(k) present(k)");
    }

    Ok(())
}
