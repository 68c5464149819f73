//! listdsl CLI binary

use anyhow::Result;

use listdsl::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listdsl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = CliApp::app().get_matches();

    CliApp::run(&matches).await
}
