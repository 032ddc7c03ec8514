use clap::Parser;

use svc_bootstrap::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli::load_config(&cli)?;
    cli::init_logger_from_config(&config)?;

    tracing::debug!(
        version = svc_bootstrap::pkg_version(),
        env = %config.env(),
        node_env = %config.node_env(),
        "Configuration resolved"
    );

    cli::execute_command(cli.command(), config).await?;
    Ok(())
}
