use color_eyre::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use tripkit::cli::{parse_args, run_cli_command, version_line, CliCommand, USAGE};
use tripkit::client::ApiClient;
use tripkit::config::ClientConfig;
use tripkit::error::ApiError;

fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    // Handle --version and --help before any initialization
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        _ => {}
    }

    color_eyre::install()?;

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "tripkit=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::debug!(base_url = %config.base_url, "Loaded configuration");

    let runtime = tokio::runtime::Runtime::new()?;
    let client = ApiClient::from_config(config)?;
    let result = runtime.block_on(async {
        let mut stdout = std::io::stdout();
        run_cli_command(command, &client, &mut stdout).await
    });

    if let Err(report) = &result {
        if report
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::requires_reauth)
        {
            eprintln!("Run `tripkit login <email>` to sign in again.");
        }
    }
    result
}
