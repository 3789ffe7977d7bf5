use clap::Parser;
use sgtcs_cli::{Cli, CliError, Context, init_logger, run};
use sgtcs_client::render_catalog;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logger(cli.options.verbose);

    match execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("sgtcs: {}", e);
            if let Some(catalog) = e.catalog_hint() {
                eprintln!("Choose one from the list available below:");
                eprint!("{}", render_catalog(catalog));
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn execute(cli: &Cli) -> Result<(), CliError> {
    let base_dir = std::env::current_dir()
        .map_err(|e| CliError::Config(format!("cannot determine working directory: {}", e)))?;
    let ctx = Context::resolve(&cli.options, base_dir)?;
    tracing::debug!(?ctx, "resolved configuration");

    let outcome = run(&cli.command, &ctx).await?;
    outcome.print(&mut std::io::stdout().lock())?;
    Ok(())
}
