mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use catalog_config::Config;
use catalog_core::Catalog;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands never touch the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Pages { kind } => commands::pages::handle(kind, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "catalog", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let catalog = build_catalog(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &catalog, &cli.global).await
        }
    }
}

/// Config file and environment first, then command-line overrides.
fn build_catalog(global: &GlobalOpts) -> Result<Catalog, CliError> {
    let mut cfg = catalog_config::load_config()?;
    apply_overrides(&mut cfg, global);

    let runtime = cfg.to_catalog_config()?;
    tracing::debug!(base_url = %runtime.base_url, token_store = %cfg.token_store, "catalog configured");
    Ok(Catalog::new(&runtime, cfg.session_provider())?)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(url) = &global.api_url {
        cfg.api_url = Some(url.clone());
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(secs) = global.timeout {
        cfg.timeout_secs = Some(secs);
    }
}

