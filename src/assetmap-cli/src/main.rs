mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "assetmap=debug,assetmap_cli=debug"
    } else {
        "assetmap=info,assetmap_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => {
            commands::run::handle(&args)?;
        }

        Commands::Check { map, json } => {
            commands::check::handle(&map, json)?;
        }

        Commands::Crop { input, output } => {
            commands::images::crop(&input, &output)?;
        }

        Commands::Trim { input, output } => {
            commands::images::trim(&input, &output)?;
        }

        Commands::Scale {
            input,
            output,
            scale,
            filter,
        } => {
            commands::images::scale(&input, &output, &scale, filter.into())?;
        }

        Commands::Configure {
            decompiler,
            launcher,
            zoom,
            show,
        } => {
            commands::configure::handle(decompiler, launcher, zoom, show)?;
        }
    }

    Ok(())
}
