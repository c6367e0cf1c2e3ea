mod cli;
mod commands;
mod config;
mod export;
mod source;

use anyhow::Result;
use clap::Parser;

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    match cli.command {
        Commands::Fetch { url, output } => {
            commands::fetch::handle(url, &output)?;
        }

        Commands::Parse {
            input,
            threshold,
            keep_slaves,
            nodes,
            images,
        } => {
            commands::parse::handle(input.as_deref(), threshold, keep_slaves, &nodes, &images)?;
        }

        Commands::Inspect { input } => {
            commands::inspect::handle(input.as_deref())?;
        }

        Commands::Db { db, command } => match command {
            DbCommand::Init => commands::db::init(&db)?,
            DbCommand::Load {
                input,
                from_csv,
                threshold,
                keep_slaves,
            } => commands::db::load(
                &db,
                input.as_deref(),
                from_csv.as_deref(),
                threshold,
                keep_slaves,
            )?,
            DbCommand::Stats => commands::db::stats(&db)?,
            DbCommand::Clear => commands::db::clear(&db)?,
        },

        Commands::Configure {
            source_url,
            fallback_url,
            show,
        } => {
            commands::configure::handle(source_url, fallback_url, show)?;
        }
    }

    Ok(())
}
