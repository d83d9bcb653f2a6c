//! Shelf CLI - keep small shell scripts synced across machines.

mod cli;
mod commands;
mod error;

use std::io::IsTerminal;

use clap::{CommandFactory, Parser};

use crate::cli::{AuthCommands, Cli, Commands, ConfigCommands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelf=info".parse().expect("valid directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { json }) => commands::list::run(json).await?,
        Some(Commands::Add {
            name,
            description,
            script_type,
            file,
            no_install,
        }) => {
            commands::add::run(
                &name,
                description,
                script_type.into(),
                file.as_deref(),
                no_install,
            )
            .await?;
        }
        Some(Commands::Edit { name, local }) => commands::edit::run(&name, local).await?,
        Some(Commands::Remove { name, yes }) => commands::remove::run(&name, yes).await?,
        Some(Commands::Install { name }) => commands::install::run(&name).await?,
        Some(Commands::Uninstall { name }) => commands::install::run_uninstall(&name)?,
        Some(Commands::Push { name }) => commands::push::run(name.as_deref()).await?,
        Some(Commands::Pull { name }) => commands::pull::run(name.as_deref()).await?,
        Some(Commands::Sync) => commands::sync::run().await?,
        Some(Commands::Run { name, args }) => commands::run::run(&name, &args).await?,
        Some(Commands::Source { name }) => commands::source_cmd::run(&name).await?,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => commands::config_cmd::show()?,
            ConfigCommands::SetUrl { url } => commands::config_cmd::set_url(&url)?,
            ConfigCommands::Path => commands::config_cmd::path()?,
        },
        Some(Commands::Auth { command }) => match command {
            AuthCommands::SetKey { key } => commands::auth::set_key(&key)?,
            AuthCommands::Status => commands::auth::status().await?,
        },
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run(shell, output.as_deref())?;
        }
        None => {
            if std::io::stdin().is_terminal() {
                commands::menu::run().await?;
            } else {
                Cli::command().print_help()?;
                println!();
            }
        }
    }

    Ok(())
}
