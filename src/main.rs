use anyhow::Result;
use clap::Parser;

use calricula_workflow::api::EntityRef;
use calricula_workflow::cli::commands::{
    api_client, history::HistoryCommand, progress::ProgressCommand, show::ShowCommand,
    statuses::StatusesCommand, Command,
};
use calricula_workflow::cli::{Cli, Commands};
use calricula_workflow::workflow::ProgressOptions;
use calricula_workflow::{api_metrics, init_telemetry, CalriculaConfig};

fn load_config(cli: &Cli) -> Result<CalriculaConfig> {
    match &cli.config {
        Some(path) => {
            CalriculaConfig::load_env_file()?;
            CalriculaConfig::load_from_file(path)
        }
        None => Ok(calricula_workflow::config()?.clone()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_telemetry(&config.observability)?;

    let json = cli.json;
    let command = cli.command;

    let result = tokio::runtime::Runtime::new()?.block_on(async move {
        match command {
            Commands::Statuses => StatusesCommand::new().with_json(json).execute().await,
            Commands::Progress {
                status,
                compact,
                hide_labels,
            } => {
                let options = ProgressOptions {
                    show_labels: config.display.show_labels && !hide_labels,
                    compact: config.display.compact || compact,
                };
                ProgressCommand::new(status, options)
                    .with_json(json)
                    .execute()
                    .await
            }
            Commands::History { kind, id } => {
                let api = api_client(&config)?;
                HistoryCommand::new(EntityRef::new(kind, id), api)
                    .with_json(json)
                    .execute()
                    .await
            }
            Commands::Show { kind, id, compact } => {
                let api = api_client(&config)?;
                let options = ProgressOptions {
                    show_labels: config.display.show_labels,
                    compact: config.display.compact || compact,
                };
                ShowCommand::new(EntityRef::new(kind, id), api, options)
                    .with_json(json)
                    .execute()
                    .await
            }
        }
    });

    api_metrics().log_stats();
    result
}
