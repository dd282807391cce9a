//! `tutorial` command-line entry point.

mod args;

use std::process::ExitCode;

use args::{Cli, Commands};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tutorial_cli::{ClientError, TutorialClient};
use tutorial_core::{init_logging, TutorialDraft, TutorialPatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    if let Err(err) = init_logging(level, None) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    let client = TutorialClient::new(cli.base_url);
    match execute(&client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(client: &TutorialClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::List { title: Some(title) } => print(&client.find_by_title(&title).await?),
        Commands::List { title: None } => print(&client.get_all().await?),
        Commands::Published => print(&client.find_published().await?),
        Commands::Get { id } => print(&client.get(id).await?),
        Commands::Create {
            title,
            description,
            published,
        } => {
            let draft = TutorialDraft {
                title: Some(title),
                description,
                published: Some(published),
            };
            print(&client.create(&draft).await?)
        }
        Commands::Update {
            id,
            title,
            description,
            published,
        } => {
            let patch = TutorialPatch {
                title,
                description,
                published,
            };
            print_message(client.update(id, &patch).await?)
        }
        Commands::Delete { id } => print_message(client.delete(id).await?),
        Commands::DeleteAll => print_message(client.delete_all().await?),
        Commands::Ping => print_message(client.welcome().await?),
    }
    Ok(())
}

fn print<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("failed to render response: {err}"),
    }
}

fn print_message(message: String) {
    print(&json!({ "message": message }));
}
