use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use mvc_core::{Body, Facade};
use serde_json::json;
use tracing::info;

mod config;
mod inventory;

use config::{load_settings, persist_items, Settings};
use inventory::{ConsoleMediator, InventoryAction};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "demo.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Add {
        #[arg(required = true)]
        items: Vec<String>,
    },
    Remove {
        item: String,
    },
    Clear,
}

impl Command {
    fn into_notification(self) -> (InventoryAction, Option<Body>) {
        match self {
            Command::List => (InventoryAction::List, None),
            Command::Add { items } => (InventoryAction::Add, Some(Body::new(json!(items)))),
            Command::Remove { item } => (InventoryAction::Remove, Some(Body::new(json!(item)))),
            Command::Clear => (InventoryAction::Clear, None),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();

    let facade = Facade::get_instance();
    inventory::startup(&facade, &settings, Arc::new(ConsoleMediator::stdout()));

    let outcome = run(&facade, &settings, &cli.config, cli.command).await;

    Facade::dispose().await;
    outcome
}

/// Dispatches `command` and, for actions that change the inventory, writes
/// the resulting items back to the settings file.
async fn run(facade: &Facade, settings: &Settings, config: &Path, command: Command) -> Result<()> {
    let (action, body) = command.into_notification();
    facade
        .send_notification(action.notification_name(), body, None)
        .await?;

    if action.mutates() {
        let items = inventory::current_items(facade, &settings.inventory_name)?;
        persist_items(config, &items)?;
        info!(path = %config.display(), items = items.len(), "inventory saved");
    }
    Ok(())
}
