//! Inventory proxy, commands and console mediator wired through the facade.

use std::{io::Write, sync::Arc};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use mvc_core::{Body, Command, CommandFactory, DataProxy, Facade, Mediator, Notification, Proxy};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::Settings;

pub const ADD_ITEMS: &str = "AddItems";
pub const REMOVE_ITEM: &str = "RemoveItem";
pub const CLEAR_ITEMS: &str = "ClearItems";
pub const LIST_ITEMS: &str = "ListItems";
pub const INVENTORY_CHANGED: &str = "InventoryChanged";
pub const ITEM_REJECTED: &str = "ItemRejected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryAction {
    Add,
    Remove,
    Clear,
    List,
}

impl InventoryAction {
    pub fn notification_name(self) -> &'static str {
        match self {
            InventoryAction::Add => ADD_ITEMS,
            InventoryAction::Remove => REMOVE_ITEM,
            InventoryAction::Clear => CLEAR_ITEMS,
            InventoryAction::List => LIST_ITEMS,
        }
    }

    /// Whether the action can change the stored inventory.
    pub fn mutates(self) -> bool {
        !matches!(self, InventoryAction::List)
    }

    fn label(self) -> &'static str {
        match self {
            InventoryAction::Add => "add",
            InventoryAction::Remove => "remove",
            InventoryAction::Clear => "clear",
            InventoryAction::List => "list",
        }
    }
}

/// Registers the inventory proxy, the console mediator and one command per
/// [`InventoryAction`].
pub fn startup(facade: &Facade, settings: &Settings, console: Arc<ConsoleMediator>) {
    facade.register_proxy(Arc::new(DataProxy::new(
        settings.inventory_name.clone(),
        Some(json!(settings.initial_items)),
    )));
    facade.register_mediator(console);

    for action in [
        InventoryAction::Add,
        InventoryAction::Remove,
        InventoryAction::Clear,
        InventoryAction::List,
    ] {
        facade.register_command(
            action.notification_name(),
            inventory_command(action, &settings.inventory_name),
        );
    }
}

/// Items currently held by the inventory proxy.
pub fn current_items(facade: &Facade, inventory: &str) -> Result<Vec<String>> {
    let proxy = facade
        .retrieve_proxy(inventory)
        .ok_or_else(|| anyhow!("inventory proxy '{inventory}' is not registered"))?;
    InventoryCommand::items(proxy.as_ref())
}

fn inventory_command(action: InventoryAction, inventory: &str) -> CommandFactory {
    let inventory = inventory.to_string();
    Arc::new(move || {
        Box::new(InventoryCommand {
            action,
            inventory: inventory.clone(),
        }) as Box<dyn Command>
    })
}

struct InventoryCommand {
    action: InventoryAction,
    inventory: String,
}

impl InventoryCommand {
    fn items(proxy: &dyn Proxy) -> Result<Vec<String>> {
        match proxy.data() {
            Some(data) => serde_json::from_value(data)
                .with_context(|| format!("proxy '{}' does not hold a list", proxy.proxy_name())),
            None => Ok(Vec::new()),
        }
    }

    fn requested_items(notification: &Notification) -> Result<Vec<String>> {
        let body = notification
            .body()
            .ok_or_else(|| anyhow!("{} requires a body", notification.name()))?;
        match body.snapshot() {
            Value::String(item) => Ok(vec![item]),
            other => serde_json::from_value(other)
                .with_context(|| format!("{} body must be a string list", notification.name())),
        }
    }
}

#[async_trait]
impl Command for InventoryCommand {
    async fn execute(&self, notification: &Notification) -> Result<()> {
        let facade = Facade::get_instance();
        let proxy = facade
            .retrieve_proxy(&self.inventory)
            .ok_or_else(|| anyhow!("inventory proxy '{}' is not registered", self.inventory))?;
        let mut items = Self::items(proxy.as_ref())?;
        let mut rejected = Vec::new();

        match self.action {
            InventoryAction::Add => {
                for item in Self::requested_items(notification)? {
                    if items.contains(&item) {
                        rejected.push((item, "duplicate"));
                    } else {
                        items.push(item);
                    }
                }
            }
            InventoryAction::Remove => {
                for item in Self::requested_items(notification)? {
                    match items.iter().position(|existing| *existing == item) {
                        Some(index) => {
                            items.remove(index);
                        }
                        None => rejected.push((item, "missing")),
                    }
                }
            }
            InventoryAction::Clear => items.clear(),
            InventoryAction::List => {}
        }

        proxy.set_data(Some(json!(items)));
        debug!(action = self.action.label(), items = items.len(), "inventory updated");

        for (item, reason) in rejected {
            facade
                .send_notification(ITEM_REJECTED, Some(Body::new(json!(item))), Some(reason))
                .await?;
        }
        facade
            .send_notification(
                INVENTORY_CHANGED,
                Some(Body::new(json!(items))),
                Some(self.action.label()),
            )
            .await
    }
}

/// Renders inventory notifications as text lines.
pub struct ConsoleMediator {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleMediator {
    pub const NAME: &'static str = "ConsoleMediator";

    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    fn render(notification: &Notification) -> String {
        let body = notification.body().map(Body::snapshot).unwrap_or_default();
        let kind = notification.notification_type().unwrap_or("-");

        match notification.name() {
            ITEM_REJECTED => format!(
                "rejected {} ({kind})",
                body.as_str().unwrap_or_default()
            ),
            _ => {
                let items: Vec<&str> = body
                    .as_array()
                    .map(|items| items.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                if items.is_empty() {
                    format!("[{kind}] inventory is empty")
                } else {
                    format!("[{kind}] {} item(s): {}", items.len(), items.join(", "))
                }
            }
        }
    }
}

#[async_trait]
impl Mediator for ConsoleMediator {
    fn mediator_name(&self) -> &str {
        Self::NAME
    }

    fn list_notification_interests(&self) -> Vec<String> {
        vec![INVENTORY_CHANGED.to_string(), ITEM_REJECTED.to_string()]
    }

    async fn handle_notification(&self, notification: &Notification) -> Result<()> {
        let line = Self::render(notification);
        writeln!(self.out.lock(), "{line}").context("failed to write inventory output")
    }

    fn on_register(&self) {
        info!(mediator = Self::NAME, "console attached");
    }

    fn on_remove(&self) {
        info!(mediator = Self::NAME, "console detached");
    }
}

#[cfg(test)]
#[path = "tests/inventory_tests.rs"]
mod tests;
