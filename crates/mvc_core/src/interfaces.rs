//! Hooks implemented by application code and invoked by the registries.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use shared::Notification;

/// Receiver side of an [`crate::Observer`].
#[async_trait]
pub trait NotificationHandler: Send + Sync {
    async fn handle(&self, notification: &Notification) -> Result<()>;
}

#[async_trait]
pub trait Mediator: Send + Sync {
    fn mediator_name(&self) -> &str;

    /// Notification names this mediator wants delivered to
    /// [`Mediator::handle_notification`].
    ///
    /// Queried once when the mediator is registered and again when it is
    /// removed; only the names reported at removal time are unsubscribed.
    fn list_notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    async fn handle_notification(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }

    fn on_register(&self) {}

    fn on_remove(&self) {}
}

pub trait Proxy: Send + Sync {
    fn proxy_name(&self) -> &str;

    fn data(&self) -> Option<Value> {
        None
    }

    /// Proxies without storage ignore writes.
    fn set_data(&self, _data: Option<Value>) {}

    fn on_register(&self) {}

    fn on_remove(&self) {}
}

#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, notification: &Notification) -> Result<()>;
}

/// Builds a fresh command for every execution.
pub type CommandFactory = Arc<dyn Fn() -> Box<dyn Command> + Send + Sync>;

pub fn command_factory<C>() -> CommandFactory
where
    C: Command + Default + 'static,
{
    Arc::new(|| Box::new(C::default()) as Box<dyn Command>)
}
