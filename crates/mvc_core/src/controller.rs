use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::{ContextId, MvcError, Notification, RegistryKind};
use tracing::debug;

use crate::{
    interfaces::{command_factory, Command, CommandFactory, NotificationHandler},
    observer::Observer,
    singleton::Singleton,
    view::View,
};

static INSTANCE: Singleton<Controller> = Singleton::new(RegistryKind::Controller);

struct CommandDispatch(Weak<Controller>);

#[async_trait]
impl NotificationHandler for CommandDispatch {
    async fn handle(&self, notification: &Notification) -> Result<()> {
        match self.0.upgrade() {
            Some(controller) => controller.execute_command(notification).await,
            None => Ok(()),
        }
    }
}

/// Maps notification names to command factories.
///
/// The controller subscribes to the View once per command name, with a single
/// observer shared across all names.
pub struct Controller {
    view: Arc<View>,
    command_map: RwLock<HashMap<String, CommandFactory>>,
    observer: Arc<Observer>,
}

impl Controller {
    pub(crate) fn new(view: Arc<View>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            view,
            command_map: RwLock::new(HashMap::new()),
            observer: Arc::new(Observer::new(
                Arc::new(CommandDispatch(this.clone())),
                ContextId::of_weak(this),
            )),
        })
    }

    pub fn get_instance() -> Arc<Controller> {
        INSTANCE.get_or_init(|| Self::new(View::get_instance()))
    }

    pub fn initialize() -> Result<Arc<Controller>, MvcError> {
        INSTANCE.try_init(|| Self::new(View::get_instance()))
    }

    pub async fn dispose() {
        let Some(controller) = INSTANCE.current() else {
            return;
        };

        for name in controller.command_names() {
            controller.remove_command(&name);
        }
        INSTANCE.clear();
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    /// Runs a freshly built command for `notification`, if one is mapped.
    pub async fn execute_command(&self, notification: &Notification) -> Result<()> {
        let factory = self.command_map.read().get(notification.name()).cloned();
        let Some(factory) = factory else {
            return Ok(());
        };

        debug!(notification = notification.name(), "executing command");
        let command = factory();
        command.execute(notification).await
    }

    pub fn register_command(&self, notification_name: &str, factory: CommandFactory) {
        let is_new = !self.command_map.read().contains_key(notification_name);
        if is_new {
            self.view
                .register_observer(notification_name, Arc::clone(&self.observer));
        }

        self.command_map
            .write()
            .insert(notification_name.to_string(), factory);
        debug!(
            notification = notification_name,
            replaced = !is_new,
            "registered command"
        );
    }

    pub fn register_command_type<C>(&self, notification_name: &str)
    where
        C: Command + Default + 'static,
    {
        self.register_command(notification_name, command_factory::<C>());
    }

    pub fn retrieve_command(&self, notification_name: &str) -> Option<CommandFactory> {
        self.command_map.read().get(notification_name).cloned()
    }

    pub fn has_command(&self, notification_name: &str) -> bool {
        self.command_map.read().contains_key(notification_name)
    }

    /// Unsubscribes from the View and drops the mapping for
    /// `notification_name`.
    pub fn remove_command(&self, notification_name: &str) -> Option<CommandFactory> {
        if !self.has_command(notification_name) {
            return None;
        }

        self.view
            .remove_observer(notification_name, self.observer.context());
        let removed = self.command_map.write().remove(notification_name);
        debug!(notification = notification_name, "removed command");
        removed
    }

    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.command_map.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
