use std::sync::Arc;

use anyhow::Result;
use shared::{Body, MvcError, Notification, RegistryKind};

use crate::{
    controller::Controller,
    interfaces::{Command, CommandFactory, Mediator, Proxy},
    model::Model,
    singleton::Singleton,
    view::View,
};

static INSTANCE: Singleton<Facade> = Singleton::new(RegistryKind::Facade);

/// Single entry point over the Model, View and Controller singletons.
pub struct Facade {
    model: Arc<Model>,
    view: Arc<View>,
    controller: Arc<Controller>,
}

impl Facade {
    fn new() -> Self {
        Self {
            model: Model::get_instance(),
            view: View::get_instance(),
            controller: Controller::get_instance(),
        }
    }

    pub fn get_instance() -> Arc<Facade> {
        INSTANCE.get_or_init(|| Arc::new(Self::new()))
    }

    pub fn initialize() -> Result<Arc<Facade>, MvcError> {
        INSTANCE.try_init(|| Arc::new(Self::new()))
    }

    /// Tears down the View, Controller and Model, in that order, then the
    /// facade itself. Safe to call when nothing is constructed.
    pub async fn dispose() {
        View::dispose().await;
        Controller::dispose().await;
        Model::dispose().await;
        INSTANCE.clear();
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    pub fn register_command(&self, notification_name: &str, factory: CommandFactory) {
        self.controller.register_command(notification_name, factory);
    }

    pub fn register_command_type<C>(&self, notification_name: &str)
    where
        C: Command + Default + 'static,
    {
        self.controller
            .register_command_type::<C>(notification_name);
    }

    pub fn remove_command(&self, notification_name: &str) -> Option<CommandFactory> {
        self.controller.remove_command(notification_name)
    }

    pub fn has_command(&self, notification_name: &str) -> bool {
        self.controller.has_command(notification_name)
    }

    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        self.model.register_proxy(proxy);
    }

    pub fn retrieve_proxy(&self, proxy_name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.retrieve_proxy(proxy_name)
    }

    pub fn remove_proxy(&self, proxy_name: &str) -> Option<Arc<dyn Proxy>> {
        self.model.remove_proxy(proxy_name)
    }

    pub fn has_proxy(&self, proxy_name: &str) -> bool {
        self.model.has_proxy(proxy_name)
    }

    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) {
        self.view.register_mediator(mediator);
    }

    pub fn retrieve_mediator(&self, mediator_name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.retrieve_mediator(mediator_name)
    }

    pub fn remove_mediator(&self, mediator_name: &str) -> Option<Arc<dyn Mediator>> {
        self.view.remove_mediator(mediator_name)
    }

    pub fn has_mediator(&self, mediator_name: &str) -> bool {
        self.view.has_mediator(mediator_name)
    }

    pub async fn send_notification(
        &self,
        notification_name: &str,
        body: Option<Body>,
        notification_type: Option<&str>,
    ) -> Result<()> {
        let mut notification = Notification::new(notification_name);
        notification.set_body(body);
        notification.set_type(notification_type.map(str::to_string));
        self.notify_observers(&notification).await
    }

    pub async fn notify_observers(&self, notification: &Notification) -> Result<()> {
        self.view.notify_observers(notification).await
    }
}

#[cfg(test)]
#[path = "tests/facade_tests.rs"]
mod tests;
