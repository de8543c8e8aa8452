//! Observer lists and mediator registration.

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared::{ContextId, MvcError, Notification, RegistryKind};
use tracing::{debug, warn};

use crate::{
    interfaces::{Mediator, NotificationHandler},
    observer::Observer,
    singleton::Singleton,
};

static INSTANCE: Singleton<View> = Singleton::new(RegistryKind::View);

/// Routes notifications to the mediator's `handle_notification`.
struct MediatorHandler(Arc<dyn Mediator>);

#[async_trait]
impl NotificationHandler for MediatorHandler {
    async fn handle(&self, notification: &Notification) -> Result<()> {
        self.0.handle_notification(notification).await
    }
}

pub struct View {
    // A name is present only while it has at least one observer.
    observer_map: RwLock<HashMap<String, Vec<Arc<Observer>>>>,
    mediator_map: RwLock<HashMap<String, Arc<dyn Mediator>>>,
}

impl View {
    pub(crate) fn new() -> Self {
        Self {
            observer_map: RwLock::new(HashMap::new()),
            mediator_map: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_instance() -> Arc<View> {
        INSTANCE.get_or_init(|| Arc::new(Self::new()))
    }

    /// Constructs the singleton, failing if one is already live.
    pub fn initialize() -> Result<Arc<View>, MvcError> {
        INSTANCE.try_init(|| Arc::new(Self::new()))
    }

    /// Removes every mediator from the live instance, if any, and empties
    /// the slot.
    ///
    /// Observers registered directly, including those of a Controller bound
    /// to this view, are left in place. A Controller or Facade built before
    /// the dispose keeps dispatching through the view it was built with; the
    /// next `get_instance` here constructs an unrelated view.
    pub async fn dispose() {
        let Some(view) = INSTANCE.current() else {
            return;
        };

        for name in view.mediator_names() {
            view.remove_mediator(&name);
        }
        INSTANCE.clear();
    }

    pub fn register_observer(&self, notification_name: &str, observer: Arc<Observer>) {
        let mut observer_map = self.observer_map.write();
        let observers = observer_map.entry(notification_name.to_string()).or_default();
        observers.push(observer);
        debug!(
            notification = notification_name,
            observers = observers.len(),
            "registered observer"
        );
    }

    /// Drops the most recently registered observer for `notification_name`
    /// whose context is `context`.
    pub fn remove_observer(&self, notification_name: &str, context: ContextId) {
        let mut observer_map = self.observer_map.write();
        let Some(observers) = observer_map.get_mut(notification_name) else {
            return;
        };

        if let Some(index) = observers
            .iter()
            .rposition(|observer| observer.compare_context(context))
        {
            observers.remove(index);
            debug!(notification = notification_name, "removed observer");
        }

        if observers.is_empty() {
            observer_map.remove(notification_name);
        }
    }

    /// Delivers `notification` to each of its observers in registration
    /// order, awaiting each before starting the next.
    ///
    /// The observer list is captured before the first handler runs; changes
    /// made by handlers apply to later notifications. The first handler error
    /// aborts the dispatch and is returned as-is.
    pub async fn notify_observers(&self, notification: &Notification) -> Result<()> {
        let observers = {
            let observer_map = self.observer_map.read();
            match observer_map.get(notification.name()) {
                Some(observers) => observers.clone(),
                None => return Ok(()),
            }
        };

        debug!(
            notification = notification.name(),
            observers = observers.len(),
            "dispatching notification"
        );
        for observer in observers {
            observer.notify(notification).await?;
        }
        Ok(())
    }

    /// Registers `mediator` and subscribes it to its interests.
    ///
    /// A second mediator under an already registered name is ignored.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) {
        let name = mediator.mediator_name().to_string();
        {
            let mut mediator_map = self.mediator_map.write();
            if mediator_map.contains_key(&name) {
                warn!(mediator = %name, "mediator already registered; ignoring");
                return;
            }
            mediator_map.insert(name.clone(), Arc::clone(&mediator));
        }

        let interests = mediator.list_notification_interests();
        if !interests.is_empty() {
            // One observer shared by every interest.
            let observer = Arc::new(Observer::new(
                Arc::new(MediatorHandler(Arc::clone(&mediator))),
                ContextId::of(&mediator),
            ));
            for interest in &interests {
                self.register_observer(interest, Arc::clone(&observer));
            }
        }

        debug!(mediator = %name, interests = interests.len(), "registered mediator");
        mediator.on_register();
    }

    pub fn retrieve_mediator(&self, mediator_name: &str) -> Option<Arc<dyn Mediator>> {
        self.mediator_map.read().get(mediator_name).cloned()
    }

    pub fn has_mediator(&self, mediator_name: &str) -> bool {
        self.mediator_map.read().contains_key(mediator_name)
    }

    pub fn remove_mediator(&self, mediator_name: &str) -> Option<Arc<dyn Mediator>> {
        let mediator = self.retrieve_mediator(mediator_name)?;

        let context = ContextId::of(&mediator);
        for interest in mediator.list_notification_interests() {
            self.remove_observer(&interest, context);
        }
        self.mediator_map.write().remove(mediator_name);

        debug!(mediator = mediator_name, "removed mediator");
        mediator.on_remove();
        Some(mediator)
    }

    pub fn mediator_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mediator_map.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn observer_count(&self, notification_name: &str) -> usize {
        self.observer_map
            .read()
            .get(notification_name)
            .map_or(0, Vec::len)
    }

    #[cfg(test)]
    pub(crate) fn observers_for(&self, notification_name: &str) -> Vec<Arc<Observer>> {
        self.observer_map
            .read()
            .get(notification_name)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
