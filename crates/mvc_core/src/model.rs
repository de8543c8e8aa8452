use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use shared::{MvcError, RegistryKind};
use tracing::debug;

use crate::{interfaces::Proxy, singleton::Singleton};

static INSTANCE: Singleton<Model> = Singleton::new(RegistryKind::Model);

pub struct Model {
    proxy_map: RwLock<HashMap<String, Arc<dyn Proxy>>>,
}

impl Model {
    pub(crate) fn new() -> Self {
        Self {
            proxy_map: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_instance() -> Arc<Model> {
        INSTANCE.get_or_init(|| Arc::new(Self::new()))
    }

    pub fn initialize() -> Result<Arc<Model>, MvcError> {
        INSTANCE.try_init(|| Arc::new(Self::new()))
    }

    pub async fn dispose() {
        let Some(model) = INSTANCE.current() else {
            return;
        };

        for name in model.proxy_names() {
            model.remove_proxy(&name);
        }
        INSTANCE.clear();
    }

    /// Stores `proxy` under its name, replacing any previous proxy of that
    /// name, then calls its `on_register` hook.
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        let name = proxy.proxy_name().to_string();
        let replaced = self
            .proxy_map
            .write()
            .insert(name.clone(), Arc::clone(&proxy))
            .is_some();

        debug!(proxy = %name, replaced, "registered proxy");
        proxy.on_register();
    }

    pub fn retrieve_proxy(&self, proxy_name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxy_map.read().get(proxy_name).cloned()
    }

    pub fn has_proxy(&self, proxy_name: &str) -> bool {
        self.proxy_map.read().contains_key(proxy_name)
    }

    pub fn remove_proxy(&self, proxy_name: &str) -> Option<Arc<dyn Proxy>> {
        let proxy = self.proxy_map.write().remove(proxy_name)?;

        debug!(proxy = proxy_name, "removed proxy");
        proxy.on_remove();
        Some(proxy)
    }

    pub fn proxy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.proxy_map.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "tests/model_tests.rs"]
mod tests;
