use parking_lot::RwLock;
use serde_json::Value;

use crate::interfaces::Proxy;

/// A proxy that does nothing but hold a JSON value.
pub struct DataProxy {
    name: String,
    data: RwLock<Option<Value>>,
}

impl DataProxy {
    pub const DEFAULT_NAME: &'static str = "Proxy";

    pub fn new(name: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            name: name.into(),
            data: RwLock::new(data),
        }
    }
}

impl Default for DataProxy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NAME, None)
    }
}

impl Proxy for DataProxy {
    fn proxy_name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> Option<Value> {
        self.data.read().clone()
    }

    fn set_data(&self, data: Option<Value>) {
        *self.data.write() = data;
    }
}
