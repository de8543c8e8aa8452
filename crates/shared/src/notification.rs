use std::{fmt, sync::Arc};

use parking_lot::{RwLock, RwLockReadGuard};
use serde_json::Value;

/// Shared, mutable notification payload.
///
/// Clones share the same value: a handler writing into the body of the
/// notification it receives is observed by whoever sent it.
#[derive(Debug, Clone, Default)]
pub struct Body(Arc<RwLock<Value>>);

impl Body {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read()
    }

    /// Copy of the current value.
    pub fn snapshot(&self) -> Value {
        self.0.read().clone()
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut *self.0.write())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    name: String,
    body: Option<Body>,
    notification_type: Option<String>,
}

impl Notification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            notification_type: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_type(mut self, notification_type: impl Into<String>) -> Self {
        self.notification_type = Some(notification_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    pub fn notification_type(&self) -> Option<&str> {
        self.notification_type.as_deref()
    }

    pub fn set_type(&mut self, notification_type: Option<String>) {
        self.notification_type = notification_type;
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Notification Name: {}", self.name)?;
        match &self.body {
            Some(body) => writeln!(f, "Body: {}", *body.read())?,
            None => writeln!(f, "Body: null")?,
        }
        write!(
            f,
            "Type: {}",
            self.notification_type.as_deref().unwrap_or("null")
        )
    }
}
