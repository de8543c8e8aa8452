//! Model, View and Controller registries wired together by notifications.
//!
//! Application code registers proxies (data), mediators (view components)
//! and commands (per-notification handlers) through the [`Facade`]; a
//! notification sent through it reaches every interested mediator and
//! command, one at a time, in registration order.

mod controller;
mod facade;
mod interfaces;
mod model;
mod observer;
mod proxy;
mod singleton;
mod view;

pub use controller::Controller;
pub use facade::Facade;
pub use interfaces::{
    command_factory, Command, CommandFactory, Mediator, NotificationHandler, Proxy,
};
pub use model::Model;
pub use observer::Observer;
pub use proxy::DataProxy;
pub use shared::{Body, ContextId, MvcError, Notification, RegistryKind};
pub use view::View;
