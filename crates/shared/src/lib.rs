pub mod domain;
pub mod error;
pub mod notification;

pub use domain::{ContextId, RegistryKind};
pub use error::MvcError;
pub use notification::{Body, Notification};
