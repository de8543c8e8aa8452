use thiserror::Error;

use crate::domain::RegistryKind;

#[derive(Debug, Error)]
pub enum MvcError {
    #[error("{0} singleton is already constructed; use get_instance() instead")]
    AlreadyInitialized(RegistryKind),
}

