use std::{
    fmt,
    sync::{Arc, Weak},
};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(usize);
    };
}

id_newtype!(ContextId);

impl ContextId {
    /// Identity of the allocation behind `value`.
    ///
    /// Two handles compare equal only if they point at the same object, which
    /// is what observer removal matches on. The id does not keep the object
    /// alive: once every strong and weak handle is gone the address may be
    /// reused, so whoever registers an observer under this id must hold a
    /// handle to the object until the observer is removed.
    pub fn of<T: ?Sized>(value: &Arc<T>) -> Self {
        Self(Arc::as_ptr(value).cast::<()>() as usize)
    }

    pub fn of_weak<T: ?Sized>(value: &Weak<T>) -> Self {
        Self(Weak::as_ptr(value).cast::<()>() as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Model,
    View,
    Controller,
    Facade,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistryKind::Model => "model",
            RegistryKind::View => "view",
            RegistryKind::Controller => "controller",
            RegistryKind::Facade => "facade",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_id_tracks_allocation_not_value() {
        let first = Arc::new(7_u32);
        let second = Arc::new(7_u32);

        assert_eq!(ContextId::of(&first), ContextId::of(&Arc::clone(&first)));
        assert_ne!(ContextId::of(&first), ContextId::of(&second));
        assert_eq!(ContextId::of(&first), ContextId::of_weak(&Arc::downgrade(&first)));
    }

    #[test]
    fn context_id_ignores_trait_object_metadata() {
        let concrete: Arc<String> = Arc::new("ctx".into());
        let erased: Arc<dyn fmt::Display + Send + Sync> = concrete.clone();

        assert_eq!(ContextId::of(&concrete), ContextId::of(&erased));
    }

    #[test]
    fn weak_handle_pins_the_identity_after_the_value_drops() {
        let owner = Arc::new(3_u64);
        let id = ContextId::of(&owner);
        let pinned = Arc::downgrade(&owner);
        drop(owner);

        let later = Arc::new(3_u64);
        assert_eq!(ContextId::of_weak(&pinned), id);
        assert_ne!(ContextId::of(&later), id);
    }
}
