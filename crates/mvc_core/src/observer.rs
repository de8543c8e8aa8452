use std::sync::Arc;

use anyhow::Result;
use shared::{ContextId, Notification};

use crate::interfaces::NotificationHandler;

/// A handler paired with the identity it is removed by.
///
/// The View never compares handlers; two observers with the same context are
/// interchangeable as far as removal is concerned.
pub struct Observer {
    handler: Arc<dyn NotificationHandler>,
    context: ContextId,
}

impl Observer {
    /// The caller keeps the object behind `context` alive for as long as this
    /// observer stays registered; see [`ContextId::of`].
    pub fn new(handler: Arc<dyn NotificationHandler>, context: ContextId) -> Self {
        Self { handler, context }
    }

    /// Observer whose context is the handler itself.
    pub fn for_handler<H>(handler: Arc<H>) -> Self
    where
        H: NotificationHandler + 'static,
    {
        let context = ContextId::of(&handler);
        Self::new(handler, context)
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub async fn notify(&self, notification: &Notification) -> Result<()> {
        self.handler.handle(notification).await
    }

    pub fn compare_context(&self, context: ContextId) -> bool {
        self.context == context
    }
}

impl std::fmt::Debug for Observer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Capture {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationHandler for Capture {
        async fn handle(&self, notification: &Notification) -> Result<()> {
            self.seen.lock().push(notification.name().to_string());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl NotificationHandler for Failing {
        async fn handle(&self, notification: &Notification) -> Result<()> {
            Err(anyhow!("cannot handle {}", notification.name()))
        }
    }

    #[tokio::test]
    async fn notify_invokes_handler() {
        let capture = Arc::new(Capture::default());
        let observer = Observer::for_handler(Arc::clone(&capture));

        observer
            .notify(&Notification::new("Ping"))
            .await
            .expect("notify");

        assert_eq!(*capture.seen.lock(), vec!["Ping".to_string()]);
    }

    #[tokio::test]
    async fn notify_propagates_handler_error() {
        let observer = Observer::for_handler(Arc::new(Failing));

        let err = observer
            .notify(&Notification::new("Ping"))
            .await
            .expect_err("handler failure should surface");

        assert_eq!(err.to_string(), "cannot handle Ping");
    }

    #[test]
    fn compare_context_matches_identity_only() {
        let owner = Arc::new(Capture::default());
        let stranger = Arc::new(Capture::default());
        let observer = Observer::new(Arc::new(Failing), ContextId::of(&owner));

        assert!(observer.compare_context(ContextId::of(&owner)));
        assert!(!observer.compare_context(ContextId::of(&stranger)));
    }
}
