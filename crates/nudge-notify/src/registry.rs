//! Provider registry — maps provider ids to implementations.
//! Registration order is preserved; it doubles as selection preference.

use std::collections::HashMap;
use std::sync::Arc;

use nudge_core::traits::NotificationProvider;

#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn NotificationProvider>>,
    /// Ids in first-registration order.
    order: Vec<String>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Idempotent by id — re-registering replaces the
    /// implementation without disturbing the original position in the order.
    pub fn register(&mut self, provider: Arc<dyn NotificationProvider>) {
        let id = provider.provider_id().to_string();
        tracing::info!(
            "📣 Registered notification provider: {} ({})",
            provider.provider_name(),
            id
        );
        if self.providers.insert(id.clone(), provider).is_none() {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn NotificationProvider>> {
        self.providers.get(id).cloned()
    }

    /// Registered providers in registration order.
    pub fn list(&self) -> Vec<Arc<dyn NotificationProvider>> {
        self.order
            .iter()
            .filter_map(|id| self.providers.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleProvider;
    use async_trait::async_trait;
    use nudge_core::Result;
    use nudge_core::types::{NotificationPayload, NotificationResult};

    struct NamedStub(&'static str);

    #[async_trait]
    impl NotificationProvider for NamedStub {
        fn provider_id(&self) -> &str {
            self.0
        }
        fn provider_name(&self) -> &str {
            "Stub"
        }
        async fn send(&self, payload: &NotificationPayload) -> Result<NotificationResult> {
            Ok(NotificationResult::failure(payload, "stub", Some(self.0)))
        }
        async fn is_available(&self) -> bool {
            false
        }
        fn validate_payload(&self, _payload: &NotificationPayload) -> bool {
            true
        }
    }

    #[test]
    fn lookup_and_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(NamedStub("sms")));
        registry.register(Arc::new(ConsoleProvider::new()));
        assert_eq!(registry.len(), 2);
        assert!(registry.get("console").is_some());
        assert!(registry.get("pigeon").is_none());

        let ids: Vec<_> = registry.list().iter().map(|p| p.provider_id().to_string()).collect();
        assert_eq!(ids, vec!["sms", "console"]);
    }

    #[test]
    fn reregistration_replaces_without_reordering() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(NamedStub("console")));
        registry.register(Arc::new(NamedStub("sms")));
        registry.register(Arc::new(ConsoleProvider::new()));
        assert_eq!(registry.len(), 2);
        let ids: Vec<_> = registry.list().iter().map(|p| p.provider_id().to_string()).collect();
        assert_eq!(ids, vec!["console", "sms"]);
        // Last registration wins.
        assert_eq!(registry.get("console").unwrap().provider_name(), "Console Provider");
    }
}
