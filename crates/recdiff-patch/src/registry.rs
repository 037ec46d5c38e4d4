//! Named factories for construct records.
//!
//! A construct record carries a factory tag and plain arguments instead of a
//! live constructor. The patcher looks the tag up here to build the value.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use recdiff_types::Value;
use tracing::debug;

/// Builds a value from construct-record arguments.
pub type Factory = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Factories keyed by type tag.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Arc<Factory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing and returning any previous one.
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F) -> Option<Arc<Factory>>
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let tag = tag.into();
        debug!(factory = %tag, "registered factory");
        self.factories.insert(tag, Arc::new(factory))
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, tag: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.register(tag, factory);
        self
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<Factory>> {
        self.factories.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Run the factory registered under `tag`, if any.
    pub fn build(&self, tag: &str, args: &[Value]) -> Option<Value> {
        self.get(tag).map(|factory| factory(args))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_build() {
        let mut registry = FactoryRegistry::new();
        assert!(registry.is_empty());
        registry.register("Pair", |args: &[Value]| Value::from(args.to_vec()));

        assert!(registry.contains("Pair"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.build("Pair", &[Value::from(1), Value::from(2)]),
            Some(Value::from(vec![Value::from(1), Value::from(2)]))
        );
        assert!(registry.build("Missing", &[]).is_none());
    }

    #[test]
    fn re_registering_replaces() {
        let mut registry = FactoryRegistry::new().with("T", |_: &[Value]| Value::from(1));
        let previous = registry.register("T", |_: &[Value]| Value::from(2));
        assert!(previous.is_some());
        assert_eq!(registry.build("T", &[]), Some(Value::from(2)));
        assert_eq!(registry.tags().collect::<Vec<_>>(), vec!["T"]);
    }
}
