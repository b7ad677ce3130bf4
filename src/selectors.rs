//! Per-component selector overrides.
//!
//! A map is built once per compile session from a table of selector
//! factories. Overrides are registered against component ids during a
//! single setup pass; resolution afterwards is read-only.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Builds a selector value for a component id; `None` builds the default.
pub type SelectorFactory<V> = Box<dyn Fn(Option<&str>) -> V>;

/// Rewrites the raw selector of one component.
pub type SelectorOverride<V> = Box<dyn Fn(V) -> V>;

struct SelectorEntry<V> {
    factory: SelectorFactory<V>,
    default: V,
    overrides: HashMap<String, SelectorOverride<V>>,
}

pub struct SelectorMapBuilder<V> {
    factories: Vec<(String, SelectorFactory<V>)>,
}

impl<V: Clone> Default for SelectorMapBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> SelectorMapBuilder<V> {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    pub fn selector(
        mut self,
        key: impl Into<String>,
        factory: impl Fn(Option<&str>) -> V + 'static,
    ) -> Self {
        self.factories.push((key.into(), Box::new(factory)));
        self
    }

    pub fn build(self) -> SelectorMap<V> {
        let entries = self
            .factories
            .into_iter()
            .map(|(key, factory)| {
                let default = factory(None);
                (
                    key,
                    SelectorEntry {
                        factory,
                        default,
                        overrides: HashMap::new(),
                    },
                )
            })
            .collect();
        SelectorMap { entries }
    }

    /// Builds the map and hands it to `init` once, together with `resolver`
    /// and a snapshot of the default selectors, so overrides can be declared
    /// eagerly.
    pub fn build_with<R, F>(self, resolver: &R, init: F) -> SelectorMap<V>
    where
        R: ?Sized,
        F: FnOnce(&mut SelectorMap<V>, &R, &HashMap<String, V>),
    {
        let mut map = self.build();
        let defaults = map.defaults();
        init(&mut map, resolver, &defaults);
        tracing::debug!(
            selectors = map.entries.len(),
            overrides = map.override_count(),
            "selector map initialised"
        );
        map
    }
}

pub struct SelectorMap<V> {
    entries: HashMap<String, SelectorEntry<V>>,
}

impl<V: Clone> SelectorMap<V> {
    pub fn builder() -> SelectorMapBuilder<V> {
        SelectorMapBuilder::new()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn default(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.default)
    }

    pub fn defaults(&self) -> HashMap<String, V> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.default.clone()))
            .collect()
    }

    /// Registers `cb` for component `id` under `key`, replacing any earlier
    /// override for that pair.
    pub fn register(
        &mut self,
        key: &str,
        id: impl AsRef<str>,
        cb: impl Fn(V) -> V + 'static,
    ) -> Result<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| Error::UnknownSelector(key.to_string()))?;
        entry.overrides.insert(id.as_ref().to_string(), Box::new(cb));
        Ok(())
    }

    pub fn has_override(&self, key: &str, id: impl AsRef<str>) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.overrides.contains_key(id.as_ref()))
    }

    fn override_count(&self) -> usize {
        self.entries.values().map(|entry| entry.overrides.len()).sum()
    }

    /// Selector `key` for component `id`, with its override applied.
    pub fn resolve(&self, key: &str, id: impl AsRef<str>) -> Option<V> {
        let entry = self.entries.get(key)?;
        let id = id.as_ref();
        let selector = (entry.factory)(Some(id));
        Some(match entry.overrides.get(id) {
            Some(cb) => cb(selector),
            None => selector,
        })
    }

    /// Resolve function bound to a single key.
    pub fn resolver<'m>(&'m self, key: &str) -> Option<impl Fn(&str) -> V + 'm> {
        let entry = self.entries.get(key)?;
        Some(move |id: &str| {
            let selector = (entry.factory)(Some(id));
            match entry.overrides.get(id) {
                Some(cb) => cb(selector),
                None => selector,
            }
        })
    }
}
