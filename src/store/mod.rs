// file: src/store/mod.rs
// description: in-memory content store of node collections
// reference: internal data structures

pub mod collection;

pub use collection::Collection;

use std::collections::BTreeMap;

/// Registry of collections for one import run. Registration is idempotent
/// per type name.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    collections: BTreeMap<String, Collection>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collection(&mut self, type_name: &str) -> &mut Collection {
        self.add_collection_with_route(type_name, None)
    }

    pub fn add_collection_with_route(
        &mut self,
        type_name: &str,
        route: Option<String>,
    ) -> &mut Collection {
        self.collections
            .entry(type_name.to_string())
            .or_insert_with(|| Collection::new(type_name, route))
    }

    pub fn collection(&self, type_name: &str) -> Option<&Collection> {
        self.collections.get(type_name)
    }

    pub fn collection_mut(&mut self, type_name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(type_name)
    }

    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn node_count(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }
}
