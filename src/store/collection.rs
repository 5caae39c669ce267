// file: src/store/collection.rs
// description: a named bucket of nodes addressable by stable id
// reference: internal data structures

use crate::error::{Result, SourceError};
use serde_json::Value;
use std::collections::BTreeMap;

/// Nodes of one logical type. Records are JSON objects keyed by their `id`
/// field; `add_node` upserts, so a re-import with the same id is an update,
/// not a duplicate.
#[derive(Debug, Clone)]
pub struct Collection {
    type_name: String,
    route: Option<String>,
    references: BTreeMap<String, String>,
    nodes: BTreeMap<String, Value>,
}

impl Collection {
    pub(crate) fn new(type_name: &str, route: Option<String>) -> Self {
        Self {
            type_name: type_name.to_string(),
            route,
            references: BTreeMap::new(),
            nodes: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Declare that `field_name` on nodes of this collection links to nodes
    /// of `target_type_name`.
    pub fn add_reference(&mut self, field_name: &str, target_type_name: &str) {
        self.references
            .insert(field_name.to_string(), target_type_name.to_string());
    }

    pub fn references(&self) -> &BTreeMap<String, String> {
        &self.references
    }

    pub fn add_node(&mut self, record: Value) -> Result<()> {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SourceError::Store(format!(
                    "node added to {} has no string id",
                    self.type_name
                ))
            })?
            .to_string();

        self.nodes.insert(id, record);
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Value> {
        self.nodes.get(id)
    }

    /// Nodes in id order, independent of insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Value> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_node_upserts_by_id() {
        let mut collection = Collection::new("GitNode", None);

        collection.add_node(json!({"id": "a", "title": "first"})).unwrap();
        collection.add_node(json!({"id": "a", "title": "second"})).unwrap();

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.node("a").unwrap()["title"], "second");
    }

    #[test]
    fn test_add_node_requires_id() {
        let mut collection = Collection::new("GitNode", None);
        assert!(collection.add_node(json!({"title": "no id"})).is_err());
    }

    #[test]
    fn test_references_are_recorded() {
        let mut collection = Collection::new("GitNode", None);
        collection.add_reference("tags", "Tag");
        collection.add_reference("author", "Author");

        assert_eq!(collection.references().get("tags").unwrap(), "Tag");
        assert_eq!(collection.references().len(), 2);
    }

    #[test]
    fn test_nodes_iterate_in_id_order() {
        let mut collection = Collection::new("GitNode", None);
        collection.add_node(json!({"id": "b"})).unwrap();
        collection.add_node(json!({"id": "a"})).unwrap();

        let ids: Vec<&str> = collection
            .nodes()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
