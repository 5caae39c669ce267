// file: src/importer/refs.rs
// description: reference field resolution with run-scoped deduplication
// reference: internal data structures

use crate::config::RefDescriptor;
use crate::error::Result;
use crate::models::ContentNode;
use crate::store::ContentStore;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Composite dedup key: at most one reference node is created per distinct
/// (type name, field name, value) triple within a run.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct RefKey {
    type_name: String,
    field_name: String,
    value: String,
}

/// Creates reference nodes for configured fields on imported nodes. Owns
/// its dedup cache; one resolver instance per import run.
pub struct ReferenceResolver {
    refs: BTreeMap<String, RefDescriptor>,
    seen: HashSet<RefKey>,
    created: usize,
}

impl ReferenceResolver {
    pub fn new(refs: BTreeMap<String, RefDescriptor>) -> Self {
        Self {
            refs,
            seen: HashSet::new(),
            created: 0,
        }
    }

    /// Number of reference nodes created so far in this run.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn resolve(&mut self, store: &mut ContentStore, node: &ContentNode) -> Result<()> {
        for (field_name, descriptor) in &self.refs {
            if !descriptor.create {
                continue;
            }

            let Some(value) = node.fields.get(field_name) else {
                continue;
            };

            let values: Vec<String> = match value {
                Value::Array(items) => items.iter().filter_map(scalar_value).collect(),
                other => scalar_value(other).into_iter().collect(),
            };

            for value in values {
                let key = RefKey {
                    type_name: descriptor.type_name.clone(),
                    field_name: field_name.clone(),
                    value: value.clone(),
                };
                if !self.seen.insert(key) {
                    continue;
                }

                debug!(
                    "Creating {} reference node for {}={}",
                    descriptor.type_name, field_name, value
                );
                store
                    .add_collection_with_route(&descriptor.type_name, descriptor.route.clone())
                    .add_node(json!({ "id": value, "title": value }))?;
                self.created += 1;
            }
        }

        Ok(())
    }
}

fn scalar_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
