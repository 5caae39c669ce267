// file: src/models/node.rs
// description: content node model with stable identity derivation
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileInfo {
    pub extension: String,
    pub directory: String,
    pub relative_path: String,
    pub name: String,
}

/// One node per imported file. `id` depends only on the file's relative
/// path, so re-imports update the same node instead of duplicating it, and
/// renaming a file is an identity change rather than an update.
#[derive(Debug, Clone, Serialize)]
pub struct ContentNode {
    pub id: String,
    pub path: String,
    pub file_info: FileInfo,
    pub mime_type: String,
    pub content: String,
    pub origin: PathBuf,
    /// Frontmatter fields, merged into the node record so reference fields
    /// are addressable by name. The struct's own keys always win: a
    /// frontmatter `id:` or `path:` can never displace the derived values.
    #[serde(skip)]
    pub fields: Map<String, Value>,
}

impl ContentNode {
    /// Deterministic identifier for a path relative to the mirror root.
    /// Independent of file content and stable across runs.
    pub fn make_uid(relative_path: &str) -> String {
        let normalized = relative_path.replace('\\', "/");
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn to_record(&self) -> crate::error::Result<Value> {
        let mut record = serde_json::to_value(self)?;

        if let Value::Object(map) = &mut record {
            for (key, value) in &self.fields {
                map.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        Ok(record)
    }
}
