// file: src/exporter/json.rs
// description: json export of store collections

use crate::error::Result;
use crate::store::ContentStore;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportedCollection {
    pub type_name: String,
    pub route: Option<String>,
    pub nodes: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub total_nodes: usize,
    pub files: Vec<String>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Write one `<TypeName>.json` per collection plus a `manifest.json`
    /// summary. Node order follows the store's id order, so two exports of
    /// the same run compare byte-equal.
    pub fn export_all(&self, store: &ContentStore, pretty: bool) -> Result<ExportManifest> {
        info!("Starting JSON export to {}", self.output_dir.display());

        let mut files = Vec::new();
        let mut total_nodes = 0;

        for collection in store.collections() {
            let exported = ExportedCollection {
                type_name: collection.type_name().to_string(),
                route: collection.route().map(String::from),
                nodes: collection.nodes().cloned().collect(),
            };

            let file_name = format!("{}.json", collection.type_name());
            let path = self.output_dir.join(&file_name);
            let payload = if pretty {
                serde_json::to_string_pretty(&exported)?
            } else {
                serde_json::to_string(&exported)?
            };
            fs::write(&path, payload)?;

            total_nodes += exported.nodes.len();
            files.push(file_name);
        }

        let manifest = ExportManifest { total_nodes, files };
        let manifest_path = self.output_dir.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

        info!("Export complete: {} nodes exported", manifest.total_nodes);
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_exporter_creation() {
        let dir = tempdir().unwrap();
        let exporter = JsonExporter::new(dir.path());
        assert!(exporter.is_ok());
    }

    #[test]
    fn test_export_writes_collections_and_manifest() {
        let dir = tempdir().unwrap();
        let mut store = ContentStore::new();
        store
            .add_collection("GitNode")
            .add_node(json!({"id": "a", "path": "/a"}))
            .unwrap();
        store
            .add_collection("Tag")
            .add_node(json!({"id": "rust", "title": "rust"}))
            .unwrap();

        let exporter = JsonExporter::new(dir.path()).unwrap();
        let manifest = exporter.export_all(&store, true).unwrap();

        assert_eq!(manifest.total_nodes, 2);
        assert!(dir.path().join("GitNode.json").exists());
        assert!(dir.path().join("Tag.json").exists());
        assert!(dir.path().join("manifest.json").exists());

        let raw = fs::read_to_string(dir.path().join("Tag.json")).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["nodes"][0]["id"], "rust");
    }
}
