// file: src/importer/nodes.rs
// description: converts enumerated files into content nodes
// reference: reads files, derives identity and routes, collects metadata

use crate::error::{Result, SourceError};
use crate::importer::routes::RoutePlanner;
use crate::models::{ContentNode, FileInfo};
use crate::parser::FrontmatterParser;
use serde_json::Map;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct NodeImporter {
    context: PathBuf,
    routes: RoutePlanner,
    frontmatter: FrontmatterParser,
}

impl NodeImporter {
    /// `context` is the mirror root all relative paths resolve against.
    pub fn new(context: PathBuf, routes: RoutePlanner) -> Self {
        Self {
            context,
            routes,
            frontmatter: FrontmatterParser::new(),
        }
    }

    pub fn import_file(&self, relative_path: &str) -> Result<ContentNode> {
        let relative = relative_path.replace('\\', "/");
        let origin = self.context.join(&relative);

        let content = fs::read_to_string(&origin).map_err(|source| {
            SourceError::FileOperation {
                path: origin.clone(),
                source,
            }
        })?;

        let (directory, file_name) = match relative.rsplit_once('/') {
            Some((dir, file)) => (dir.to_string(), file),
            None => (String::new(), relative.as_str()),
        };

        let name = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let extension = Path::new(file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let fields = self
            .frontmatter
            .extract(&relative, &content)?
            .unwrap_or_else(Map::new);

        let node = ContentNode {
            id: ContentNode::make_uid(&relative),
            path: self.routes.route_for(&directory, &name),
            mime_type: resolve_mime(&relative, &extension),
            file_info: FileInfo {
                extension,
                directory,
                relative_path: relative.clone(),
                name,
            },
            content,
            origin,
            fields,
        };

        debug!("Imported {} as {}", relative, node.path);
        Ok(node)
    }
}

fn resolve_mime(relative_path: &str, extension: &str) -> String {
    mime_guess::from_path(relative_path)
        .first_raw()
        .map(str::to_string)
        .unwrap_or_else(|| format!("application/x-{}", extension.trim_start_matches('.')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn importer(root: &Path) -> NodeImporter {
        NodeImporter::new(
            root.to_path_buf(),
            RoutePlanner::new(&RouteConfig::default()),
        )
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_import_builds_node_metadata() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "blog/post.md", "# Post");

        let node = importer(temp.path()).import_file("blog/post.md").unwrap();

        assert_eq!(node.path, "/blog/post");
        assert_eq!(node.file_info.directory, "blog");
        assert_eq!(node.file_info.name, "post");
        assert_eq!(node.file_info.extension, ".md");
        assert_eq!(node.file_info.relative_path, "blog/post.md");
        assert_eq!(node.content, "# Post");
        assert_eq!(node.origin, temp.path().join("blog/post.md"));
    }

    #[test]
    fn test_index_file_maps_to_directory_route() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "blog/index.md", "# Blog");

        let node = importer(temp.path()).import_file("blog/index.md").unwrap();
        assert_eq!(node.path, "/blog");
    }

    #[test]
    fn test_id_is_stable_across_runs_and_content_changes() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "post.md", "v1");
        let first = importer(temp.path()).import_file("post.md").unwrap();

        write(temp.path(), "post.md", "v2 entirely different");
        let second = importer(temp.path()).import_file("post.md").unwrap();

        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_mime_lookup_with_synthetic_fallback() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "data.json", "{}");
        write(temp.path(), "custom.zzz9", "??");

        let importer = importer(temp.path());
        assert_eq!(
            importer.import_file("data.json").unwrap().mime_type,
            "application/json"
        );
        assert_eq!(
            importer.import_file("custom.zzz9").unwrap().mime_type,
            "application/x-zzz9"
        );
    }

    #[test]
    fn test_frontmatter_lands_in_fields() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "post.md",
            "---\ntitle: Hello\ntags:\n  - rust\n---\nbody",
        );

        let node = importer(temp.path()).import_file("post.md").unwrap();
        assert_eq!(node.fields["title"], "Hello");
        assert!(node.fields["tags"].is_array());
    }

    #[test]
    fn test_missing_file_is_a_file_operation_error() {
        let temp = TempDir::new().unwrap();
        let result = importer(temp.path()).import_file("gone.md");
        assert!(matches!(
            result,
            Err(SourceError::FileOperation { .. })
        ));
    }
}
