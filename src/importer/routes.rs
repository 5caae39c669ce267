// file: src/importer/routes.rs
// description: route path derivation from file locations
// reference: static site generator routing conventions

use crate::config::RouteConfig;
use slug::slugify;

/// Derives the route path for an imported file: slugified directory
/// segments, the slugified base name unless it is an index name, an
/// optional prefix, and an optional trailing slash. An index file maps to
/// its containing directory's path.
pub struct RoutePlanner {
    path_prefix: Option<String>,
    index_names: Vec<String>,
    trailing_slash: bool,
}

impl RoutePlanner {
    pub fn new(config: &RouteConfig) -> Self {
        Self {
            path_prefix: config.path_prefix.clone(),
            index_names: config.index.clone(),
            trailing_slash: config.trailing_slash,
        }
    }

    pub fn route_for(&self, directory: &str, name: &str) -> String {
        let mut segments: Vec<String> = Vec::new();

        if let Some(prefix) = &self.path_prefix {
            segments.extend(split_segments(prefix));
        }
        segments.extend(split_segments(directory));

        if !self.index_names.iter().any(|index| index == name) {
            segments.push(slugify(name));
        }

        if segments.is_empty() {
            return "/".to_string();
        }

        let mut route = format!("/{}", segments.join("/"));
        if self.trailing_slash {
            route.push('/');
        }
        route
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(slugify)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn planner(prefix: Option<&str>, trailing_slash: bool) -> RoutePlanner {
        RoutePlanner {
            path_prefix: prefix.map(String::from),
            index_names: vec!["index".to_string()],
            trailing_slash,
        }
    }

    #[test]
    fn test_plain_file_route() {
        let planner = planner(None, false);
        assert_eq!(planner.route_for("blog", "post"), "/blog/post");
    }

    #[test]
    fn test_index_collapses_to_directory() {
        let planner = planner(None, false);
        assert_eq!(planner.route_for("blog", "index"), "/blog");
        assert_eq!(planner.route_for("blog", "post"), "/blog/post");
    }

    #[test]
    fn test_root_index_maps_to_root() {
        let planner = planner(None, false);
        assert_eq!(planner.route_for("", "index"), "/");
    }

    #[test]
    fn test_path_prefix() {
        let planner = planner(Some("docs"), false);
        assert_eq!(planner.route_for("blog", "post"), "/docs/blog/post");
    }

    #[test]
    fn test_trailing_slash() {
        let with = planner(None, true);
        assert_eq!(with.route_for("blog", "post"), "/blog/post/");

        let without = planner(None, false);
        assert_eq!(without.route_for("blog", "post"), "/blog/post");
    }

    #[test]
    fn test_root_route_never_doubles_slash() {
        let planner = planner(None, true);
        assert_eq!(planner.route_for("", "index"), "/");
    }

    #[test]
    fn test_segments_are_slugified() {
        let planner = planner(None, false);
        assert_eq!(
            planner.route_for("My Docs/Getting Started", "First Steps"),
            "/my-docs/getting-started/first-steps"
        );
    }

    #[test]
    fn test_custom_index_names() {
        let planner = RoutePlanner {
            path_prefix: None,
            index_names: vec!["index".to_string(), "readme".to_string()],
            trailing_slash: false,
        };
        assert_eq!(planner.route_for("guides", "readme"), "/guides");
    }

    #[test]
    fn test_nested_directories() {
        let planner = planner(None, false);
        assert_eq!(planner.route_for("a/b/c", "index"), "/a/b/c");
        assert_eq!(planner.route_for("a/b/c", "d"), "/a/b/c/d");
    }
}
