// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, SourceError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub remote: String,
    pub branch: Option<String>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_pattern")]
    pub pattern: Vec<String>,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_type_name")]
    pub type_name: String,
    #[serde(default = "default_shallow_depth")]
    pub shallow_depth: i32,
    #[serde(default)]
    pub private_repo: bool,
    pub credentials: Option<CredentialsConfig>,
    pub proxy: Option<String>,
    #[serde(default)]
    pub refs: BTreeMap<String, RefSetting>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub path_prefix: Option<String>,
    #[serde(default = "default_index")]
    pub index: Vec<String>,
    #[serde(default)]
    pub trailing_slash: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            path_prefix: None,
            index: default_index(),
            trailing_slash: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_parallel_reads")]
    pub parallel_reads: usize,
    #[serde(default = "default_sync_timeout")]
    pub sync_timeout_secs: u64,
    #[serde(default = "default_sync_on_start")]
    pub sync_on_start: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel_reads: default_parallel_reads(),
            sync_timeout_secs: default_sync_timeout(),
            sync_on_start: default_sync_on_start(),
        }
    }
}

/// A reference field entry as written in configuration: either a bare
/// target type name, or a detailed table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RefSetting {
    TypeName(String),
    Detailed {
        type_name: Option<String>,
        #[serde(default)]
        create: bool,
        route: Option<String>,
    },
}

/// Normalized reference descriptor, one per configured field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefDescriptor {
    pub type_name: String,
    pub create: bool,
    pub route: Option<String>,
}

fn default_target() -> String {
    "repo".to_string()
}

fn default_pattern() -> Vec<String> {
    vec!["**/*".to_string()]
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("./mirrors")
}

fn default_type_name() -> String {
    "GitNode".to_string()
}

fn default_shallow_depth() -> i32 {
    1
}

fn default_index() -> Vec<String> {
    vec!["index".to_string()]
}

fn default_parallel_reads() -> usize {
    8
}

fn default_sync_timeout() -> u64 {
    300
}

fn default_sync_on_start() -> bool {
    true
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GIT_SOURCE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| SourceError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            source: SourceConfig {
                remote: "https://github.com/user/example-repo".to_string(),
                branch: None,
                target: default_target(),
                pattern: default_pattern(),
                base_dir: default_base_dir(),
                type_name: default_type_name(),
                shallow_depth: default_shallow_depth(),
                private_repo: false,
                credentials: None,
                proxy: None,
                refs: BTreeMap::new(),
            },
            routes: RouteConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    /// Directory the mirror working copy lives in.
    pub fn mirror_path(&self) -> PathBuf {
        self.source.base_dir.join(&self.source.target)
    }

    fn validate(&self) -> Result<()> {
        if self.source.remote.trim().is_empty() {
            return Err(SourceError::Config("remote URL must not be empty".to_string()));
        }

        if self.source.shallow_depth < 1 {
            return Err(SourceError::Config(
                "shallow_depth must be at least 1".to_string(),
            ));
        }

        if self.source.private_repo && self.source.credentials.is_none() {
            return Err(SourceError::Config(
                "private_repo requires credentials.username and credentials.token".to_string(),
            ));
        }

        if self.pipeline.parallel_reads == 0 {
            return Err(SourceError::Config(
                "parallel_reads must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SourceConfig {
    /// Resolve the configured `refs` map into descriptors, filling in the
    /// default type name and the default route for created collections.
    pub fn normalized_refs(&self) -> BTreeMap<String, RefDescriptor> {
        self.refs
            .iter()
            .map(|(field, setting)| {
                let descriptor = match setting {
                    RefSetting::TypeName(type_name) => RefDescriptor {
                        type_name: type_name.clone(),
                        create: false,
                        route: None,
                    },
                    RefSetting::Detailed {
                        type_name,
                        create,
                        route,
                    } => {
                        let type_name = type_name
                            .clone()
                            .unwrap_or_else(|| self.type_name.clone());
                        let route = if *create {
                            route.clone().or_else(|| {
                                Some(format!("/{}/:slug", slug::slugify(&type_name)))
                            })
                        } else {
                            route.clone()
                        };
                        RefDescriptor {
                            type_name,
                            create: *create,
                            route,
                        }
                    }
                };
                (field.clone(), descriptor)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base_source() -> SourceConfig {
        SourceConfig {
            remote: "https://github.com/user/example-repo".to_string(),
            branch: None,
            target: "repo".to_string(),
            pattern: default_pattern(),
            base_dir: PathBuf::from("/tmp/mirrors"),
            type_name: "GitNode".to_string(),
            shallow_depth: 1,
            private_repo: false,
            credentials: None,
            proxy: None,
            refs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default_config();
        assert_eq!(config.source.pattern, vec!["**/*".to_string()]);
        assert_eq!(config.routes.index, vec!["index".to_string()]);
        assert!(!config.routes.trailing_slash);
        assert_eq!(config.source.shallow_depth, 1);
        assert!(config.pipeline.sync_on_start);
    }

    #[test]
    fn test_mirror_path_joins_base_and_target() {
        let mut config = Config::default_config();
        config.source.base_dir = PathBuf::from("/data");
        config.source.target = "docs".to_string();
        assert_eq!(config.mirror_path(), PathBuf::from("/data/docs"));
    }

    #[test]
    fn test_validate_rejects_empty_remote() {
        let mut config = Config::default_config();
        config.source.remote = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_private_repo_requires_credentials() {
        let mut config = Config::default_config();
        config.source.private_repo = true;
        assert!(config.validate().is_err());

        config.source.credentials = Some(CredentialsConfig {
            username: "user".to_string(),
            token: "token".to_string(),
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_normalize_refs_shorthand() {
        let mut source = base_source();
        source.refs.insert(
            "author".to_string(),
            RefSetting::TypeName("Author".to_string()),
        );

        let refs = source.normalized_refs();
        let author = &refs["author"];
        assert_eq!(author.type_name, "Author");
        assert!(!author.create);
        assert_eq!(author.route, None);
    }

    #[test]
    fn test_normalize_refs_detailed_defaults() {
        let mut source = base_source();
        source.refs.insert(
            "tags".to_string(),
            RefSetting::Detailed {
                type_name: Some("TagPage".to_string()),
                create: true,
                route: None,
            },
        );
        source.refs.insert(
            "category".to_string(),
            RefSetting::Detailed {
                type_name: None,
                create: false,
                route: None,
            },
        );

        let refs = source.normalized_refs();
        assert_eq!(refs["tags"].route.as_deref(), Some("/tagpage/:slug"));
        assert!(refs["tags"].create);
        // missing type name falls back to the source type name
        assert_eq!(refs["category"].type_name, "GitNode");
    }

    #[test]
    fn test_normalize_refs_explicit_route_wins() {
        let mut source = base_source();
        source.refs.insert(
            "tags".to_string(),
            RefSetting::Detailed {
                type_name: Some("Tag".to_string()),
                create: true,
                route: Some("/topics/:slug".to_string()),
            },
        );

        let refs = source.normalized_refs();
        assert_eq!(refs["tags"].route.as_deref(), Some("/topics/:slug"));
    }
}
