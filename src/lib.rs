// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod importer;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod store;
pub mod utils;

pub use config::{Config, PipelineConfig, RefDescriptor, RouteConfig, SourceConfig};
pub use error::{Result, SourceError};
pub use exporter::{ExportManifest, JsonExporter};
pub use importer::{NodeImporter, ReferenceResolver, RoutePlanner};
pub use models::{ContentNode, FileInfo};
pub use parser::FrontmatterParser;
pub use pipeline::{ImportPipeline, ImportStats, ProgressTracker};
pub use repository::{CredentialedRemote, FileEnumerator, MirrorState, RepositorySynchronizer};
pub use store::{Collection, ContentStore};
