// file: src/importer/mod.rs
// description: node import module exports
// reference: Internal module structure

pub mod nodes;
pub mod refs;
pub mod routes;

pub use nodes::NodeImporter;
pub use refs::ReferenceResolver;
pub use routes::RoutePlanner;
