// file: src/exporter/mod.rs
// description: export module exports
// reference: Internal module structure

pub mod json;

pub use json::{ExportManifest, JsonExporter};
