// file: src/models/mod.rs
// description: data model module exports
// reference: Internal module structure

pub mod node;

pub use node::{ContentNode, FileInfo};
