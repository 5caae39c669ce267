// file: src/parser/mod.rs
// description: content parsing module exports
// reference: Internal module structure

pub mod frontmatter;

pub use frontmatter::FrontmatterParser;
