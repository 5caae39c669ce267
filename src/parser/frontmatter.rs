// file: src/parser/frontmatter.rs
// description: YAML frontmatter extraction from file content
// reference: https://docs.rs/yaml-rust

use crate::error::{Result, SourceError};
use serde_json::{Map, Number, Value};
use yaml_rust::{Yaml, YamlLoader};

pub struct FrontmatterParser;

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract a leading `---` YAML block into JSON fields. Returns `None`
    /// when the content carries no frontmatter. Arrays and scalars survive
    /// as-is so list-valued reference fields (tags etc.) stay lists.
    pub fn extract(&self, file: &str, content: &str) -> Result<Option<Map<String, Value>>> {
        if !content.starts_with("---") {
            return Ok(None);
        }

        let parts: Vec<&str> = content.splitn(3, "---").collect();
        if parts.len() < 3 {
            return Ok(None);
        }

        let docs = YamlLoader::load_from_str(parts[1].trim()).map_err(|e| {
            SourceError::Frontmatter {
                file: file.to_string(),
                message: format!("YAML parse error: {}", e),
            }
        })?;

        if docs.is_empty() {
            return Ok(None);
        }

        let mut fields = Map::new();

        if let Yaml::Hash(hash) = &docs[0] {
            for (key, value) in hash {
                if let Yaml::String(k) = key {
                    fields.insert(k.clone(), yaml_to_json(value));
                }
            }
        }

        Ok(Some(fields))
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}

fn yaml_to_json(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Integer(i) => Value::Number(Number::from(*i)),
        Yaml::Real(r) => r
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(hash) => {
            let mut map = Map::new();
            for (key, value) in hash {
                if let Yaml::String(k) = key {
                    map.insert(k.clone(), yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
        _ => Value::Null,
    }
}
