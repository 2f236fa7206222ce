use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Knobs that change spelling and file layout, never resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Tool name printed in the generated-file banner.
    pub generator: String,
    pub namespace: String,
    /// Always included ahead of the entries' own includes.
    pub core_includes: Vec<String>,
    /// Declared types moved on assignment even though they are scalars.
    pub movable_types: Vec<String>,
    pub output_prefix: String,
    pub output_extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generator: "serialgen".to_string(),
            namespace: "duckdb".to_string(),
            core_includes: vec![
                "duckdb/common/serializer/format_serializer.hpp".to_string(),
                "duckdb/common/serializer/format_deserializer.hpp".to_string(),
            ],
            movable_types: vec![
                "string".to_string(),
                "ParsedExpression*".to_string(),
                "CommonTableExpressionMap".to_string(),
            ],
            output_prefix: "serialize_".to_string(),
            output_extension: "cpp".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        crate::path_de::from_str_with_path::<Self>(&source)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid config file {path:?}"))
    }

    pub fn is_movable(&self, raw_type: &str) -> bool {
        self.movable_types.iter().any(|t| t == raw_type)
    }

    /// Output file name for a schema file stem, e.g. `expression` → `serialize_expression.cpp`.
    pub fn output_file_name(&self, stem: &str) -> String {
        format!("{}{stem}.{}", self.output_prefix, self.output_extension)
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
