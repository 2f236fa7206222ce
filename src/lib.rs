//! Schema-driven generator of `FormatSerialize` / `FormatDeserialize`
//! routines for class hierarchies described in JSON.
//!
//! ```text
//! schema text
//!     ↓  schema::load_document
//! Vec<ClassSchema>
//!     ↓  Registry::resolve
//! Registry
//!     ↓  emit::emit   (serialize::render_*, deserialize::synthesize_*)
//! Artifact
//!     ↓  codegen::render
//! C++ source
//! ```
//!
//! Everything up to `codegen` is a pure function of the schema text; file
//! discovery and writing live in the binary's CLI.
pub mod cli;
pub mod codegen;
pub mod config;
pub mod deserialize;
pub mod emit;
pub mod error;
pub mod ir;
pub mod path_de;
pub mod registry;
pub mod schema;
pub mod serialize;

pub use config::GeneratorConfig;
pub use error::{Result, SchemaError};
pub use ir::Artifact;
pub use registry::Registry;

/// Load and resolve one schema file.
pub fn resolve_source(src: &str) -> Result<Registry> {
    let schemas = schema::load_document(src)?;
    Registry::resolve(schemas)
}

/// Schema text → ordered artifact structure.
pub fn generate_artifact(src: &str, config: &GeneratorConfig) -> Result<Artifact> {
    let registry = resolve_source(src)?;
    Ok(emit::emit(&registry, config))
}

/// Schema text → generated source text.
pub fn generate_source(src: &str, config: &GeneratorConfig) -> Result<String> {
    generate_artifact(src, config).map(|artifact| codegen::render(&artifact))
}
