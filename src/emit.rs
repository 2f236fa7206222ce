//! Emitter: orders every generated class body of one schema file.
//!
//! Base classes keep schema declaration order; concrete classes are sorted by
//! name so the output does not depend on how the schema file is arranged.
//! Custom-implementation classes are registered but never emitted.

use crate::config::GeneratorConfig;
use crate::deserialize;
use crate::ir::{Artifact, ClassBody};
use crate::registry::Registry;
use crate::serialize;

pub fn emit(registry: &Registry, config: &GeneratorConfig) -> Artifact {
    let includes = config
        .core_includes
        .iter()
        .chain(registry.includes())
        .cloned()
        .collect();

    let mut bodies = registry
        .bases()
        .iter()
        .filter(|b| !b.schema.custom_implementation)
        .map(|b| ClassBody {
            serialize: serialize::render_base(b),
            deserialize: deserialize::synthesize_base(registry, b, config),
        })
        .collect::<Vec<_>>();

    let mut concretes = registry
        .concretes()
        .iter()
        .filter(|c| !c.schema.custom_implementation)
        .collect::<Vec<_>>();
    concretes.sort_by(|a, b| a.name().cmp(b.name()));
    bodies.extend(concretes.into_iter().map(|c| ClassBody {
        serialize: serialize::render_concrete(registry, c),
        deserialize: deserialize::synthesize_concrete(registry, c, config),
    }));

    Artifact {
        generator: config.generator.clone(),
        includes,
        namespace: config.namespace.clone(),
        bodies,
    }
}
