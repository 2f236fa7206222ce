//! Class registry: resolves one schema file's records into an inheritance
//! graph and checks the structural invariants.
//!
//! Resolution is all-or-nothing. The adjacency (`base → literal → child`) is
//! built once here and only handed out by shared reference afterwards.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Result, SchemaError};
use crate::schema::{
    BaseClassSchema, ClassSchema, ConcreteClassSchema, MemberVariable, OwnershipKind,
    TypeDescriptor,
};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    bases: Vec<ResolvedBase>,          // declaration order
    concretes: Vec<ResolvedConcrete>,  // declaration order
    #[serde(skip)]
    base_index: IndexMap<String, usize>,
    /// base name → discriminator literal → index into `concretes`
    children: IndexMap<String, BTreeMap<String, usize>>,
    includes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBase {
    pub schema: BaseClassSchema,
    /// Local the discriminator is read into, the member's own name.
    pub discriminator_member: String,
    /// Declared type of the discriminator member, the enum switched on.
    pub discriminator_type: TypeDescriptor,
    pub extra_parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConcrete {
    pub schema: ConcreteClassSchema,
    /// Index into the registry's bases.
    pub parent: Option<usize>,
    pub ownership: OwnershipKind,
    pub extra_parameters: Vec<Parameter>,
}

/// A context value threaded through every deserialize call of a family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeDescriptor,
}

// ————————————————————————————————————————————————————————————————————————————
// RESOLUTION
// ————————————————————————————————————————————————————————————————————————————

impl Registry {
    pub fn resolve(schemas: Vec<ClassSchema>) -> Result<Self> {
        let includes = schemas
            .iter()
            .flat_map(|s| s.includes().iter().cloned())
            .collect::<Vec<_>>();

        // 1) bases first, so a child may precede its parent in the file
        let mut bases = Vec::<ResolvedBase>::new();
        let mut base_index = IndexMap::<String, usize>::new();
        let mut pending = Vec::<ConcreteClassSchema>::new();
        for schema in schemas {
            match schema {
                ClassSchema::Base(base) => {
                    if base_index.contains_key(&base.name) {
                        return Err(SchemaError::DuplicateBaseClass { class: base.name });
                    }
                    let resolved = ResolvedBase::new(base)?;
                    debug!(class = %resolved.schema.name, "registered base class");
                    base_index.insert(resolved.schema.name.clone(), bases.len());
                    bases.push(resolved);
                }
                ClassSchema::Concrete(concrete) => pending.push(concrete),
            }
        }

        // 2) link children into their parent's dispatch table
        let mut children = base_index
            .keys()
            .map(|name| (name.clone(), BTreeMap::<String, usize>::new()))
            .collect::<IndexMap<_, _>>();
        let mut concretes = Vec::<ResolvedConcrete>::with_capacity(pending.len());
        for schema in pending {
            let Some(parent) = schema.parent.clone() else {
                concretes.push(ResolvedConcrete {
                    ownership: schema.ownership.unwrap_or_default(),
                    parent: None,
                    extra_parameters: Vec::new(),
                    schema,
                });
                continue;
            };
            let Some(&base_at) = base_index.get(&parent.name) else {
                return Err(SchemaError::UnknownBaseClass {
                    class: schema.name,
                    base: parent.name,
                });
            };
            let base = &bases[base_at];
            let family = children.entry(parent.name.clone()).or_default();
            if let Some(&existing) = family.get(&parent.discriminator_literal) {
                return Err(SchemaError::DuplicateDiscriminator {
                    base: parent.name,
                    literal: parent.discriminator_literal,
                    existing: concretes[existing].schema.name.clone(),
                    class: schema.name,
                });
            }
            if let Some(declared) = schema.ownership {
                if declared != base.schema.ownership {
                    warn!(
                        class = %schema.name,
                        declared = %declared,
                        inherited = %base.schema.ownership,
                        "child pointer_type overridden by its base class"
                    );
                }
            }
            family.insert(parent.discriminator_literal.clone(), concretes.len());
            debug!(
                class = %schema.name,
                base = %parent.name,
                literal = %parent.discriminator_literal,
                "linked child class"
            );
            concretes.push(ResolvedConcrete {
                ownership: base.schema.ownership,
                parent: Some(base_at),
                extra_parameters: base.extra_parameters.clone(),
                schema,
            });
        }

        // 3) constructor members must exist
        for concrete in &concretes {
            let schema = &concrete.schema;
            if let Some(missing) = schema.constructor.iter().find(|c| schema.member(c).is_none()) {
                return Err(SchemaError::MissingConstructorMember {
                    class: schema.name.clone(),
                    member: missing.clone(),
                });
            }
        }

        // 4) optional only on pointers
        let all_members = bases
            .iter()
            .map(|b| (&b.schema.name, &b.schema.members))
            .chain(concretes.iter().map(|c| (&c.schema.name, &c.schema.members)));
        for (class, members) in all_members {
            check_optional_members(class, members)?;
        }

        let registry = Self {
            bases,
            concretes,
            base_index,
            children,
            includes,
        };

        // 5) declared discriminator domains are covered exactly
        for base in &registry.bases {
            registry.check_discriminator_domain(base)?;
        }

        Ok(registry)
    }
}

impl ResolvedBase {
    fn new(schema: BaseClassSchema) -> Result<Self> {
        // `class_type` names the member itself or its serialized key
        let discriminator = schema
            .member(&schema.discriminator_field)
            .or_else(|| {
                schema
                    .members
                    .iter()
                    .find(|m| m.serialize_key == schema.discriminator_field)
            })
            .ok_or_else(|| SchemaError::MissingDiscriminatorMember {
                class: schema.name.clone(),
                field: schema.discriminator_field.clone(),
            })?;
        let discriminator_member = discriminator.name.clone();
        let discriminator_type = discriminator.ty.clone();
        let extra_parameters = schema
            .extra_parameters
            .iter()
            .map(|name| match schema.member(name) {
                Some(member) => Ok(Parameter {
                    name: name.clone(),
                    ty: member.ty.clone(),
                }),
                None => Err(SchemaError::MissingExtraParameterType {
                    class: schema.name.clone(),
                    parameter: name.clone(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            schema,
            discriminator_member,
            discriminator_type,
            extra_parameters,
        })
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Whether a member is consumed by dispatch rather than assigned afterwards.
    pub fn is_dispatch_input(&self, member: &MemberVariable) -> bool {
        let named = |name: &str| member.name == name || member.serialize_key == name;
        named(&self.discriminator_member)
            || named(&self.schema.discriminator_field)
            || self.extra_parameters.iter().any(|p| named(&p.name))
    }
}

impl ResolvedConcrete {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn discriminator_literal(&self) -> Option<&str> {
        self.schema
            .parent
            .as_ref()
            .map(|p| p.discriminator_literal.as_str())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// QUERIES
// ————————————————————————————————————————————————————————————————————————————

impl Registry {
    pub fn bases(&self) -> &[ResolvedBase] {
        &self.bases
    }

    pub fn concretes(&self) -> &[ResolvedConcrete] {
        &self.concretes
    }

    pub fn base(&self, name: &str) -> Option<&ResolvedBase> {
        self.base_index.get(name).map(|&at| &self.bases[at])
    }

    pub fn parent_of(&self, concrete: &ResolvedConcrete) -> Option<&ResolvedBase> {
        concrete.parent.map(|at| &self.bases[at])
    }

    /// Children of a base in ascending discriminator-literal order.
    pub fn children_of<'a>(
        &'a self,
        base: &str,
    ) -> impl Iterator<Item = (&'a str, &'a ResolvedConcrete)> + 'a {
        self.children
            .get(base)
            .into_iter()
            .flat_map(move |family| {
                family
                    .iter()
                    .map(move |(literal, &at)| (literal.as_str(), &self.concretes[at]))
            })
    }

    /// Entry includes in declaration order, duplicates kept.
    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    fn check_discriminator_domain(&self, base: &ResolvedBase) -> Result<()> {
        let Some(domain) = &base.schema.discriminator_values else {
            return Ok(());
        };
        let family = self.children.get(base.name());
        for literal in domain {
            if !family.is_some_and(|f| f.contains_key(literal)) {
                return Err(SchemaError::UncoveredDiscriminator {
                    class: base.name().to_string(),
                    literal: literal.clone(),
                });
            }
        }
        for (literal, child) in self.children_of(base.name()) {
            if !domain.iter().any(|d| d == literal) {
                return Err(SchemaError::UndeclaredDiscriminator {
                    base: base.name().to_string(),
                    class: child.name().to_string(),
                    literal: literal.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn check_optional_members(class: &str, members: &[MemberVariable]) -> Result<()> {
    match members.iter().find(|m| m.optional && !m.ty.is_pointer()) {
        Some(member) => Err(SchemaError::InvalidOptionalUsage {
            class: class.to_string(),
            member: member.name.clone(),
            ty: member.ty.raw.clone(),
        }),
        None => Ok(()),
    }
}
