//! Schema loader: one JSON entry in, one typed class record out.
//!
//! An entry is a base class iff it carries `class_type` (the discriminator
//! member's name); everything else is a concrete class. Each variant only
//! holds the fields that are legal for it, so kind-illegal combinations are
//! rejected here rather than silently ignored downstream.
pub mod member;
mod raw;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{Result, SchemaError};
use crate::path_de;

pub use member::{MemberVariable, OwnershipKind, TypeDescriptor, TypeKind};
use raw::{RawEntry, RawMember};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassSchema {
    Base(BaseClassSchema),
    Concrete(ConcreteClassSchema),
}

/// Root of a polymorphic family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseClassSchema {
    pub name: String,
    pub discriminator_field: String,
    pub ownership: OwnershipKind,
    /// Member names forwarded to every child's deserialize routine.
    pub extra_parameters: Vec<String>,
    pub members: Vec<MemberVariable>,
    pub custom_implementation: bool,
    pub return_type: Option<String>,
    pub includes: Vec<String>,
    /// Full discriminator domain, when the schema spells it out.
    pub discriminator_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcreteClassSchema {
    pub name: String,
    pub parent: Option<ParentRef>,
    /// As declared; hierarchy members inherit their parent's during resolution.
    pub ownership: Option<OwnershipKind>,
    /// Members consumed positionally by the constructor, in call order.
    pub constructor: Vec<String>,
    pub members: Vec<MemberVariable>,
    pub custom_implementation: bool,
    pub custom_dispatch_body: Option<String>,
    pub return_type: Option<String>,
    pub includes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
    pub name: String,
    pub discriminator_literal: String,
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

/// Parse a whole schema file: a JSON array of class entries.
pub fn load_document(src: &str) -> Result<Vec<ClassSchema>> {
    let entries = path_de::from_str_with_path::<Vec<Value>>(src)
        .map_err(|message| SchemaError::format("document", message))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            ClassSchema::from_value(entry).map_err(|error| match error {
                SchemaError::SchemaFormat { location, message } => SchemaError::SchemaFormat {
                    location: format!("#{index} {location}"),
                    message,
                },
                other => other,
            })
        })
        .collect()
}

impl ClassSchema {
    pub fn from_value(entry: &Value) -> Result<Self> {
        let raw = path_de::from_value_with_path::<RawEntry>(entry).map_err(|message| {
            let location = entry
                .get("class")
                .and_then(Value::as_str)
                .map(|name| format!("`{name}`"))
                .unwrap_or_else(|| "<unnamed>".to_string());
            SchemaError::format(location, message)
        })?;
        match raw.class_type.clone() {
            Some(discriminator_field) => load_base(raw, discriminator_field).map(ClassSchema::Base),
            None => load_concrete(raw).map(ClassSchema::Concrete),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ClassSchema::Base(x) => &x.name,
            ClassSchema::Concrete(x) => &x.name,
        }
    }

    pub fn members(&self) -> &[MemberVariable] {
        match self {
            ClassSchema::Base(x) => &x.members,
            ClassSchema::Concrete(x) => &x.members,
        }
    }

    pub fn includes(&self) -> &[String] {
        match self {
            ClassSchema::Base(x) => &x.includes,
            ClassSchema::Concrete(x) => &x.includes,
        }
    }

    pub fn is_custom(&self) -> bool {
        match self {
            ClassSchema::Base(x) => x.custom_implementation,
            ClassSchema::Concrete(x) => x.custom_implementation,
        }
    }
}

impl BaseClassSchema {
    pub fn member(&self, name: &str) -> Option<&MemberVariable> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl ConcreteClassSchema {
    pub fn member(&self, name: &str) -> Option<&MemberVariable> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn in_constructor(&self, member: &str) -> bool {
        self.constructor.iter().any(|c| c == member)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn load_base(raw: RawEntry, discriminator_field: String) -> Result<BaseClassSchema> {
    let location = format!("`{}`", raw.class);
    let illegal = [
        ("base", raw.base.is_some()),
        ("enum", raw.enum_.is_some()),
        ("constructor", raw.constructor.is_some()),
        ("custom_switch_code", raw.custom_switch_code.is_some()),
    ];
    if let Some((field, _)) = illegal.iter().find(|(_, present)| *present) {
        return Err(SchemaError::format(
            location,
            format!("`{field}` is not allowed on a base class entry"),
        ));
    }
    let ownership = raw.pointer_type.unwrap_or_default();
    if !ownership.is_indirect() {
        return Err(SchemaError::format(
            location,
            "a base class cannot be returned by value",
        ));
    }
    let members = load_members(&location, raw.members)?;
    Ok(BaseClassSchema {
        name: raw.class,
        discriminator_field,
        ownership,
        extra_parameters: raw.extra_parameters.unwrap_or_default(),
        members,
        custom_implementation: raw.custom_implementation,
        return_type: raw.return_type,
        includes: raw.includes,
        discriminator_values: raw.discriminator_values,
    })
}

fn load_concrete(raw: RawEntry) -> Result<ConcreteClassSchema> {
    let location = format!("`{}`", raw.class);
    if let Some(declared) = &raw.extra_parameters {
        warn!(
            class = %raw.class,
            ?declared,
            "child extra_parameters ignored, they are inherited from the base class"
        );
    }
    if raw.discriminator_values.is_some() {
        return Err(SchemaError::format(
            location,
            "`discriminator_values` requires `class_type`",
        ));
    }
    let parent = match (raw.base, raw.enum_) {
        (Some(name), Some(discriminator_literal)) => Some(ParentRef {
            name,
            discriminator_literal,
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(SchemaError::format(location, "`base` requires an `enum` value"));
        }
        (None, Some(_)) => {
            return Err(SchemaError::format(location, "`enum` requires a `base` class"));
        }
    };
    let members = load_members(&location, raw.members)?;
    Ok(ConcreteClassSchema {
        name: raw.class,
        parent,
        ownership: raw.pointer_type,
        constructor: raw.constructor.unwrap_or_default(),
        members,
        custom_implementation: raw.custom_implementation,
        custom_dispatch_body: raw.custom_switch_code,
        return_type: raw.return_type,
        includes: raw.includes,
    })
}

fn load_members(location: &str, raw: Vec<RawMember>) -> Result<Vec<MemberVariable>> {
    raw.into_iter()
        .map(|m| {
            let ty = TypeDescriptor::parse(m.type_);
            if m.base.is_some() && ty.kind != TypeKind::OwningPointer {
                return Err(SchemaError::format(
                    location,
                    format!("member `{}` uses `base` but is not an owning pointer", m.name),
                ));
            }
            let key = m.property.unwrap_or_else(|| m.name.clone());
            Ok(MemberVariable {
                serialize_key: m.serialize_property.unwrap_or_else(|| key.clone()),
                deserialize_key: m.deserialize_property.unwrap_or(key),
                name: m.name,
                ty,
                optional: m.optional,
                base_override: m.base,
            })
        })
        .collect()
}
