// Structured operations for generated routines. No target-language text here;
// `codegen` decides how each operation is spelled.

use serde::Serialize;

use crate::registry::Parameter;
use crate::schema::{OwnershipKind, TypeDescriptor};

// ————————————————————————————————————————————————————————————————————————————
// SERIALIZE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializeRoutine {
    pub class: String,
    pub ops: Vec<SerializeOp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SerializeOp {
    /// Call the parent's serialize first.
    DelegateToBase { base: String },
    WriteField {
        key: String,
        field: String,
        optional: bool,
        deref: bool,          // non-optional pointer: write the pointee
        upcast: Option<String>,
    },
}

// ————————————————————————————————————————————————————————————————————————————
// DESERIALIZE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeserializeRoutine {
    pub class: String,
    pub returns: Holder,
    /// Threaded ahead of the deserializer argument.
    pub parameters: Vec<Parameter>,
    pub ops: Vec<DeserializeOp>,
}

/// A class name plus the ownership wrapper around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holder {
    pub class: String,
    pub ownership: OwnershipKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeserializeOp {
    /// Bind a local named after the member.
    ReadField(ReadField),
    /// Empty result slot filled by dispatch.
    DeclareResult { holder: Holder },
    Construct { holder: Holder, args: Vec<Argument> },
    Dispatch(Dispatch),
    Assign {
        field: String,
        transfer: Transfer,
        through_pointer: bool,
    },
    Return { upcast: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadField {
    pub local: String,
    pub key: String,
    pub ty: TypeDescriptor,
    pub optional: bool,
    /// Read as this base type, then downcast to `ty`.
    pub downcast_from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    pub name: String,
    pub transfer: Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transfer {
    Move,
    Copy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub base: String,
    pub discriminator: String,
    pub enum_type: String,
    pub cases: Vec<DispatchCase>,     // ascending literal order
    pub default: DispatchDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchCase {
    pub literal: String,
    pub target: CaseTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum CaseTarget {
    Call {
        class: String,
        extra_arguments: Vec<String>,
    },
    /// Verbatim body; `result` must be assigned, `break` is appended.
    Custom { body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchDefault {
    /// Raise for a discriminator value with no matching child.
    UnsupportedDiscriminator,
}

// ————————————————————————————————————————————————————————————————————————————
// ARTIFACT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBody {
    pub serialize: SerializeRoutine,
    pub deserialize: DeserializeRoutine,
}

/// Everything one schema file turns into, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub generator: String,
    pub includes: Vec<String>,
    pub namespace: String,
    pub bodies: Vec<ClassBody>,
}

impl Transfer {
    pub fn for_move(moved: bool) -> Self {
        if moved { Transfer::Move } else { Transfer::Copy }
    }
}

impl DeserializeRoutine {
    pub fn reads(&self) -> impl Iterator<Item = &ReadField> {
        self.ops.iter().filter_map(|op| match op {
            DeserializeOp::ReadField(read) => Some(read),
            _ => None,
        })
    }

    pub fn dispatch(&self) -> Option<&Dispatch> {
        self.ops.iter().find_map(|op| match op {
            DeserializeOp::Dispatch(dispatch) => Some(dispatch),
            _ => None,
        })
    }
}

impl SerializeRoutine {
    pub fn written_keys(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            SerializeOp::WriteField { key, .. } => Some(key.as_str()),
            SerializeOp::DelegateToBase { .. } => None,
        })
    }
}
