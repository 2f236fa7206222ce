//! Resolution-time failures. Every variant is fatal for the schema file being
//! generated and names the class it was raised for.

use thiserror::Error;

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Entry shape is wrong: missing keys, wrong value types, illegal field combinations.
    #[error("malformed schema entry {location}: {message}")]
    SchemaFormat { location: String, message: String },

    #[error("duplicate base class `{class}`")]
    DuplicateBaseClass { class: String },

    #[error("unknown base class `{base}` for entry `{class}`")]
    UnknownBaseClass { class: String, base: String },

    #[error("duplicate discriminator `{literal}` in base class `{base}` (claimed by `{existing}` and `{class}`)")]
    DuplicateDiscriminator {
        base: String,
        literal: String,
        existing: String,
        class: String,
    },

    #[error("constructor member `{member}` of `{class}` was not found in its members list")]
    MissingConstructorMember { class: String, member: String },

    #[error("optional can only be combined with pointers (in `{class}`, member `{member}` of type `{ty}`)")]
    InvalidOptionalUsage {
        class: String,
        member: String,
        ty: String,
    },

    #[error("extra parameter `{parameter}` of `{class}` is not one of its members, so its type is unknown")]
    MissingExtraParameterType { class: String, parameter: String },

    #[error("discriminator field `{field}` of base class `{class}` is not one of its members")]
    MissingDiscriminatorMember { class: String, field: String },

    #[error("discriminator `{literal}` of base class `{class}` has no child class")]
    UncoveredDiscriminator { class: String, literal: String },

    #[error("child `{class}` uses discriminator `{literal}` which base class `{base}` does not declare")]
    UndeclaredDiscriminator {
        base: String,
        class: String,
        literal: String,
    },
}

impl SchemaError {
    pub(crate) fn format(location: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::SchemaFormat {
            location: location.into(),
            message: message.into(),
        }
    }

    /// The class the error was raised for, when one is known.
    pub fn class(&self) -> Option<&str> {
        match self {
            SchemaError::SchemaFormat { .. } => None,
            SchemaError::DuplicateBaseClass { class }
            | SchemaError::UnknownBaseClass { class, .. }
            | SchemaError::DuplicateDiscriminator { class, .. }
            | SchemaError::MissingConstructorMember { class, .. }
            | SchemaError::InvalidOptionalUsage { class, .. }
            | SchemaError::MissingExtraParameterType { class, .. }
            | SchemaError::MissingDiscriminatorMember { class, .. }
            | SchemaError::UncoveredDiscriminator { class, .. }
            | SchemaError::UndeclaredDiscriminator { class, .. } => Some(class),
        }
    }
}
