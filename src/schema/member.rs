use serde::{Deserialize, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Semantic category of a declared member type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Container,
    /// Shared handle, `shared_ptr<T>`.
    Pointer,
    /// Exclusively owned, declared as `T*` and spelled `unique_ptr<T>`.
    OwningPointer,
}

/// Declared type text plus its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub raw: String,
    pub kind: TypeKind,
}

/// How a constructed object is held and returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OwnershipKind {
    #[serde(rename = "value", alias = "none")]
    ByValue,
    #[default]
    #[serde(rename = "unique", alias = "unique_ptr")]
    UniqueOwning,
    #[serde(rename = "shared", alias = "shared_ptr")]
    SharedOwning,
}

/// One field of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberVariable {
    pub name: String,
    pub ty: TypeDescriptor,
    pub serialize_key: String,
    pub deserialize_key: String,
    pub optional: bool,
    /// Written through this base type, downcast back to `ty` on read.
    pub base_override: Option<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let kind = if trimmed.ends_with('*') {
            TypeKind::OwningPointer
        } else if trimmed.starts_with("shared_ptr<") {
            TypeKind::Pointer
        } else if trimmed.contains('<') {
            TypeKind::Container
        } else {
            TypeKind::Scalar
        };
        Self { raw, kind }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer | TypeKind::OwningPointer)
    }

    pub fn is_container(&self) -> bool {
        // shared_ptr<T> is a template instantiation too
        matches!(self.kind, TypeKind::Container | TypeKind::Pointer)
    }

    /// Containers and pointers are never copied into their destination.
    pub fn requires_move(&self) -> bool {
        self.is_container() || self.is_pointer()
    }

    /// Pointee name of an owning pointer (`Foo*` → `Foo`).
    pub fn pointee(&self) -> &str {
        self.raw.trim().trim_end_matches('*').trim()
    }
}

impl OwnershipKind {
    pub fn is_indirect(self) -> bool {
        !matches!(self, OwnershipKind::ByValue)
    }
}

impl std::fmt::Display for OwnershipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OwnershipKind::ByValue => "value",
            OwnershipKind::UniqueOwning => "unique",
            OwnershipKind::SharedOwning => "shared",
        };
        f.write_str(label)
    }
}

impl MemberVariable {
    pub fn requires_move(&self) -> bool {
        self.ty.requires_move()
    }
}
