// Wire shape of a schema entry, before kind-specific validation.

use serde::Deserialize;

use super::member::OwnershipKind;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEntry {
    pub class: String,
    /// Presence marks a base class; the value names the discriminator member.
    #[serde(default)]
    pub class_type: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default, rename = "enum")]
    pub enum_: Option<String>,
    #[serde(default)]
    pub extra_parameters: Option<Vec<String>>,
    #[serde(default)]
    pub pointer_type: Option<OwnershipKind>,
    #[serde(default)]
    pub constructor: Option<Vec<String>>,
    #[serde(default)]
    pub members: Vec<RawMember>,
    #[serde(default)]
    pub custom_implementation: bool,
    #[serde(default)]
    pub custom_switch_code: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub discriminator_values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub serialize_property: Option<String>,
    #[serde(default)]
    pub deserialize_property: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub base: Option<String>,
}
