//! Typed Gradle Module Metadata (format version 1.1)
//!
//! Field declaration order is the serialization order. Optional fields and empty
//! collections are skipped on write, except `formatVersion` and `variants`, which are
//! always emitted. Keys the model does not declare are rejected, so nothing is dropped
//! when a relocated file is written back.

use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The only metadata format revision this tool reads and writes
pub const FORMAT_VERSION: &str = "1.1";

/// Attribute maps keep their source order
pub type Attributes = IndexMap<String, AttributeValue>;

/// Root of a `.module` file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleMetadata {
  #[serde(default = "default_format_version")]
  pub format_version: String,

  pub component: Component,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_by: Option<CreatedBy>,

  #[serde(default)]
  pub variants: Vec<Variant>,
}

fn default_format_version() -> String {
  FORMAT_VERSION.to_string()
}

/// Identity of the component described by the module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Component {
  pub group: String,
  pub module: String,
  pub version: String,
  /// Where the component's own metadata lives (set on secondary modules)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub attributes: Attributes,
}

/// Producer of the metadata file. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatedBy {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub gradle: Option<GradleInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GradleInfo {
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_id: Option<String>,
}

/// One configuration or platform facet of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Variant {
  pub name: String,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub attributes: Attributes,
  /// Points at another module that carries this variant's files
  #[serde(rename = "available-at", default, skip_serializing_if = "Option::is_none")]
  pub available_at: Option<AvailableAt>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<Dependency>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependency_constraints: Vec<DependencyConstraint>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub files: Vec<VariantFile>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvailableAt {
  pub url: String,
  pub group: String,
  pub module: String,
  pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Dependency {
  pub group: String,
  pub module: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<VersionConstraint>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub excludes: Vec<Exclude>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub attributes: Attributes,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub requested_capabilities: Vec<Capability>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub endorse_strict_versions: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub third_party_compatibility: Option<ThirdPartyCompatibility>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyConstraint {
  pub group: String,
  pub module: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<VersionConstraint>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionConstraint {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub requires: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prefers: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub strictly: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub rejects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Exclude {
  pub group: String,
  pub module: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capability {
  pub group: String,
  pub name: String,
  pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThirdPartyCompatibility {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact_selector: Option<ArtifactSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSelector {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extension: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub classifier: Option<String>,
}

/// A file attached to a variant. `url` is relative to the `.module` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantFile {
  pub name: String,
  pub url: String,
  pub size: u64,
  pub sha512: String,
  pub sha256: String,
  pub sha1: String,
  pub md5: String,
}

/// Attribute value, written as a bare JSON primitive with no type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
  String(String),
  Boolean(bool),
  Integer(i64),
}

impl fmt::Display for AttributeValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AttributeValue::String(s) => write!(f, "{}", s),
      AttributeValue::Boolean(b) => write!(f, "{}", b),
      AttributeValue::Integer(i) => write!(f, "{}", i),
    }
  }
}

impl From<&str> for AttributeValue {
  fn from(value: &str) -> Self {
    AttributeValue::String(value.to_string())
  }
}

impl From<bool> for AttributeValue {
  fn from(value: bool) -> Self {
    AttributeValue::Boolean(value)
  }
}

impl From<i64> for AttributeValue {
  fn from(value: i64) -> Self {
    AttributeValue::Integer(value)
  }
}

impl Serialize for AttributeValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      AttributeValue::String(s) => serializer.serialize_str(s),
      AttributeValue::Boolean(b) => serializer.serialize_bool(*b),
      AttributeValue::Integer(i) => serializer.serialize_i64(*i),
    }
  }
}

struct AttributeValueVisitor;

// The visitor is driven by the primitive's JSON kind: a quoted "true" stays a string,
// a bare true is a boolean, and only whole numbers are accepted as integers.
impl<'de> Visitor<'de> for AttributeValueVisitor {
  type Value = AttributeValue;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("a string, boolean or integer attribute value")
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
    Ok(AttributeValue::String(v.to_string()))
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
    Ok(AttributeValue::String(v))
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
    Ok(AttributeValue::Boolean(v))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
    Ok(AttributeValue::Integer(v))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
    i64::try_from(v)
      .map(AttributeValue::Integer)
      .map_err(|_| E::custom(format!("attribute integer {} is out of range", v)))
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
    Err(E::custom(format!("unsupported attribute value type: {}", v)))
  }
}

impl<'de> Deserialize<'de> for AttributeValue {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(AttributeValueVisitor)
  }
}

impl ModuleMetadata {
  /// `<module>-<version>`, the base name shared by the module's published files
  pub fn base_name(&self) -> String {
    format!("{}-{}", self.component.module, self.component.version)
  }

  /// Every attached file across all variants, in declaration order
  pub fn files(&self) -> impl Iterator<Item = &VariantFile> {
    self.variants.iter().flat_map(|v| v.files.iter())
  }
}
