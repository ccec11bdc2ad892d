use serde::{Deserialize, Serialize};
use std::fmt;

use super::attributes::ExtensionAttributes;
use crate::qname::QName;

/// The canonical reply relationship URI (the schema default for
/// `wsa:RelatesTo/@RelationshipType`).
pub const RELATIONSHIP_REPLY: &str = "http://www.w3.org/2005/08/addressing/reply";

/// An xs:unsignedLong-valued element with extension attributes — the
/// content model of `wsa:RetryAfter`.
///
/// The value is absent until set and accessors never validate: any `u64` is
/// storable, and range enforcement against the lexical wire form belongs to
/// the codec. Instances make no thread-safety promise beyond what the field
/// types derive; callers synchronize shared use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributedUnsignedLong {
    value: Option<u64>,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}

impl AttributedUnsignedLong {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self {
            value: Some(value),
            attributes: ExtensionAttributes::new(),
        }
    }

    /// Returns the stored value, or `None` if it was never set.
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    /// Replaces the stored value unconditionally. Last write wins; no
    /// history is retained.
    pub fn set_value(&mut self, value: u64) {
        self.value = Some(value);
    }

    /// Returns the field to the absent state.
    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

/// An anyURI-valued element with extension attributes — the content model
/// of `wsa:To`, `wsa:Action`, `wsa:MessageID`, and `wsa:Address`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributedUri {
    value: Option<String>,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}

impl AttributedUri {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            attributes: ExtensionAttributes::new(),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

/// A QName-valued element with extension attributes — the content model of
/// `wsa:ProblemHeaderQName`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributedQName {
    value: Option<QName>,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}

impl AttributedQName {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: QName) -> Self {
        Self {
            value: Some(value),
            attributes: ExtensionAttributes::new(),
        }
    }

    pub fn value(&self) -> Option<&QName> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: QName) {
        self.value = Some(value);
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

/// How a message relates to the one named by a `wsa:RelatesTo` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// The schema default relationship.
    Reply,
    /// Any other relationship URI.
    Other(String),
}

impl RelationshipKind {
    pub fn from_uri(uri: &str) -> Self {
        if uri == RELATIONSHIP_REPLY {
            RelationshipKind::Reply
        } else {
            RelationshipKind::Other(uri.to_string())
        }
    }

    pub fn as_uri(&self) -> &str {
        match self {
            RelationshipKind::Reply => RELATIONSHIP_REPLY,
            RelationshipKind::Other(uri) => uri,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.as_uri() == RELATIONSHIP_REPLY
    }
}

impl Default for RelationshipKind {
    fn default() -> Self {
        RelationshipKind::Reply
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_uri())
    }
}

/// `wsa:RelatesTo` — a related message URI plus the relationship kind.
///
/// The schema makes the URI body mandatory, so unlike the attributed value
/// types it is not optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatesTo {
    pub uri: String,
    #[serde(default, skip_serializing_if = "RelationshipKind::is_reply")]
    pub relationship: RelationshipKind,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}

impl RelatesTo {
    /// A reply relationship to the given message URI.
    pub fn reply(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            relationship: RelationshipKind::Reply,
            attributes: ExtensionAttributes::new(),
        }
    }

    pub fn with_relationship(uri: impl Into<String>, relationship: RelationshipKind) -> Self {
        Self {
            uri: uri.into(),
            relationship,
            attributes: ExtensionAttributes::new(),
        }
    }
}

/// `wsa:ProblemAction` — the action that triggered an addressing fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemAction {
    pub action: Option<AttributedUri>,
    pub soap_action: Option<String>,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}
