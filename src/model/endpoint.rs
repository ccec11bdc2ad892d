use serde::{Deserialize, Serialize};

use super::attributes::ExtensionAttributes;
use super::types::AttributedUri;
use crate::qname::QName;

/// A flattened open-content child element, as carried by reference
/// parameters and metadata.
///
/// Only the name, attributes, and character content are kept; that is the
/// shape reference parameters take in practice, and it round-trips without
/// a DOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionElement {
    pub name: QName,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
    pub text: Option<String>,
}

impl ExtensionElement {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: ExtensionAttributes::new(),
            text: None,
        }
    }

    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        Self {
            name,
            attributes: ExtensionAttributes::new(),
            text: Some(text.into()),
        }
    }
}

/// `wsa:ReferenceParameters` — opaque per-endpoint routing state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceParameters {
    pub elements: Vec<ExtensionElement>,
}

/// `wsa:Metadata` — endpoint metadata carried alongside the address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub elements: Vec<ExtensionElement>,
}

/// `wsa:EndpointReference` and the header slots that reuse its type
/// (`wsa:From`, `wsa:ReplyTo`, `wsa:FaultTo`).
///
/// The address is mandatory in the schema and is therefore required at
/// construction rather than modeled as an option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointReference {
    pub address: AttributedUri,
    pub reference_parameters: Option<ReferenceParameters>,
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "ExtensionAttributes::is_empty")]
    pub attributes: ExtensionAttributes,
}

impl EndpointReference {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: AttributedUri::with_value(address),
            reference_parameters: None,
            metadata: None,
            attributes: ExtensionAttributes::new(),
        }
    }

    pub fn address_uri(&self) -> Option<&str> {
        self.address.value()
    }
}
