//! Error taxonomy for the WS-Addressing data model and codec.
//!
//! Library code returns [`AddressingError`] so callers can match on the
//! failure; the binary and the workspace scanner wrap these in `anyhow`
//! context at the I/O seams.

use thiserror::Error;

/// Result type for addressing operations
pub type AddressingResult<T> = Result<T, AddressingError>;

/// Errors raised by the data model and the XML codec.
///
/// Wire-level validation lives here: the in-memory types accept anything
/// representable in their field types, and the codec rejects documents that
/// fall outside the schema's lexical space.
#[derive(Debug, Error)]
pub enum AddressingError {
    /// Lexical value does not fit xs:unsignedLong
    #[error("value '{value}' is not a valid xs:unsignedLong (expected a digit string in 0..=18446744073709551615)")]
    ValueOutOfRange { value: String },

    /// URI content failed lexical validation
    #[error("invalid URI '{value}': {reason}")]
    InvalidUri { value: String, reason: String },

    /// Qualified-name content failed lexical validation
    #[error("invalid qualified name '{value}': {reason}")]
    InvalidQName { value: String, reason: String },

    /// The parser met an element it cannot accept at this position
    #[error("unexpected '{found}' while reading {expected}")]
    UnexpectedElement { expected: String, found: String },

    /// A required child element was absent
    #[error("element '{parent}' is missing required child '{expected}'")]
    MissingElement { parent: String, expected: String },

    /// A required attribute was absent
    #[error("element '{element}' is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// Malformed XML below the schema layer
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute syntax
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let error = AddressingError::ValueOutOfRange {
            value: "-5".to_string(),
        };
        assert!(error.to_string().contains("'-5'"));
        assert!(error.to_string().contains("unsignedLong"));

        let error = AddressingError::MissingElement {
            parent: "wsa:EndpointReference".to_string(),
            expected: "wsa:Address".to_string(),
        };
        assert!(error.to_string().contains("wsa:Address"));
    }
}
