use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{AddressingError, AddressingResult};
use crate::validation::validate_ncname;

/// A qualified XML name.
///
/// Equality and hashing consider the namespace and local part only; the
/// prefix is presentation, carried along so a decoded document re-encodes
/// the way it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
    pub prefix: Option<String>,
}

impl QName {
    /// An unqualified name.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
            prefix: None,
        }
    }

    /// A namespace-qualified name with no preferred prefix.
    pub fn with_namespace(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
            prefix: None,
        }
    }

    /// A namespace-qualified name with a preferred prefix.
    pub fn prefixed(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Parses a lexical `prefix:local` or `local` form.
    ///
    /// The namespace is left unresolved; binding a prefix to a namespace is
    /// the document's job, not the lexical form's.
    pub fn parse_lexical(value: &str) -> AddressingResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AddressingError::InvalidQName {
                value: value.to_string(),
                reason: "empty name".to_string(),
            });
        }
        match trimmed.split_once(':') {
            Some((prefix, local)) => {
                validate_ncname(prefix).map_err(|reason| AddressingError::InvalidQName {
                    value: value.to_string(),
                    reason,
                })?;
                validate_ncname(local).map_err(|reason| AddressingError::InvalidQName {
                    value: value.to_string(),
                    reason,
                })?;
                Ok(Self {
                    namespace: None,
                    local: local.to_string(),
                    prefix: Some(prefix.to_string()),
                })
            }
            None => {
                validate_ncname(trimmed).map_err(|reason| AddressingError::InvalidQName {
                    value: value.to_string(),
                    reason,
                })?;
                Ok(Self::new(trimmed))
            }
        }
    }

    /// The lexical `prefix:local` rendering used on the wire.
    pub fn lexical(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local),
            None => self.local.clone(),
        }
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.local == other.local
    }
}

impl Eq for QName {}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn equality_ignores_prefix() {
        let a = QName::prefixed("urn:example", "ex", "Key");
        let b = QName::with_namespace("urn:example", "Key");
        assert_eq!(a, b);
    }

    #[test]
    fn equality_respects_namespace() {
        let a = QName::with_namespace("urn:one", "Key");
        let b = QName::with_namespace("urn:two", "Key");
        assert_ne!(a, b);
        assert_ne!(a, QName::new("Key"));
    }

    #[test]
    fn parses_prefixed_lexical_form() {
        let name = QName::parse_lexical("wsa:Action").expect("qname");
        assert_eq!(name.prefix.as_deref(), Some("wsa"));
        assert_eq!(name.local, "Action");
        assert_eq!(name.namespace, None);
        assert_eq!(name.lexical(), "wsa:Action");
    }

    #[test]
    fn rejects_malformed_lexical_forms() {
        assert_matches!(
            QName::parse_lexical(""),
            Err(AddressingError::InvalidQName { .. })
        );
        assert_matches!(
            QName::parse_lexical(":local"),
            Err(AddressingError::InvalidQName { .. })
        );
        assert_matches!(
            QName::parse_lexical("a:b:c"),
            Err(AddressingError::InvalidQName { .. })
        );
        assert_matches!(
            QName::parse_lexical("1bad"),
            Err(AddressingError::InvalidQName { .. })
        );
    }
}
