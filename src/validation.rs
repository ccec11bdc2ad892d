//! Lexical validation guards for the schema simple types the codec handles.
//!
//! These run at the wire boundary only. The in-memory model stores whatever
//! its field types can represent; documents that fall outside the schema's
//! lexical space are rejected here while decoding.

use crate::error::{AddressingError, AddressingResult};

/// Maximum value of xs:unsignedLong (2^64 - 1).
pub const UNSIGNED_LONG_MAX: u64 = u64::MAX;

/// Decimal digit count of [`UNSIGNED_LONG_MAX`].
pub const UNSIGNED_LONG_MAX_DIGITS: usize = 20;

/// Parses the lexical form of an xs:unsignedLong.
///
/// Surrounding whitespace is collapsed per the schema whitespace facet.
/// Signs, non-digit characters, and values past 2^64-1 are rejected; the
/// in-memory `u64` cannot hold them and a conformant deserializer must not
/// clamp silently.
pub fn parse_unsigned_long(raw: &str) -> AddressingResult<u64> {
    let value = raw.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressingError::ValueOutOfRange {
            value: raw.to_string(),
        });
    }
    value
        .parse::<u64>()
        .map_err(|_| AddressingError::ValueOutOfRange {
            value: raw.to_string(),
        })
}

/// Validates URI element content, returning the trimmed lexical value.
///
/// This is deliberately shallow: the schema type is anyURI, so only the
/// failure modes that break the wire form (empty content, embedded
/// whitespace) are rejected.
pub fn validate_uri(raw: &str) -> AddressingResult<&str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AddressingError::InvalidUri {
            value: raw.to_string(),
            reason: "empty URI".to_string(),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(AddressingError::InvalidUri {
            value: raw.to_string(),
            reason: "contains whitespace".to_string(),
        });
    }
    Ok(value)
}

/// Validates an NCName (prefix or local part of a qualified name).
///
/// Returns the reason on failure so callers can wrap it with the full
/// lexical value they were parsing.
pub fn validate_ncname(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("empty name part".to_string()),
        Some(first) if first.is_alphabetic() || first == '_' => {}
        Some(first) => return Err(format!("name cannot start with '{first}'")),
    }
    for c in chars {
        if !(c.is_alphanumeric() || c == '-' || c == '.' || c == '_') {
            return Err(format!("name contains '{c}'"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_the_full_unsigned_range() {
        assert_eq!(parse_unsigned_long("0").unwrap(), 0);
        assert_eq!(parse_unsigned_long("42").unwrap(), 42);
        assert_eq!(
            parse_unsigned_long("18446744073709551615").unwrap(),
            UNSIGNED_LONG_MAX
        );
        assert_eq!(parse_unsigned_long(" 7\n").unwrap(), 7);
        assert_eq!(parse_unsigned_long("007").unwrap(), 7);
    }

    #[test]
    fn rejects_signed_and_malformed_values() {
        assert_matches!(
            parse_unsigned_long("-1"),
            Err(AddressingError::ValueOutOfRange { .. })
        );
        assert_matches!(
            parse_unsigned_long("+1"),
            Err(AddressingError::ValueOutOfRange { .. })
        );
        assert_matches!(
            parse_unsigned_long("1e3"),
            Err(AddressingError::ValueOutOfRange { .. })
        );
        assert_matches!(
            parse_unsigned_long(""),
            Err(AddressingError::ValueOutOfRange { .. })
        );
    }

    #[test]
    fn rejects_overflow_past_the_schema_maximum() {
        assert_matches!(
            parse_unsigned_long("18446744073709551616"),
            Err(AddressingError::ValueOutOfRange { .. })
        );
        assert_eq!("18446744073709551615".len(), UNSIGNED_LONG_MAX_DIGITS);
    }

    #[test]
    fn uri_validation_trims_and_rejects_whitespace() {
        assert_eq!(
            validate_uri(" http://example.org/a ").unwrap(),
            "http://example.org/a"
        );
        assert_matches!(validate_uri("   "), Err(AddressingError::InvalidUri { .. }));
        assert_matches!(
            validate_uri("http://example.org/a b"),
            Err(AddressingError::InvalidUri { .. })
        );
    }

    #[test]
    fn ncname_rules() {
        assert!(validate_ncname("Action").is_ok());
        assert!(validate_ncname("_x-1.y").is_ok());
        assert!(validate_ncname("").is_err());
        assert!(validate_ncname("1a").is_err());
        assert!(validate_ncname("a:b").is_err());
    }
}
