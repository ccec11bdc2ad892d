//! Streaming XML codec for the 2005/08 WS-Addressing namespace.
//!
//! The decoder recognizes addressing elements at any depth, so the same
//! entry point handles a bare header block, a SOAP envelope, or a larger
//! document with addressing headers embedded in it. The encoder emits the
//! mirror-image shapes with a `wsa` prefix.
//!
//! This layer is where the schema's lexical constraints are enforced; the
//! in-memory model stays permissive (see [`crate::model`]).

pub mod reader;
pub mod writer;

pub use reader::{decode_headers, decode_headers_str};
pub use writer::{encode_headers, write_headers};

/// The WS-Addressing 2005/08 namespace.
pub const WSA_NAMESPACE: &str = "http://www.w3.org/2005/08/addressing";

/// Prefix the encoder binds for addressing elements.
pub const WSA_PREFIX: &str = "wsa";
