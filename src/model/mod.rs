//! In-memory data model for the 2005/08 WS-Addressing types.
//!
//! Every type here embeds [`ExtensionAttributes`] rather than inheriting a
//! base class: the schema gives all addressing types the same ##other
//! attribute extension point, and composition keeps that capability visible
//! in the type instead of hidden in a hierarchy.
//!
//! The model is permissive by design. Accessors never validate; the wire
//! codec in [`crate::xml`] is the strict boundary.

mod attributes;
mod endpoint;
mod headers;
mod types;

pub use attributes::ExtensionAttributes;
pub use endpoint::{EndpointReference, ExtensionElement, Metadata, ReferenceParameters};
pub use headers::AddressingHeaders;
pub use types::{
    AttributedQName, AttributedUnsignedLong, AttributedUri, ProblemAction, RELATIONSHIP_REPLY,
    RelatesTo, RelationshipKind,
};
