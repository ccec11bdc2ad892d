pub mod config;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod qname;
pub mod validation;
pub mod xml;

pub use config::{CliArgs, InspectorConfig, OutputFormat};
pub use error::{AddressingError, AddressingResult};
pub use inspect::{DocumentFilter, DocumentSummary, HeaderSummary, ScanReport};
pub use logging::{LoggingConfig, init_logging};
pub use model::{
    AddressingHeaders, AttributedQName, AttributedUnsignedLong, AttributedUri, EndpointReference,
    ExtensionAttributes, ExtensionElement, Metadata, ProblemAction, RELATIONSHIP_REPLY,
    ReferenceParameters, RelatesTo, RelationshipKind,
};
pub use qname::QName;
pub use xml::{WSA_NAMESPACE, decode_headers, decode_headers_str, encode_headers, write_headers};
