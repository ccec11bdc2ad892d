use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName as XmlQName, ResolveResult};
use quick_xml::reader::NsReader;

use super::WSA_NAMESPACE;
use crate::error::{AddressingError, AddressingResult};
use crate::model::{
    AddressingHeaders, AttributedQName, AttributedUnsignedLong, AttributedUri, EndpointReference,
    ExtensionAttributes, ExtensionElement, Metadata, ProblemAction, ReferenceParameters, RelatesTo,
    RelationshipKind,
};
use crate::qname::QName;
use crate::validation::{parse_unsigned_long, validate_uri};

/// Decode the WS-Addressing headers of a document read from `input`.
///
/// Elements outside the addressing namespace are traversed transparently;
/// unrecognized elements inside it are skipped whole. A repeated singleton
/// header keeps its last occurrence.
pub fn decode_headers<R: BufRead>(input: R) -> AddressingResult<AddressingHeaders> {
    HeaderReader::new(input).decode()
}

/// Convenience wrapper over [`decode_headers`] for in-memory documents.
pub fn decode_headers_str(input: &str) -> AddressingResult<AddressingHeaders> {
    decode_headers(input.as_bytes())
}

/// One scanned start tag, detached from the reader's buffers.
enum Scanned {
    Element {
        start: BytesStart<'static>,
        wsa: bool,
        empty: bool,
    },
    End(Vec<u8>),
    Eof,
    Other,
}

struct HeaderReader<R: BufRead> {
    reader: NsReader<R>,
}

impl<R: BufRead> HeaderReader<R> {
    fn new(input: R) -> Self {
        Self {
            reader: NsReader::from_reader(input),
        }
    }

    fn decode(&mut self) -> AddressingResult<AddressingHeaders> {
        let mut headers = AddressingHeaders::default();
        let mut buf = Vec::new();
        loop {
            match self.scan(&mut buf)? {
                Scanned::Element { start, wsa: true, empty } => {
                    self.dispatch(&mut headers, &start, empty)?;
                }
                Scanned::Eof => break,
                _ => {}
            }
        }
        Ok(headers)
    }

    /// Reads the next event, resolving the element namespace and detaching
    /// start tags from the internal buffer so child parsing can continue.
    fn scan(&mut self, buf: &mut Vec<u8>) -> AddressingResult<Scanned> {
        buf.clear();
        let (resolve, event) = self.reader.read_resolved_event_into(buf)?;
        Ok(match event {
            Event::Start(e) => Scanned::Element {
                wsa: is_wsa(&resolve),
                start: e.to_owned(),
                empty: false,
            },
            Event::Empty(e) => Scanned::Element {
                wsa: is_wsa(&resolve),
                start: e.to_owned(),
                empty: true,
            },
            Event::End(e) => Scanned::End(e.name().as_ref().to_vec()),
            Event::Eof => Scanned::Eof,
            _ => Scanned::Other,
        })
    }

    fn dispatch(
        &mut self,
        headers: &mut AddressingHeaders,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<()> {
        match start.local_name().as_ref() {
            b"To" => headers.to = Some(self.parse_attributed_uri(start, empty)?),
            b"From" => headers.from = Some(self.parse_endpoint_reference(start, empty)?),
            b"ReplyTo" => headers.reply_to = Some(self.parse_endpoint_reference(start, empty)?),
            b"FaultTo" => headers.fault_to = Some(self.parse_endpoint_reference(start, empty)?),
            b"Action" => headers.action = Some(self.parse_attributed_uri(start, empty)?),
            b"MessageID" => headers.message_id = Some(self.parse_attributed_uri(start, empty)?),
            b"RelatesTo" => headers.relates_to.push(self.parse_relates_to(start, empty)?),
            b"RetryAfter" => headers.retry_after = Some(self.parse_unsigned_long(start, empty)?),
            b"ProblemAction" => {
                headers.problem_action = Some(self.parse_problem_action(start, empty)?)
            }
            b"ProblemHeaderQName" => {
                headers.problem_header = Some(self.parse_attributed_qname(start, empty)?)
            }
            _ => {
                tracing::debug!(
                    element = %display_name(start),
                    "skipping unrecognized addressing element"
                );
                if !empty {
                    self.skip_element(start)?;
                }
            }
        }
        Ok(())
    }

    fn parse_attributed_uri(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<AttributedUri> {
        let mut uri = AttributedUri::new();
        uri.attributes = self.collect_attributes(start)?;
        if !empty
            && let Some(text) = self.read_simple_content(start)?
        {
            uri.set_value(validate_uri(&text)?);
        }
        Ok(uri)
    }

    fn parse_unsigned_long(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<AttributedUnsignedLong> {
        let mut value = AttributedUnsignedLong::new();
        value.attributes = self.collect_attributes(start)?;
        if !empty
            && let Some(text) = self.read_simple_content(start)?
        {
            value.set_value(parse_unsigned_long(&text)?);
        }
        Ok(value)
    }

    fn parse_attributed_qname(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<AttributedQName> {
        let mut qname = AttributedQName::new();
        qname.attributes = self.collect_attributes(start)?;
        if !empty
            && let Some(text) = self.read_simple_content(start)?
        {
            qname.set_value(QName::parse_lexical(&text)?);
        }
        Ok(qname)
    }

    fn parse_relates_to(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<RelatesTo> {
        let mut attributes = self.collect_attributes(start)?;
        // RelationshipType is unqualified in the schema.
        let relationship = attributes
            .remove(&QName::new("RelationshipType"))
            .map(|uri| RelationshipKind::from_uri(uri.trim()))
            .unwrap_or_default();
        let body = if empty {
            None
        } else {
            self.read_simple_content(start)?
        };
        let uri = body.ok_or_else(|| AddressingError::MissingElement {
            parent: display_name(start),
            expected: "related message URI content".to_string(),
        })?;
        Ok(RelatesTo {
            uri: validate_uri(&uri)?.to_string(),
            relationship,
            attributes,
        })
    }

    fn parse_endpoint_reference(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<EndpointReference> {
        let attributes = self.collect_attributes(start)?;
        let mut address = None;
        let mut reference_parameters = None;
        let mut metadata = None;

        if !empty {
            let end_name = start.name().as_ref().to_vec();
            let mut buf = Vec::new();
            loop {
                match self.scan(&mut buf)? {
                    Scanned::Element { start: child, wsa: true, empty: child_empty } => {
                        match child.local_name().as_ref() {
                            b"Address" => {
                                address = Some(self.parse_attributed_uri(&child, child_empty)?)
                            }
                            b"ReferenceParameters" => {
                                reference_parameters = Some(ReferenceParameters {
                                    elements: self.collect_extension_elements(&child, child_empty)?,
                                })
                            }
                            b"Metadata" => {
                                metadata = Some(Metadata {
                                    elements: self.collect_extension_elements(&child, child_empty)?,
                                })
                            }
                            _ => {
                                if !child_empty {
                                    self.skip_element(&child)?;
                                }
                            }
                        }
                    }
                    Scanned::Element { start: child, wsa: false, empty: child_empty } => {
                        // Open content on the reference itself is not modeled.
                        tracing::debug!(
                            element = %display_name(&child),
                            "skipping endpoint reference open content"
                        );
                        if !child_empty {
                            self.skip_element(&child)?;
                        }
                    }
                    Scanned::End(name) if name == end_name => break,
                    Scanned::Eof => return Err(unexpected_eof(&end_name)),
                    _ => {}
                }
            }
        }

        let address = address.ok_or_else(|| AddressingError::MissingElement {
            parent: display_name(start),
            expected: "wsa:Address".to_string(),
        })?;
        Ok(EndpointReference {
            address,
            reference_parameters,
            metadata,
            attributes,
        })
    }

    fn parse_problem_action(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<ProblemAction> {
        let attributes = self.collect_attributes(start)?;
        let mut action = None;
        let mut soap_action = None;

        if !empty {
            let end_name = start.name().as_ref().to_vec();
            let mut buf = Vec::new();
            loop {
                match self.scan(&mut buf)? {
                    Scanned::Element { start: child, wsa: true, empty: child_empty } => {
                        match child.local_name().as_ref() {
                            b"Action" => {
                                action = Some(self.parse_attributed_uri(&child, child_empty)?)
                            }
                            b"SoapAction" => {
                                soap_action = if child_empty {
                                    None
                                } else {
                                    self.read_simple_content(&child)?
                                        .map(|text| validate_uri(&text).map(str::to_string))
                                        .transpose()?
                                };
                            }
                            _ => {
                                if !child_empty {
                                    self.skip_element(&child)?;
                                }
                            }
                        }
                    }
                    Scanned::Element { start: child, empty: child_empty, .. } => {
                        if !child_empty {
                            self.skip_element(&child)?;
                        }
                    }
                    Scanned::End(name) if name == end_name => break,
                    Scanned::Eof => return Err(unexpected_eof(&end_name)),
                    _ => {}
                }
            }
        }

        Ok(ProblemAction {
            action,
            soap_action,
            attributes,
        })
    }

    fn collect_extension_elements(
        &mut self,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> AddressingResult<Vec<ExtensionElement>> {
        let mut elements = Vec::new();
        if empty {
            return Ok(elements);
        }
        let end_name = start.name().as_ref().to_vec();
        let mut buf = Vec::new();
        loop {
            match self.scan(&mut buf)? {
                Scanned::Element { start: child, empty: child_empty, .. } => {
                    let name = self.element_qname(&child);
                    let attributes = self.collect_attributes(&child)?;
                    let text = if child_empty {
                        None
                    } else {
                        self.read_flattened_text(&child)?
                    };
                    elements.push(ExtensionElement {
                        name,
                        attributes,
                        text,
                    });
                }
                Scanned::End(name) if name == end_name => break,
                Scanned::Eof => return Err(unexpected_eof(&end_name)),
                _ => {}
            }
        }
        Ok(elements)
    }

    /// Reads simple content up to the matching end tag. Child elements are
    /// a schema violation for simple-content types.
    fn read_simple_content(&mut self, start: &BytesStart<'_>) -> AddressingResult<Option<String>> {
        let end_name = start.name().as_ref().to_vec();
        let mut text = String::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let (_, event) = self.reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Text(e) => text.push_str(&e.unescape()?),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
                Event::Start(e) | Event::Empty(e) => {
                    return Err(AddressingError::UnexpectedElement {
                        expected: format!(
                            "character content in '{}'",
                            String::from_utf8_lossy(&end_name)
                        ),
                        found: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    });
                }
                Event::End(e) if e.name().as_ref() == end_name.as_slice() => break,
                Event::Eof => return Err(unexpected_eof(&end_name)),
                _ => {}
            }
        }
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Like [`Self::read_simple_content`] but tolerant of nested markup:
    /// character data is accumulated across it. Used for open content.
    fn read_flattened_text(&mut self, start: &BytesStart<'_>) -> AddressingResult<Option<String>> {
        let end_name = start.name().as_ref().to_vec();
        let mut text = String::new();
        let mut depth = 0usize;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let (_, event) = self.reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Text(e) => text.push_str(&e.unescape()?),
                Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
                Event::Start(_) => depth += 1,
                Event::End(e) => {
                    if depth == 0 && e.name().as_ref() == end_name.as_slice() {
                        break;
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => return Err(unexpected_eof(&end_name)),
                _ => {}
            }
        }
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Consumes an element and everything inside it.
    fn skip_element(&mut self, start: &BytesStart<'_>) -> AddressingResult<()> {
        let end_name = start.name().as_ref().to_vec();
        let mut depth = 0usize;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let (_, event) = self.reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Start(_) => depth += 1,
                Event::End(e) => {
                    if depth == 0 && e.name().as_ref() == end_name.as_slice() {
                        return Ok(());
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => return Err(unexpected_eof(&end_name)),
                _ => {}
            }
        }
    }

    /// Partitions a start tag's attributes into the extension map, dropping
    /// namespace declarations. Field-mapped attributes (RelationshipType)
    /// are pulled back out by the callers that know about them.
    fn collect_attributes(&self, start: &BytesStart<'_>) -> AddressingResult<ExtensionAttributes> {
        let mut attributes = ExtensionAttributes::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = attr.key;
            if key.as_ref() == b"xmlns" || key.as_ref().starts_with(b"xmlns:") {
                continue;
            }
            let value = attr.unescape_value()?.into_owned();
            attributes.set(self.attribute_qname(key), value);
        }
        Ok(attributes)
    }

    fn attribute_qname(&self, key: XmlQName<'_>) -> QName {
        let (resolve, local) = self.reader.resolve_attribute(key);
        QName {
            namespace: bound_namespace(&resolve),
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
            prefix: key
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
        }
    }

    fn element_qname(&self, start: &BytesStart<'_>) -> QName {
        let name = start.name();
        let (resolve, local) = self.reader.resolve_element(name);
        QName {
            namespace: bound_namespace(&resolve),
            local: String::from_utf8_lossy(local.as_ref()).into_owned(),
            prefix: name
                .prefix()
                .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned()),
        }
    }
}

fn is_wsa(resolve: &ResolveResult<'_>) -> bool {
    matches!(resolve, ResolveResult::Bound(Namespace(ns)) if *ns == WSA_NAMESPACE.as_bytes())
}

fn bound_namespace(resolve: &ResolveResult<'_>) -> Option<String> {
    match resolve {
        ResolveResult::Bound(Namespace(ns)) => Some(String::from_utf8_lossy(ns).into_owned()),
        _ => None,
    }
}

fn display_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn unexpected_eof(end_name: &[u8]) -> AddressingError {
    AddressingError::UnexpectedElement {
        expected: format!("</{}>", String::from_utf8_lossy(end_name)),
        found: "end of document".to_string(),
    }
}
