use std::io::Write;

use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use super::{WSA_NAMESPACE, WSA_PREFIX};
use crate::error::AddressingResult;
use crate::model::{
    AddressingHeaders, AttributedQName, AttributedUnsignedLong, AttributedUri, EndpointReference,
    ExtensionAttributes, ExtensionElement, ProblemAction, RelatesTo,
};

/// Encode the headers as a standalone block wrapped in a neutral `Header`
/// element that carries the `wsa` namespace binding.
pub fn encode_headers(headers: &AddressingHeaders) -> AddressingResult<String> {
    let mut buffer = Vec::new();
    let mut writer = Writer::new(&mut buffer);

    let mut root = BytesStart::new("Header");
    root.push_attribute((format!("xmlns:{WSA_PREFIX}").as_str(), WSA_NAMESPACE));
    writer.write_event(Event::Start(root))?;
    write_headers(&mut writer, headers)?;
    writer.write_event(Event::End(BytesEnd::new("Header")))?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the header elements into an existing document.
///
/// The caller is responsible for an in-scope `xmlns:wsa` binding;
/// [`encode_headers`] provides one for the standalone case.
pub fn write_headers<W: Write>(
    writer: &mut Writer<W>,
    headers: &AddressingHeaders,
) -> AddressingResult<()> {
    if let Some(to) = &headers.to {
        write_attributed_uri(writer, "wsa:To", to)?;
    }
    if let Some(from) = &headers.from {
        write_endpoint_reference(writer, "wsa:From", from)?;
    }
    if let Some(reply_to) = &headers.reply_to {
        write_endpoint_reference(writer, "wsa:ReplyTo", reply_to)?;
    }
    if let Some(fault_to) = &headers.fault_to {
        write_endpoint_reference(writer, "wsa:FaultTo", fault_to)?;
    }
    if let Some(action) = &headers.action {
        write_attributed_uri(writer, "wsa:Action", action)?;
    }
    if let Some(message_id) = &headers.message_id {
        write_attributed_uri(writer, "wsa:MessageID", message_id)?;
    }
    for relates_to in &headers.relates_to {
        write_relates_to(writer, relates_to)?;
    }
    if let Some(retry_after) = &headers.retry_after {
        write_unsigned_long(writer, "wsa:RetryAfter", retry_after)?;
    }
    if let Some(problem_action) = &headers.problem_action {
        write_problem_action(writer, problem_action)?;
    }
    if let Some(problem_header) = &headers.problem_header {
        write_attributed_qname(writer, "wsa:ProblemHeaderQName", problem_header)?;
    }
    Ok(())
}

fn write_attributed_uri<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    uri: &AttributedUri,
) -> AddressingResult<()> {
    let mut start = BytesStart::new(tag);
    push_extension_attributes(&mut start, &uri.attributes);
    writer.write_event(Event::Start(start))?;
    if let Some(value) = uri.value() {
        writer.write_event(Event::Text(BytesText::new(value)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_unsigned_long<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    value: &AttributedUnsignedLong,
) -> AddressingResult<()> {
    let mut start = BytesStart::new(tag);
    push_extension_attributes(&mut start, &value.attributes);
    writer.write_event(Event::Start(start))?;
    if let Some(v) = value.value() {
        writer.write_event(Event::Text(BytesText::new(&v.to_string())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_attributed_qname<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    qname: &AttributedQName,
) -> AddressingResult<()> {
    let mut start = BytesStart::new(tag);
    push_extension_attributes(&mut start, &qname.attributes);
    writer.write_event(Event::Start(start))?;
    if let Some(value) = qname.value() {
        writer.write_event(Event::Text(BytesText::new(&value.lexical())))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_relates_to<W: Write>(
    writer: &mut Writer<W>,
    relates_to: &RelatesTo,
) -> AddressingResult<()> {
    let mut start = BytesStart::new("wsa:RelatesTo");
    // The schema default; omitted when it applies so decode normalizes.
    if !relates_to.relationship.is_reply() {
        start.push_attribute(("RelationshipType", relates_to.relationship.as_uri()));
    }
    push_extension_attributes(&mut start, &relates_to.attributes);
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&relates_to.uri)))?;
    writer.write_event(Event::End(BytesEnd::new("wsa:RelatesTo")))?;
    Ok(())
}

fn write_endpoint_reference<W: Write>(
    writer: &mut Writer<W>,
    tag: &str,
    endpoint: &EndpointReference,
) -> AddressingResult<()> {
    let mut start = BytesStart::new(tag);
    push_extension_attributes(&mut start, &endpoint.attributes);
    writer.write_event(Event::Start(start))?;

    write_attributed_uri(writer, "wsa:Address", &endpoint.address)?;
    if let Some(parameters) = &endpoint.reference_parameters {
        writer.write_event(Event::Start(BytesStart::new("wsa:ReferenceParameters")))?;
        for element in &parameters.elements {
            write_extension_element(writer, element)?;
        }
        writer.write_event(Event::End(BytesEnd::new("wsa:ReferenceParameters")))?;
    }
    if let Some(metadata) = &endpoint.metadata {
        writer.write_event(Event::Start(BytesStart::new("wsa:Metadata")))?;
        for element in &metadata.elements {
            write_extension_element(writer, element)?;
        }
        writer.write_event(Event::End(BytesEnd::new("wsa:Metadata")))?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_problem_action<W: Write>(
    writer: &mut Writer<W>,
    problem_action: &ProblemAction,
) -> AddressingResult<()> {
    let mut start = BytesStart::new("wsa:ProblemAction");
    push_extension_attributes(&mut start, &problem_action.attributes);
    writer.write_event(Event::Start(start))?;
    if let Some(action) = &problem_action.action {
        write_attributed_uri(writer, "wsa:Action", action)?;
    }
    if let Some(soap_action) = &problem_action.soap_action {
        writer.write_event(Event::Start(BytesStart::new("wsa:SoapAction")))?;
        writer.write_event(Event::Text(BytesText::new(soap_action)))?;
        writer.write_event(Event::End(BytesEnd::new("wsa:SoapAction")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("wsa:ProblemAction")))?;
    Ok(())
}

fn write_extension_element<W: Write>(
    writer: &mut Writer<W>,
    element: &ExtensionElement,
) -> AddressingResult<()> {
    let tag = element.name.lexical();
    let mut start = BytesStart::new(tag.as_str());
    // Self-contained namespace binding so the element survives re-parenting.
    if let Some(namespace) = &element.name.namespace {
        match &element.name.prefix {
            Some(prefix) => {
                start.push_attribute((format!("xmlns:{prefix}").as_str(), namespace.as_str()))
            }
            None => start.push_attribute(("xmlns", namespace.as_str())),
        }
    }
    push_extension_attributes(&mut start, &element.attributes);
    writer.write_event(Event::Start(start))?;
    if let Some(text) = &element.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

/// Pushes extension attributes onto a start tag, first declaring any
/// prefixes they use. An attribute whose name has a namespace but no prefix
/// cannot be expressed on the wire (attributes ignore the default
/// namespace) and is written unqualified.
fn push_extension_attributes(start: &mut BytesStart<'_>, attributes: &ExtensionAttributes) {
    let mut declarations: IndexMap<&str, &str> = IndexMap::new();
    for (name, _) in attributes.iter() {
        if let (Some(namespace), Some(prefix)) = (&name.namespace, &name.prefix) {
            declarations.entry(prefix.as_str()).or_insert(namespace.as_str());
        }
    }
    for (prefix, namespace) in &declarations {
        start.push_attribute((format!("xmlns:{prefix}").as_str(), *namespace));
    }
    for (name, value) in attributes.iter() {
        start.push_attribute((name.lexical().as_str(), value));
    }
}
