//! Owned XML element tree built with `quick-xml`.

use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, XmlError};

/// A parsed XML element.
///
/// `text` holds the character data that appears before the first child
/// element (entity references and CDATA sections resolved, whitespace kept).
/// Text between or after children is not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    /// Attributes in document order. Namespace declarations are not included.
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// The value of attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Element text with surrounding whitespace removed; None when that leaves nothing.
    pub fn trimmed_text(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|text| !text.is_empty())
    }

    /// Parse a complete document and return its root element.
    pub fn parse(input: &str) -> Result<Self> {
        parse_document(input)
    }

    /// Parse a complete UTF-8 document from raw bytes.
    pub fn parse_bytes(input: &[u8]) -> Result<Self> {
        parse_document(std::str::from_utf8(input)?)
    }

    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }
}

impl FromStr for XmlElement {
    type Err = XmlError;

    fn from_str(s: &str) -> Result<Self> {
        parse_document(s)
    }
}

/// Parse a complete document into its root element.
///
/// Anything outside elements, text and references is skipped.
pub fn parse_document(input: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|err| XmlError::Parse {
            position: reader.error_position() as u64,
            message: err.to_string(),
        })?;
        match event {
            Event::Start(ref start) => stack.push(element_from_start(start)?),
            Event::Empty(ref start) => {
                let element = element_from_start(start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| XmlError::Parse {
                    position: reader.buffer_position() as u64,
                    message: "closing tag without an open element".to_string(),
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref text) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(text.as_ref()));
                }
            }
            Event::CData(ref data) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(data.as_ref()));
                }
            }
            Event::GeneralRef(ref reference) => {
                let name = String::from_utf8_lossy(reference.as_ref()).into_owned();
                let resolved = resolve_reference(&name)?;
                if let Some(current) = stack.last_mut() {
                    current.push_text(&resolved);
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, DOCTYPE.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement { tag: open.tag });
    }
    let root = root.ok_or(XmlError::NoRootElement)?;
    tracing::debug!(
        root = %root.tag,
        bytes = input.len(),
        children = root.children.len(),
        "Parsed XML payload"
    );
    Ok(root)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(tag);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| XmlError::InvalidAttribute {
            tag: element.tag.clone(),
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attribute
            .unescape_value()
            .map_err(|err| XmlError::InvalidAttribute {
                tag: element.tag.clone(),
                message: err.to_string(),
            })?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots { tag: element.tag });
    }
    *root = Some(element);
    Ok(())
}

/// Resolve `&name;`: the five predefined entities or a numeric character reference.
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(text) = resolve_predefined_entity(name) {
        return Ok(text.to_string());
    }
    let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(decimal) = name.strip_prefix('#') {
        decimal.parse().ok()
    } else {
        None
    };
    code.and_then(char::from_u32)
        .map(String::from)
        .ok_or_else(|| XmlError::UnknownEntity {
            name: name.to_string(),
        })
}
