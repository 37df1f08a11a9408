//! Element tree to [`XmlValue`] conversion.
//!
//! Whether a group of siblings becomes a mapping or a sequence is decided
//! by the tags of its first two elements only. Repeating tags further down
//! a heterogeneous group overwrite each other; a group whose first two tags
//! match is read as a sequence even if later tags differ.
//!
//! At the root, child tags overwrite same-named attributes. Below the root,
//! an element's attributes are applied last and win.

use recnorm_model::{XmlMapping, XmlValue};

use crate::element::XmlElement;
use crate::error::Result;

/// Convert a parsed document. The root is always read as a mapping of its
/// attributes and then its children keyed by tag.
pub fn convert_element(root: &XmlElement) -> XmlValue {
    XmlValue::Mapping(element_mapping(root))
}

/// Parse and convert a document held in a string.
pub fn convert_str(xml: &str) -> Result<XmlValue> {
    XmlElement::parse(xml).map(|root| convert_element(&root))
}

/// Parse and convert a UTF-8 document held in raw bytes.
pub fn convert_bytes(xml: &[u8]) -> Result<XmlValue> {
    XmlElement::parse_bytes(xml).map(|root| convert_element(&root))
}

fn is_homogeneous(element: &XmlElement) -> bool {
    match element.children.as_slice() {
        [first, second, ..] => first.tag == second.tag,
        _ => false,
    }
}

fn attribute_mapping(element: &XmlElement) -> XmlMapping {
    element
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), XmlValue::Scalar(value.clone())))
        .collect()
}

/// Attributes first, then children keyed by tag. Later keys win.
fn element_mapping(element: &XmlElement) -> XmlMapping {
    let mut mapping = attribute_mapping(element);
    for child in &element.children {
        mapping.insert(child.tag.clone(), mapped_child(child));
    }
    mapping
}

/// Value of a child read inside a mapping.
fn mapped_child(child: &XmlElement) -> XmlValue {
    if is_homogeneous(child) {
        let mut mapping = XmlMapping::new();
        mapping.insert(child.children[0].tag.clone(), sequence(child));
        mapping.extend(attribute_mapping(child));
        XmlValue::Mapping(mapping)
    } else if child.has_children() {
        // Below the root, attributes win over same-named children.
        let mut mapping = element_mapping(child);
        mapping.extend(attribute_mapping(child));
        XmlValue::Mapping(mapping)
    } else if child.has_attributes() {
        // A leaf with attributes keeps only its attributes.
        XmlValue::Mapping(attribute_mapping(child))
    } else {
        child
            .trimmed_text()
            .map_or(XmlValue::Null, |text| XmlValue::Scalar(text.to_string()))
    }
}

/// Items of a homogeneous group. Leaves without text are skipped and leaf
/// attributes are ignored.
fn sequence(element: &XmlElement) -> XmlValue {
    let items = element
        .children
        .iter()
        .filter_map(|child| {
            if is_homogeneous(child) {
                Some(sequence(child))
            } else if child.has_children() {
                Some(XmlValue::Mapping(element_mapping(child)))
            } else {
                child
                    .trimmed_text()
                    .map(|text| XmlValue::Scalar(text.to_string()))
            }
        })
        .collect();
    XmlValue::Sequence(items)
}
