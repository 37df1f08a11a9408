//! XML payload handling.
//!
//! Payloads are parsed into an owned [`XmlElement`] tree with `quick-xml`
//! and then converted into nested [`XmlValue`]s using a sibling-tag
//! heuristic.
//!
//! ```
//! use recnorm_xml::convert_str;
//!
//! let value = convert_str(r#"<r id="9"><tags><t>a</t><t>b</t></tags></r>"#).unwrap();
//! assert_eq!(value.get("id").and_then(|v| v.as_str()), Some("9"));
//! let tags = value.pointer(["tags", "t"]).and_then(|v| v.as_sequence()).unwrap();
//! assert_eq!(tags.len(), 2);
//! ```

mod convert;
mod element;
mod error;

pub use convert::{convert_bytes, convert_element, convert_str};
pub use element::{XmlElement, parse_document};
pub use error::{Result, XmlError};
pub use recnorm_model::{XmlMapping, XmlValue};
