//! Error types for XML payload parsing.

use thiserror::Error;

/// Errors that can occur while reading an XML payload into an element tree.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The payload is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// The payload bytes are not valid UTF-8.
    #[error("XML payload is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// An attribute could not be read.
    #[error("invalid attribute on <{tag}>: {message}")]
    InvalidAttribute { tag: String, message: String },

    /// An entity reference other than the predefined ones or a character reference.
    #[error("unknown entity reference '&{name};'")]
    UnknownEntity { name: String },

    /// The document ended before an element was closed.
    #[error("unclosed element <{tag}>")]
    UnclosedElement { tag: String },

    /// The payload contains no element at all.
    #[error("XML payload has no root element")]
    NoRootElement,

    /// A second top-level element follows the root.
    #[error("unexpected second root element <{tag}>")]
    MultipleRoots { tag: String },
}

/// Result type for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XmlError::UnclosedElement {
            tag: "response".to_string(),
        };
        assert_eq!(err.to_string(), "unclosed element <response>");
    }

    #[test]
    fn test_error_from_utf8() {
        let bytes = [0xff_u8, 0xfe];
        let utf8_err = std::str::from_utf8(&bytes).unwrap_err();
        let err: XmlError = utf8_err.into();
        assert!(matches!(err, XmlError::Encoding(_)));
    }
}
