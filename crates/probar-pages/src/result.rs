//! Result and error types for page object resolution.

use crate::dom::ElementId;
use thiserror::Error;

/// Result type for page object operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors raised while declaring or accessing a page object.
///
/// Every access-time variant names the dotted page object path of the
/// accessor that failed and the composed selector it resolved.
#[derive(Debug, Error)]
pub enum PageError {
    /// Selector matched no element where at least one was required
    #[error("{path}: no element matching selector \"{selector}\"")]
    ElementNotFound {
        /// Dotted page object path
        path: String,
        /// Composed selector
        selector: String,
    },

    /// Selector matched several elements and `multiple` was not requested
    #[error(
        "{path}: matched {count} elements with selector \"{selector}\"; \
         use `multiple` if this is not an error"
    )]
    AmbiguousElement {
        /// Dotted page object path
        path: String,
        /// Composed selector
        selector: String,
        /// Number of matched elements
        count: usize,
    },

    /// Author-level misuse of the DSL
    #[error("{path}: {message}")]
    InvalidUsage {
        /// Dotted page object path
        path: String,
        /// What was wrong
        message: String,
    },

    /// The host DOM rejected a query or an action
    #[error("{path}: host failure for selector \"{selector}\": {source}")]
    Dom {
        /// Dotted page object path
        path: String,
        /// Composed selector
        selector: String,
        /// Underlying host error
        #[source]
        source: DomError,
    },

    /// Page object declaration could not be parsed
    #[error("Invalid page object declaration: {0}")]
    Schema(String),

    /// I/O error while reading a declaration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageError {
    /// Shorthand for [`PageError::InvalidUsage`]
    pub fn invalid_usage(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUsage {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Dotted path of the accessor that failed, if the error carries one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ElementNotFound { path, .. }
            | Self::AmbiguousElement { path, .. }
            | Self::InvalidUsage { path, .. }
            | Self::Dom { path, .. } => Some(path),
            Self::Schema(_) | Self::Io(_) => None,
        }
    }
}

/// Errors reported by a [`Dom`](crate::dom::Dom) or
/// [`Interact`](crate::dom::Interact) implementation.
#[derive(Debug, Error)]
pub enum DomError {
    /// The host selector engine rejected the selector
    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector {
        /// Selector as handed to the host
        selector: String,
        /// Host's explanation
        reason: String,
    },

    /// An element handle does not belong to this document
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    /// The automation primitive failed
    #[error("{action} failed: {reason}")]
    ActionFailed {
        /// Action name
        action: String,
        /// Failure reason
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_path_and_selector() {
        let err = PageError::ElementNotFound {
            path: "page.foo.bar.baz".to_string(),
            selector: ".scope span".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "page.foo.bar.baz: no element matching selector \".scope span\""
        );
        assert_eq!(err.path(), Some("page.foo.bar.baz"));
    }

    #[test]
    fn test_ambiguous_mentions_count() {
        let err = PageError::AmbiguousElement {
            path: "page.foo".to_string(),
            selector: "span".to_string(),
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("page.foo: matched 3 elements"));
        assert!(msg.contains("multiple"));
    }

    #[test]
    fn test_dom_error_is_source() {
        let err = PageError::Dom {
            path: "page.foo".to_string(),
            selector: "[[".to_string(),
            source: DomError::InvalidSelector {
                selector: "[[".to_string(),
                reason: "unexpected token".to_string(),
            },
        };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("invalid selector \"[[\": unexpected token")
        );
    }

    #[test]
    fn test_schema_error_has_no_path() {
        assert!(PageError::Schema("bad".to_string()).path().is_none());
    }
}
