//! Collaborator interfaces consumed by the resolution engine.
//!
//! The engine never parses CSS and never touches a browser directly. Element
//! matching and inspection go through [`Dom`]; anything that changes the page
//! goes through [`Interact`]. Both are synchronous: an [`Interact`] call must
//! not return before the UI work it started has settled, so the next access
//! always observes the settled DOM.
//!
//! # Implementations
//!
//! - [`HtmlFixture`](crate::fixture::HtmlFixture) - in-memory HTML host for unit tests
//! - Browser drivers - wrap a CDP or WebDriver session

use crate::result::DomError;
use crate::selector::ComposedSelector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element of the host document.
///
/// Handles order by document position: for two elements `a < b` iff `a`
/// precedes `b` in a pre-order walk of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to the host document.
pub trait Dom {
    /// Default root every page object query starts from
    fn testing_root(&self) -> ElementId;

    /// Document element, used to look up alternate test containers
    fn document_root(&self) -> ElementId;

    /// Descendants of `context` (the context itself excluded) matching
    /// `selector`, in document order
    fn query_all(&self, context: ElementId, selector: &str) -> Result<Vec<ElementId>, DomError>;

    /// Whether the element is rendered: not inside a `display: none`
    /// subtree and not of zero size
    fn is_visible(&self, element: ElementId) -> bool;

    /// Raw text content of the element and its descendants
    fn text(&self, element: ElementId) -> String;

    /// Attribute value, `None` when absent
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Current form value of the element
    fn value(&self, element: ElementId) -> Option<String> {
        self.attribute(element, "value")
    }

    /// Whether the element's class list contains `class`
    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.attribute(element, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// UI operation performed on resolved elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiAction {
    /// Click the element
    Click,
    /// Set the value and fire `input` and `change`
    Fill(String),
    /// Dispatch a named event
    Trigger(String),
}

impl UiAction {
    /// Short name used in logs and errors
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Fill(_) => "fill",
            Self::Trigger(event) => event,
        }
    }
}

/// What an action is aimed at
#[derive(Debug, Clone, Copy)]
pub struct ActionTarget<'a> {
    /// Composed selector, for hosts that act by selector
    pub selector: &'a ComposedSelector,
    /// Alternate test container, if any
    pub container: Option<&'a str>,
    /// Elements resolved by the engine
    pub elements: &'a [ElementId],
}

/// Write access to the host: the automation primitives.
pub trait Interact {
    /// Perform `action` on the target and wait for the UI to settle
    fn perform(&mut self, target: &ActionTarget<'_>, action: &UiAction) -> Result<(), DomError>;

    /// Navigate to `url` and wait for the UI to settle
    fn visit(&mut self, url: &str) -> Result<(), DomError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Classes(&'static str);

    impl Dom for Classes {
        fn testing_root(&self) -> ElementId {
            ElementId(0)
        }

        fn document_root(&self) -> ElementId {
            ElementId(0)
        }

        fn query_all(&self, _: ElementId, _: &str) -> Result<Vec<ElementId>, DomError> {
            Ok(vec![])
        }

        fn is_visible(&self, _: ElementId) -> bool {
            true
        }

        fn text(&self, _: ElementId) -> String {
            String::new()
        }

        fn attribute(&self, _: ElementId, name: &str) -> Option<String> {
            (name == "class").then(|| self.0.to_string())
        }
    }

    #[test]
    fn test_has_class_default_splits_class_list() {
        let dom = Classes("btn  btn-primary\tactive");
        assert!(dom.has_class(ElementId(0), "active"));
        assert!(dom.has_class(ElementId(0), "btn"));
        assert!(!dom.has_class(ElementId(0), "btn-"));
    }

    #[test]
    fn test_value_default_reads_attribute() {
        let dom = Classes("x");
        assert_eq!(dom.value(ElementId(0)), None);
    }

    #[test]
    fn test_element_ids_order_by_document_position() {
        let mut ids = vec![ElementId(4), ElementId(1), ElementId(3)];
        ids.sort();
        assert_eq!(ids, vec![ElementId(1), ElementId(3), ElementId(4)]);
        assert_eq!(ElementId(7).to_string(), "#7");
    }

    #[test]
    fn test_action_names() {
        assert_eq!(UiAction::Click.name(), "click");
        assert_eq!(UiAction::Fill("x".into()).name(), "fill");
        assert_eq!(UiAction::Trigger("focus".into()).name(), "focus");
    }
}
