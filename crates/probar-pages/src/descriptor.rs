//! Page object declarations.
//!
//! A page object is a tree of immutable descriptors. Leaves are queries,
//! actions or predicates bound to a selector; inner nodes are groups
//! (nested [`Definition`]s) and collections. Nothing here touches the DOM:
//! descriptors are templates that [`Node`](crate::page_object::Node)
//! resolves on every access.
//!
//! # Example
//!
//! ```
//! use probar_pages::prelude::*;
//!
//! let page = Definition::new()
//!     .scope(".login")
//!     .with("title", text("h1"))
//!     .with("fillName", fillable("input.name"))
//!     .with("submit", clickable("button[type=submit]"))
//!     .with("errors", text(".error").multiple());
//! assert_eq!(page.len(), 4);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const fn default_true() -> bool {
    true
}

/// Per-node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOptions {
    /// Selector fragment nested under the ancestor scope
    #[serde(default)]
    pub scope: Option<String>,
    /// Discard all ancestor scope fragments
    #[serde(default)]
    pub reset_scope: bool,
    /// Pick the element at this zero-based index after matching
    #[serde(default)]
    pub at: Option<usize>,
    /// Return every match instead of requiring exactly one
    #[serde(default)]
    pub multiple: bool,
    /// Keep only elements whose normalized text contains this
    #[serde(default)]
    pub contains: Option<String>,
    /// Keep only the last match in document order
    #[serde(default)]
    pub last: bool,
    /// Exclude hidden elements
    #[serde(default)]
    pub visible: bool,
    /// Normalize whitespace of text results
    #[serde(default = "default_true")]
    pub normalize: bool,
    /// Selector of an alternate root to query within
    #[serde(default)]
    pub test_container: Option<String>,
    /// Dotted path used in error messages, synthesized on access
    #[serde(skip)]
    pub page_object_key: Option<String>,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            scope: None,
            reset_scope: false,
            at: None,
            multiple: false,
            contains: None,
            last: false,
            visible: false,
            normalize: true,
            test_container: None,
            page_object_key: None,
        }
    }
}

/// What a query node reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    /// Text content
    Text,
    /// Number of matches
    Count,
    /// Attribute value
    Attribute(String),
    /// Form value
    Value,
}

/// What an action node does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Click the element
    Click,
    /// Click the element containing the text given at call time
    ClickOnText,
    /// Fill the element with the text given at call time
    Fill,
    /// Trigger a named event
    Trigger(String),
    /// Navigate to a path template
    Visit(String),
}

/// What a predicate node checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateKind {
    /// Element has the class
    HasClass(String),
    /// Element lacks the class
    NotHasClass(String),
    /// Element is rendered
    IsVisible,
    /// Element is hidden or absent
    IsHidden,
}

/// A selector-bound leaf descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<K> {
    /// Behavior
    pub kind: K,
    /// Local selector; `None` uses the ancestor scope as is
    pub selector: Option<String>,
    /// Options
    pub options: NodeOptions,
}

impl<K> Leaf<K> {
    fn new(kind: K, selector: Option<&str>) -> Self {
        Self {
            kind,
            selector: selector.map(str::to_string),
            options: NodeOptions::default(),
        }
    }

    /// Nest a scope fragment under the ancestor scope
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.options.scope = Some(scope.into());
        self
    }

    /// Ignore every ancestor scope
    #[must_use]
    pub fn reset_scope(mut self) -> Self {
        self.options.reset_scope = true;
        self
    }

    /// Pick the match at `index`
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.options.at = Some(index);
        self
    }

    /// Accept and return every match
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.options.multiple = true;
        self
    }

    /// Keep only matches whose text contains `text`
    #[must_use]
    pub fn contains(mut self, text: impl Into<String>) -> Self {
        self.options.contains = Some(text.into());
        self
    }

    /// Keep only the last match
    #[must_use]
    pub fn last(mut self) -> Self {
        self.options.last = true;
        self
    }

    /// Ignore hidden elements
    #[must_use]
    pub fn visible(mut self) -> Self {
        self.options.visible = true;
        self
    }

    /// Toggle whitespace normalization of text results
    #[must_use]
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.options.normalize = normalize;
        self
    }

    /// Query inside an alternate container instead of the testing root
    #[must_use]
    pub fn test_container(mut self, container: impl Into<String>) -> Self {
        self.options.test_container = Some(container.into());
        self
    }

    /// Replace all options at once
    #[must_use]
    pub fn with_options(mut self, options: NodeOptions) -> Self {
        self.options = options;
        self
    }
}

/// An indexable family of nested page objects sharing one item template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNode {
    /// Item template; its scope selects the items
    pub item: Definition,
}

/// Any node of a page object tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// Reads a value
    Query(Leaf<QueryKind>),
    /// Performs an interaction
    Action(Leaf<ActionKind>),
    /// Checks a condition
    Predicate(Leaf<PredicateKind>),
    /// Indexed family of nested objects
    Collection(CollectionNode),
    /// Nested object
    Group(Definition),
}

impl Descriptor {
    /// Kind name, used in error messages
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Action(_) => "action",
            Self::Predicate(_) => "predicate",
            Self::Collection(_) => "collection",
            Self::Group(_) => "nested object",
        }
    }
}

impl From<Leaf<QueryKind>> for Descriptor {
    fn from(leaf: Leaf<QueryKind>) -> Self {
        Self::Query(leaf)
    }
}

impl From<Leaf<ActionKind>> for Descriptor {
    fn from(leaf: Leaf<ActionKind>) -> Self {
        Self::Action(leaf)
    }
}

impl From<Leaf<PredicateKind>> for Descriptor {
    fn from(leaf: Leaf<PredicateKind>) -> Self {
        Self::Predicate(leaf)
    }
}

impl From<CollectionNode> for Descriptor {
    fn from(node: CollectionNode) -> Self {
        Self::Collection(node)
    }
}

impl From<Definition> for Descriptor {
    fn from(definition: Definition) -> Self {
        Self::Group(definition)
    }
}

/// A nested object: an optional scope plus named children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    scope: Option<String>,
    reset_scope: bool,
    test_container: Option<String>,
    nodes: BTreeMap<String, Descriptor>,
}

impl Definition {
    /// Create an empty, unscoped definition
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scope contributed to every descendant
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Discard ancestor scopes for this subtree
    #[must_use]
    pub const fn reset_scope(mut self) -> Self {
        self.reset_scope = true;
        self
    }

    /// Query this subtree inside an alternate container
    #[must_use]
    pub fn test_container(mut self, container: impl Into<String>) -> Self {
        self.test_container = Some(container.into());
        self
    }

    /// Add a child node under `key`
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, node: impl Into<Descriptor>) -> Self {
        let _ = self.nodes.insert(key.into(), node.into());
        self
    }

    /// Scope fragment, if any
    #[must_use]
    pub fn scope_selector(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Whether ancestor scopes are discarded
    #[must_use]
    pub const fn resets_scope(&self) -> bool {
        self.reset_scope
    }

    /// Alternate container, if any
    #[must_use]
    pub fn container(&self) -> Option<&str> {
        self.test_container.as_deref()
    }

    /// Child node by key
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&Descriptor> {
        self.nodes.get(key)
    }

    /// Children in key order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct children
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether there are no children
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Text of the matched element(s)
#[must_use]
pub fn text(selector: &str) -> Leaf<QueryKind> {
    Leaf::new(QueryKind::Text, non_empty(selector))
}

/// Text of the element(s) in scope, without a local selector
#[must_use]
pub fn scoped_text() -> Leaf<QueryKind> {
    Leaf::new(QueryKind::Text, None)
}

/// Number of matched elements; never fails on zero matches
#[must_use]
pub fn count(selector: &str) -> Leaf<QueryKind> {
    Leaf::new(QueryKind::Count, non_empty(selector))
}

/// Attribute value of the matched element(s)
#[must_use]
pub fn attribute(name: impl Into<String>, selector: &str) -> Leaf<QueryKind> {
    Leaf::new(QueryKind::Attribute(name.into()), non_empty(selector))
}

/// Form value of the matched element(s)
#[must_use]
pub fn value(selector: &str) -> Leaf<QueryKind> {
    Leaf::new(QueryKind::Value, non_empty(selector))
}

/// Click the matched element
#[must_use]
pub fn clickable(selector: &str) -> Leaf<ActionKind> {
    Leaf::new(ActionKind::Click, non_empty(selector))
}

/// Click the element containing the text passed at call time, either the
/// matched element itself or its innermost descendant containing the text
#[must_use]
pub fn click_on_text(selector: &str) -> Leaf<ActionKind> {
    Leaf::new(ActionKind::ClickOnText, non_empty(selector))
}

/// Fill an input with the text passed at call time
#[must_use]
pub fn fillable(selector: &str) -> Leaf<ActionKind> {
    Leaf::new(ActionKind::Fill, non_empty(selector))
}

/// Alias of [`fillable`] for select menus
#[must_use]
pub fn selectable(selector: &str) -> Leaf<ActionKind> {
    fillable(selector)
}

/// Trigger `event` on the matched element
#[must_use]
pub fn triggerable(event: impl Into<String>, selector: &str) -> Leaf<ActionKind> {
    Leaf::new(ActionKind::Trigger(event.into()), non_empty(selector))
}

/// Navigate to `path`; `:name` segments are filled from the call arguments
#[must_use]
pub fn visitable(path: impl Into<String>) -> Leaf<ActionKind> {
    Leaf::new(ActionKind::Visit(path.into()), None)
}

/// Whether the matched element has `class`
#[must_use]
pub fn has_class(class: impl Into<String>, selector: &str) -> Leaf<PredicateKind> {
    Leaf::new(PredicateKind::HasClass(class.into()), non_empty(selector))
}

/// Whether the matched element lacks `class`
#[must_use]
pub fn not_has_class(class: impl Into<String>, selector: &str) -> Leaf<PredicateKind> {
    Leaf::new(PredicateKind::NotHasClass(class.into()), non_empty(selector))
}

/// Whether the matched element is visible; fails when absent
#[must_use]
pub fn is_visible(selector: &str) -> Leaf<PredicateKind> {
    Leaf::new(PredicateKind::IsVisible, non_empty(selector))
}

/// Whether the matched element is hidden or absent
#[must_use]
pub fn is_hidden(selector: &str) -> Leaf<PredicateKind> {
    Leaf::new(PredicateKind::IsHidden, non_empty(selector))
}

/// Family of items selected by the template's scope
#[must_use]
pub fn collection(item: Definition) -> CollectionNode {
    CollectionNode { item }
}

fn non_empty(selector: &str) -> Option<&str> {
    let trimmed = selector.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
