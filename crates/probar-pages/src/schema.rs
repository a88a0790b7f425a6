//! YAML/JSON declarations of page objects.
//!
//! ```yaml
//! version: "1.0"
//! config:
//!   root_name: login
//! scope: .login
//! nodes:
//!   title: { type: text, selector: h1 }
//!   fillName: { type: fillable, selector: input.name }
//!   errors: { type: text, selector: .error, multiple: true }
//!   items:
//!     type: collection
//!     item:
//!       scope: li
//!       nodes:
//!         label: { type: text, selector: span }
//! ```
//!
//! Every leaf accepts the node options (`scope`, `reset_scope`, `at`,
//! `multiple`, `contains`, `last`, `visible`, `normalize`, `test_container`)
//! next to its `type` and `selector`. Any other key is rejected.

use crate::config::PageConfig;
use crate::descriptor::{
    attribute, click_on_text, clickable, collection, count, fillable, has_class, is_hidden, is_visible,
    not_has_class, selectable, text, triggerable, value, visitable, Definition, Descriptor, NodeOptions,
};
use crate::page_object::PageObject;
use crate::result::{PageError, PageResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Supported declaration version
pub const SCHEMA_VERSION: &str = "1.0";

/// Root of a page object declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSchema {
    /// Schema version (must be "1.0")
    pub version: String,
    /// Page object configuration
    #[serde(default)]
    pub config: PageConfig,
    /// Root definition
    #[serde(flatten)]
    pub root: DefinitionSpec,
}

/// A nested object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionSpec {
    /// Scope contributed to descendants
    #[serde(default)]
    pub scope: Option<String>,
    /// Drop ancestor scopes
    #[serde(default)]
    pub reset_scope: bool,
    /// Alternate root for descendants
    #[serde(default)]
    pub test_container: Option<String>,
    /// Children keyed by name
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeSpec>,
    /// Keys not recognized above
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

/// Selector and options shared by every leaf
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafSpec {
    /// Local selector
    #[serde(default)]
    pub selector: Option<String>,
    /// Node options
    #[serde(flatten)]
    pub options: NodeOptions,
    /// Keys that are neither the selector nor a node option
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

impl LeafSpec {
    fn selector(&self) -> &str {
        self.selector.as_deref().unwrap_or_default()
    }
}

fn reject_unknown(extra: &BTreeMap<String, serde_yaml_ng::Value>, path: &str) -> PageResult<()> {
    match extra.keys().next() {
        Some(key) => Err(PageError::Schema(format!("unknown key {key:?} in {path}"))),
        None => Ok(()),
    }
}

/// One node, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSpec {
    /// Text content
    Text(LeafSpec),
    /// Number of matches
    Count(LeafSpec),
    /// Attribute value
    Attribute {
        /// Attribute name
        name: String,
        /// Selector and options
        #[serde(flatten)]
        leaf: LeafSpec,
    },
    /// Form value
    Value(LeafSpec),
    /// Click
    Clickable(LeafSpec),
    /// Click on the element containing a text
    ClickOnText(LeafSpec),
    /// Fill an input
    Fillable(LeafSpec),
    /// Choose a select option
    Selectable(LeafSpec),
    /// Trigger an event
    Triggerable {
        /// Event name
        event: String,
        /// Selector and options
        #[serde(flatten)]
        leaf: LeafSpec,
    },
    /// Navigate to a path template
    Visitable {
        /// Path template with `:name` parameters
        path: String,
    },
    /// Element has a class
    HasClass {
        /// Class name
        class: String,
        /// Selector and options
        #[serde(flatten)]
        leaf: LeafSpec,
    },
    /// Element lacks a class
    NotHasClass {
        /// Class name
        class: String,
        /// Selector and options
        #[serde(flatten)]
        leaf: LeafSpec,
    },
    /// Element is visible
    IsVisible(LeafSpec),
    /// Element is hidden or absent
    IsHidden(LeafSpec),
    /// Nested object
    Group(DefinitionSpec),
    /// Collection of nested objects
    Collection {
        /// Item template
        item: DefinitionSpec,
    },
}

impl NodeSpec {
    fn check_keys(&self, path: &str) -> PageResult<()> {
        match self {
            Self::Text(l)
            | Self::Count(l)
            | Self::Value(l)
            | Self::Clickable(l)
            | Self::ClickOnText(l)
            | Self::Fillable(l)
            | Self::Selectable(l)
            | Self::IsVisible(l)
            | Self::IsHidden(l)
            | Self::Attribute { leaf: l, .. }
            | Self::Triggerable { leaf: l, .. }
            | Self::HasClass { leaf: l, .. }
            | Self::NotHasClass { leaf: l, .. } => reject_unknown(&l.extra, path),
            Self::Visitable { .. } => Ok(()),
            Self::Group(group) => group.check_keys(path),
            Self::Collection { item } => item.check_keys(&format!("{path}[]")),
        }
    }

    fn into_descriptor(self) -> Descriptor {
        match self {
            Self::Text(l) => text(l.selector()).with_options(l.options).into(),
            Self::Count(l) => count(l.selector()).with_options(l.options).into(),
            Self::Attribute { name, leaf: l } => attribute(name, l.selector()).with_options(l.options).into(),
            Self::Value(l) => value(l.selector()).with_options(l.options).into(),
            Self::Clickable(l) => clickable(l.selector()).with_options(l.options).into(),
            Self::ClickOnText(l) => click_on_text(l.selector()).with_options(l.options).into(),
            Self::Fillable(l) => fillable(l.selector()).with_options(l.options).into(),
            Self::Selectable(l) => selectable(l.selector()).with_options(l.options).into(),
            Self::Triggerable { event, leaf: l } => triggerable(event, l.selector()).with_options(l.options).into(),
            Self::Visitable { path } => visitable(path).into(),
            Self::HasClass { class, leaf: l } => has_class(class, l.selector()).with_options(l.options).into(),
            Self::NotHasClass { class, leaf: l } => {
                not_has_class(class, l.selector()).with_options(l.options).into()
            }
            Self::IsVisible(l) => is_visible(l.selector()).with_options(l.options).into(),
            Self::IsHidden(l) => is_hidden(l.selector()).with_options(l.options).into(),
            Self::Group(group) => group.into_definition().into(),
            Self::Collection { item } => collection(item.into_definition()).into(),
        }
    }
}

impl DefinitionSpec {
    fn check_keys(&self, path: &str) -> PageResult<()> {
        reject_unknown(&self.extra, path)?;
        self.nodes
            .iter()
            .try_for_each(|(key, node)| node.check_keys(&format!("{path}.{key}")))
    }

    /// Convert into a [`Definition`]
    #[must_use]
    pub fn into_definition(self) -> Definition {
        let mut definition = Definition::new();
        if let Some(scope) = self.scope {
            definition = definition.scope(scope);
        }
        if self.reset_scope {
            definition = definition.reset_scope();
        }
        if let Some(container) = self.test_container {
            definition = definition.test_container(container);
        }
        self.nodes
            .into_iter()
            .fold(definition, |def, (key, node)| def.with(key, node.into_descriptor()))
    }
}

impl PageSchema {
    /// Parse a YAML declaration.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Schema`] on malformed YAML or an unsupported version.
    pub fn from_yaml(yaml: &str) -> PageResult<Self> {
        let schema: Self = serde_yaml_ng::from_str(yaml).map_err(|e| PageError::Schema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse a JSON declaration
    pub fn from_json(json: &str) -> PageResult<Self> {
        let schema: Self = serde_json::from_str(json).map_err(|e| PageError::Schema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Read and parse a YAML declaration file
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> PageResult<()> {
        if self.version != SCHEMA_VERSION {
            return Err(PageError::Schema(format!(
                "unsupported version {:?}, expected {SCHEMA_VERSION:?}",
                self.version
            )));
        }
        self.root.check_keys(&self.config.root_name)
    }

    /// Build the page object, running the same checks as [`PageObject::create`]
    pub fn into_page_object(self) -> PageResult<PageObject> {
        PageObject::with_config(self.root.into_definition(), self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ActionKind, QueryKind};
    use std::io::Write;

    const LOGIN: &str = r##"
version: "1.0"
config:
  root_name: login
scope: .login
nodes:
  title: { type: text, selector: h1 }
  errors: { type: text, selector: .error, multiple: true }
  email: { type: attribute, name: placeholder, selector: input.email }
  submit: { type: clickable, selector: "button[type=submit]", at: 1 }
  open: { type: visitable, path: "/users/:id" }
  flash: { type: triggerable, event: focus, selector: input }
  hidden: { type: is_hidden, selector: .spinner, test_container: "#modal" }
  items:
    type: collection
    item:
      scope: li
      nodes:
        label: { type: text, selector: span, normalize: false }
"##;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_login() {
            let page = PageSchema::from_yaml(LOGIN).unwrap().into_page_object().unwrap();
            assert_eq!(page.config().root_name, "login");
            let def = page.definition();
            assert_eq!(def.scope_selector(), Some(".login"));
            assert_eq!(def.len(), 8);

            let Some(Descriptor::Query(errors)) = def.node("errors") else {
                panic!("errors should be a query");
            };
            assert!(errors.options.multiple);
            assert_eq!(errors.selector.as_deref(), Some(".error"));

            let Some(Descriptor::Query(email)) = def.node("email") else {
                panic!("email should be a query");
            };
            assert_eq!(email.kind, QueryKind::Attribute("placeholder".to_string()));

            let Some(Descriptor::Action(submit)) = def.node("submit") else {
                panic!("submit should be an action");
            };
            assert_eq!(submit.kind, ActionKind::Click);
            assert_eq!(submit.options.at, Some(1));

            let Some(Descriptor::Predicate(hidden)) = def.node("hidden") else {
                panic!("hidden should be a predicate");
            };
            assert_eq!(hidden.options.test_container.as_deref(), Some("#modal"));
        }

        #[test]
        fn test_collection_item_options() {
            let page = PageObject::from_yaml(LOGIN).unwrap();
            let Some(Descriptor::Collection(items)) = page.definition().node("items") else {
                panic!("items should be a collection");
            };
            assert_eq!(items.item.scope_selector(), Some("li"));
            let Some(Descriptor::Query(label)) = items.item.node("label") else {
                panic!("label should be a query");
            };
            assert!(!label.options.normalize);
        }

        #[test]
        fn test_default_normalize_is_true() {
            let page = PageObject::from_yaml("version: \"1.0\"\nnodes:\n  t: { type: text, selector: p }\n").unwrap();
            let Some(Descriptor::Query(t)) = page.definition().node("t") else {
                panic!("t should be a query");
            };
            assert!(t.options.normalize);
            assert_eq!(page.config().root_name, "page");
        }

        #[test]
        fn test_json() {
            let json = r#"{"version":"1.0","scope":".nav","nodes":{"home":{"type":"clickable","selector":"a.home"}}}"#;
            let page = PageObject::from_json(json).unwrap();
            assert_eq!(page.selector("home").unwrap().to_string(), ".nav a.home");
        }

        #[test]
        fn test_nested_group() {
            let yaml = r#"
version: "1.0"
nodes:
  form:
    type: group
    scope: form
    reset_scope: true
    nodes:
      name: { type: fillable, selector: "input[name=name]" }
"#;
            let page = PageObject::from_yaml(yaml).unwrap();
            let form = page.child("form").unwrap();
            assert_eq!(form.selector("name").unwrap().to_string(), "form input[name=name]");
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_wrong_version() {
            let err = PageSchema::from_yaml("version: \"2.0\"\n").unwrap_err();
            assert!(matches!(err, PageError::Schema(ref m) if m.contains("2.0")));
        }

        #[test]
        fn test_unknown_type() {
            let err = PageSchema::from_yaml("version: \"1.0\"\nnodes:\n  x: { type: hover }\n").unwrap_err();
            assert!(matches!(err, PageError::Schema(_)));
        }

        #[test]
        fn test_validation_runs_on_declarations() {
            let yaml = "version: \"1.0\"\nnodes:\n  go: { type: clickable, selector: a, multiple: true }\n";
            let err = PageObject::from_yaml(yaml).unwrap_err();
            assert_eq!(err.path(), Some("page.go"));
        }

        #[test]
        fn test_misspelled_option_is_rejected() {
            let yaml = "version: \"1.0\"\nnodes:\n  errors: { type: text, selector: .error, multple: true }\n";
            let err = PageSchema::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, PageError::Schema(ref m) if m.contains("\"multple\"") && m.contains("page.errors")));
        }

        #[test]
        fn test_unknown_key_in_collection_item() {
            let yaml = r#"
version: "1.0"
nodes:
  items:
    type: collection
    item:
      scop: li
      nodes:
        label: { type: text, selector: span }
"#;
            let err = PageSchema::from_yaml(yaml).unwrap_err();
            assert!(matches!(err, PageError::Schema(ref m) if m.contains("\"scop\"") && m.contains("page.items[]")));
        }

        #[test]
        fn test_unknown_key_in_json_leaf() {
            let json = r#"{"version":"1.0","nodes":{"go":{"type":"clickable","selector":"a","atx":1}}}"#;
            let err = PageSchema::from_json(json).unwrap_err();
            assert!(matches!(err, PageError::Schema(ref m) if m.contains("\"atx\"")));
        }

        #[test]
        fn test_missing_file() {
            let err = PageSchema::from_file("/nonexistent/page.yaml").unwrap_err();
            assert!(matches!(err, PageError::Io(_)));
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LOGIN.as_bytes()).unwrap();
        let page = PageObject::from_file(file.path()).unwrap();
        assert_eq!(page.root().path(), "login");
    }
}
