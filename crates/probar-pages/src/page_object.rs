//! Page objects and node cursors.
//!
//! A [`PageObject`] owns a validated [`Definition`] tree. Accessing it goes
//! through [`Node`] cursors: a node remembers the chain of definitions (and
//! collection indices) it was reached through, which is all that is needed
//! to compose selectors, find the closest test container and name the node
//! in errors. Nothing about the DOM is ever stored.

use crate::collection::CollectionRef;
use crate::config::PageConfig;
use crate::descriptor::{Definition, Descriptor, Leaf, NodeOptions};
use crate::dom::{Dom, Interact};
use crate::result::{PageError, PageResult};
use crate::schema::PageSchema;
use crate::selector::{ComposedSelector, ScopeChain, ScopeFragment, SelectorBuilder};
use crate::value::Value;
use crate::{actions, predicates, queries};
use std::path::Path;
use tracing::debug;

/// A leaf descriptor bound to the position it was accessed from
#[derive(Debug, Clone)]
pub(crate) struct Binding<'a> {
    pub chain: ScopeChain,
    pub local: Option<&'a str>,
    pub options: NodeOptions,
}

impl Binding<'_> {
    pub fn selector(&self) -> ComposedSelector {
        SelectorBuilder::build(&self.chain, self.local, &self.options)
    }

    pub fn path(&self) -> &str {
        self.options.page_object_key.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct Step<'p> {
    key: String,
    definition: &'p Definition,
    at: Option<usize>,
}

/// Cursor to a nested object of a page object
#[derive(Debug, Clone)]
pub struct Node<'p> {
    steps: Vec<Step<'p>>,
}

impl<'p> Node<'p> {
    fn root(name: &str, definition: &'p Definition) -> Self {
        Self {
            steps: vec![Step {
                key: name.to_string(),
                definition,
                at: None,
            }],
        }
    }

    pub(crate) fn descend(&self, key: String, definition: &'p Definition, at: Option<usize>) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step { key, definition, at });
        Self { steps }
    }

    /// Dotted path from the root, e.g. `page.items[1]`
    #[must_use]
    pub fn path(&self) -> String {
        self.steps
            .iter()
            .map(|s| s.key.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Dotted path of a child key
    #[must_use]
    pub fn path_of(&self, key: &str) -> String {
        format!("{}.{key}", self.path())
    }

    /// Definition this node stands for
    #[must_use]
    pub fn definition(&self) -> &'p Definition {
        // A node always has at least the root step
        self.steps[self.steps.len() - 1].definition
    }

    /// Scope fragments contributed by this node and its ancestors
    #[must_use]
    pub fn scope_chain(&self) -> ScopeChain {
        let mut chain = ScopeChain::new();
        for step in &self.steps {
            if step.definition.resets_scope() {
                chain.reset();
            }
            match (step.definition.scope_selector(), step.at) {
                (Some(scope), at) => chain.push(ScopeFragment {
                    selector: scope.to_string(),
                    at,
                }),
                (None, Some(at)) => chain.push(ScopeFragment::indexed("", at)),
                (None, None) => {}
            }
        }
        chain
    }

    /// Nearest test container declared on this node or an ancestor
    #[must_use]
    pub fn closest_container(&self) -> Option<&'p str> {
        self.steps.iter().rev().find_map(|s| s.definition.container())
    }

    fn descriptor(&self, key: &str) -> PageResult<&'p Descriptor> {
        self.definition()
            .node(key)
            .ok_or_else(|| PageError::invalid_usage(self.path_of(key), "no such key in page object"))
    }

    fn wrong_kind(&self, key: &str, node: &Descriptor, wanted: &str) -> PageError {
        PageError::invalid_usage(
            self.path_of(key),
            format!("is a {}, not {wanted}", node.kind_name()),
        )
    }

    fn bind<K>(&self, leaf: &'p Leaf<K>, key: String) -> Binding<'p> {
        let mut options = leaf.options.clone();
        options.page_object_key = Some(key);
        if options.test_container.is_none() {
            options.test_container = self.closest_container().map(str::to_string);
        }
        Binding {
            chain: self.scope_chain(),
            local: leaf.selector.as_deref(),
            options,
        }
    }

    /// Nested object at `key`
    pub fn child(&self, key: &str) -> PageResult<Self> {
        match self.descriptor(key)? {
            Descriptor::Group(definition) => Ok(self.descend(key.to_string(), definition, None)),
            other => Err(self.wrong_kind(key, other, "a nested object")),
        }
    }

    /// Collection at `key`
    pub fn collection(&self, key: &str) -> PageResult<CollectionRef<'p>> {
        match self.descriptor(key)? {
            Descriptor::Collection(node) => Ok(CollectionRef::new(self.clone(), key, &node.item)),
            other => Err(self.wrong_kind(key, other, "a collection")),
        }
    }

    /// Read a query or evaluate a predicate
    pub fn get<D: Dom + ?Sized>(&self, key: &str, dom: &D) -> PageResult<Value> {
        match self.descriptor(key)? {
            Descriptor::Query(leaf) => queries::read(dom, &leaf.kind, &self.bind(leaf, self.path_of(key))),
            Descriptor::Predicate(leaf) => {
                predicates::check(dom, &leaf.kind, &self.bind(leaf, self.path_of(key)))
            }
            other => Err(self.wrong_kind(key, other, "a query or predicate")),
        }
    }

    /// Run an action; returns the node it belongs to so calls chain
    pub fn call<D: Dom + Interact + ?Sized>(&self, key: &str, dom: &mut D, args: &[&str]) -> PageResult<Self> {
        match self.descriptor(key)? {
            Descriptor::Action(leaf) => {
                let rendered: Vec<String> = args.iter().map(|a| format!("{a:?}")).collect();
                let path = self.path_of(&format!("{key}({})", rendered.join(", ")));
                let binding = self.bind(leaf, path);
                actions::perform(dom, &leaf.kind, &binding, args)?;
                Ok(self.clone())
            }
            other => Err(self.wrong_kind(key, other, "an action")),
        }
    }

    /// Composed selector of a leaf, for diagnostics
    pub fn selector(&self, key: &str) -> PageResult<ComposedSelector> {
        let binding = match self.descriptor(key)? {
            Descriptor::Query(leaf) => self.bind(leaf, self.path_of(key)),
            Descriptor::Action(leaf) => self.bind(leaf, self.path_of(key)),
            Descriptor::Predicate(leaf) => self.bind(leaf, self.path_of(key)),
            other => return Err(self.wrong_kind(key, other, "a selector-bound node")),
        };
        Ok(binding.selector())
    }
}

fn check_key(parent: &str, key: &str) -> PageResult<()> {
    if key.is_empty() || key.contains(['.', '[', ']']) {
        return Err(PageError::invalid_usage(
            parent,
            format!("invalid key {key:?}: keys must be non-empty and contain no '.', '[' or ']'"),
        ));
    }
    Ok(())
}

fn reject_multiple<K>(path: &str, leaf: &Leaf<K>, kind: &str) -> PageResult<()> {
    if leaf.options.multiple {
        return Err(PageError::invalid_usage(
            path,
            format!("{kind}s act on a single element; `multiple` is not supported"),
        ));
    }
    Ok(())
}

fn validate(definition: &Definition, path: &str) -> PageResult<()> {
    for (key, node) in definition.nodes() {
        check_key(path, key)?;
        let child = format!("{path}.{key}");
        match node {
            Descriptor::Query(_) => {}
            Descriptor::Action(leaf) => reject_multiple(&child, leaf, "action")?,
            Descriptor::Predicate(leaf) => reject_multiple(&child, leaf, "predicate")?,
            Descriptor::Group(nested) => validate(nested, &child)?,
            Descriptor::Collection(collection) => {
                if collection.item.scope_selector().is_none() {
                    return Err(PageError::invalid_usage(child, "collection items need a scope"));
                }
                validate(&collection.item, &format!("{child}[]"))?;
            }
        }
    }
    Ok(())
}

/// A validated page object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObject {
    definition: Definition,
    config: PageConfig,
}

impl PageObject {
    /// Validate `definition` and wrap it with the default config
    pub fn create(definition: Definition) -> PageResult<Self> {
        Self::with_config(definition, PageConfig::default())
    }

    /// Validate `definition` and wrap it with `config`
    pub fn with_config(definition: Definition, config: PageConfig) -> PageResult<Self> {
        validate(&definition, &config.root_name)?;
        debug!(root = %config.root_name, nodes = definition.len(), "created page object");
        Ok(Self { definition, config })
    }

    /// Build from a YAML declaration
    pub fn from_yaml(yaml: &str) -> PageResult<Self> {
        PageSchema::from_yaml(yaml)?.into_page_object()
    }

    /// Build from a JSON declaration
    pub fn from_json(json: &str) -> PageResult<Self> {
        PageSchema::from_json(json)?.into_page_object()
    }

    /// Build from a YAML declaration file
    pub fn from_file(path: impl AsRef<Path>) -> PageResult<Self> {
        PageSchema::from_file(path)?.into_page_object()
    }

    /// Root node
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node::root(&self.config.root_name, &self.definition)
    }

    /// Root definition
    #[must_use]
    pub const fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    /// See [`Node::child`]
    pub fn child(&self, key: &str) -> PageResult<Node<'_>> {
        self.root().child(key)
    }

    /// See [`Node::collection`]
    pub fn collection(&self, key: &str) -> PageResult<CollectionRef<'_>> {
        self.root().collection(key)
    }

    /// See [`Node::get`]
    pub fn get<D: Dom + ?Sized>(&self, key: &str, dom: &D) -> PageResult<Value> {
        self.root().get(key, dom)
    }

    /// See [`Node::call`]
    pub fn call<D: Dom + Interact + ?Sized>(&self, key: &str, dom: &mut D, args: &[&str]) -> PageResult<Node<'_>> {
        self.root().call(key, dom, args)
    }

    /// See [`Node::selector`]
    pub fn selector(&self, key: &str) -> PageResult<ComposedSelector> {
        self.root().selector(key)
    }
}
