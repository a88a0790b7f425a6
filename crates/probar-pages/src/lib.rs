//! Probar Pages: declarative page objects for DOM testing
//!
//! A page object describes a page as a tree of named nodes: queries
//! (`text`, `count`, `attribute`, `value`), actions (`clickable`,
//! `click_on_text`, `fillable`, `triggerable`, `visitable`), predicates
//! (`has_class`, `is_visible`, `is_hidden`) and nested objects or
//! collections. Every access composes a selector from the node's ancestor
//! scopes and resolves it against the live DOM, enforcing "exactly one
//! element" unless `multiple` is requested.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   PROBAR PAGES Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Definition │    │ Node       │    │ Selector   │            │
//! │   │ (Rust or   │───►│ cursor     │───►│ Builder    │            │
//! │   │  YAML)     │    │ (path)     │    │            │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Value /    │◄───│ queries    │◄───│ Resolver   │◄── Dom     │
//! │   │ PageError  │    │ actions    │    │            │            │
//! │   │            │    │ predicates │───────────────────► Interact │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use probar_pages::prelude::*;
//!
//! let page = PageObject::create(
//!     Definition::new()
//!         .scope(".login")
//!         .with("title", text("h1"))
//!         .with("fillName", fillable("input.name"))
//!         .with("submit", clickable("button")),
//! )?;
//!
//! let mut dom = HtmlFixture::new(
//!     r#"<form class="login"><h1> Sign   in </h1><input class="name"><button>Go</button></form>"#,
//! );
//! assert_eq!(page.get("title", &dom)?, "Sign in");
//! page.call("fillName", &mut dom, &["ann"])?
//!     .call("submit", &mut dom, &[])?;
//! assert_eq!(dom.events_named("click").len(), 1);
//! # Ok::<(), PageError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod actions;
pub mod collection;
pub mod config;
pub mod descriptor;
pub mod dom;
pub mod fixture;
pub mod page_object;
mod predicates;
mod queries;
pub mod resolver;
pub mod result;
pub mod schema;
pub mod selector;
pub mod text;
pub mod value;
pub mod visit;

pub use collection::{CollectionRef, Items};
pub use config::PageConfig;
pub use descriptor::{Definition, Descriptor, Leaf, NodeOptions};
pub use dom::{ActionTarget, Dom, ElementId, Interact, UiAction};
pub use fixture::HtmlFixture;
pub use page_object::{Node, PageObject};
pub use resolver::{resolve, resolve_with_assert, ResultSet};
pub use result::{DomError, PageError, PageResult};
pub use schema::PageSchema;
pub use selector::{ComposedSelector, ScopeChain, ScopeFragment, SelectorBuilder};
pub use value::Value;

/// Everything needed to declare and drive page objects
pub mod prelude {
    pub use super::collection::{CollectionRef, Items};
    pub use super::config::PageConfig;
    pub use super::descriptor::{
        attribute, click_on_text, clickable, collection, count, fillable, has_class, is_hidden, is_visible,
        not_has_class, scoped_text, selectable, text, triggerable, value, visitable, ActionKind, Definition,
        Descriptor, Leaf, NodeOptions, PredicateKind, QueryKind,
    };
    pub use super::dom::{ActionTarget, Dom, ElementId, Interact, UiAction};
    pub use super::fixture::{FiredEvent, HtmlFixture};
    pub use super::page_object::{Node, PageObject};
    pub use super::result::{DomError, PageError, PageResult};
    pub use super::schema::PageSchema;
    pub use super::selector::ComposedSelector;
    pub use super::value::Value;
}
