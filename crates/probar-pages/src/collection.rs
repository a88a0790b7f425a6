//! Indexed collections of nested objects.
//!
//! The item definition's scope selects the items; item `i` is the item
//! definition with that scope narrowed to its `i`-th match. Items are
//! cursors, not snapshots: they re-resolve on every access and may go
//! stale when the DOM changes between calls.

use crate::descriptor::{Definition, NodeOptions};
use crate::dom::Dom;
use crate::page_object::Node;
use crate::resolver::resolve;
use crate::result::PageResult;
use crate::selector::{ComposedSelector, SelectorBuilder};

/// Handle to a collection node
#[derive(Debug, Clone)]
pub struct CollectionRef<'p> {
    parent: Node<'p>,
    key: String,
    item: &'p Definition,
}

impl<'p> CollectionRef<'p> {
    pub(crate) fn new(parent: Node<'p>, key: &str, item: &'p Definition) -> Self {
        Self {
            parent,
            key: key.to_string(),
            item,
        }
    }

    /// Dotted path of the collection
    #[must_use]
    pub fn path(&self) -> String {
        self.parent.path_of(&self.key)
    }

    fn item_options(&self) -> NodeOptions {
        NodeOptions {
            scope: self.item.scope_selector().map(str::to_string),
            reset_scope: self.item.resets_scope(),
            multiple: true,
            test_container: self
                .item
                .container()
                .or_else(|| self.parent.closest_container())
                .map(str::to_string),
            page_object_key: Some(self.path()),
            ..NodeOptions::default()
        }
    }

    /// Selector matching every item
    #[must_use]
    pub fn selector(&self) -> ComposedSelector {
        SelectorBuilder::build(&self.parent.scope_chain(), None, &self.item_options())
    }

    /// Number of items currently in the DOM
    pub fn len<D: Dom + ?Sized>(&self, dom: &D) -> PageResult<usize> {
        let options = self.item_options();
        let selector = SelectorBuilder::build(&self.parent.scope_chain(), None, &options);
        Ok(resolve(dom, &selector, &options)?.len())
    }

    /// Whether the collection currently has no items
    pub fn is_empty<D: Dom + ?Sized>(&self, dom: &D) -> PageResult<bool> {
        Ok(self.len(dom)? == 0)
    }

    /// Item at `index`. Never fails: an index past the end only errors
    /// when the item is accessed.
    #[must_use]
    pub fn object_at(&self, index: usize) -> Node<'p> {
        self.parent
            .descend(format!("{}[{index}]", self.key), self.item, Some(index))
    }

    /// Items `0..len`, with `len` taken from the DOM now
    pub fn iter<D: Dom + ?Sized>(&self, dom: &D) -> PageResult<Items<'p>> {
        Ok(Items {
            collection: self.clone(),
            next: 0,
            len: self.len(dom)?,
        })
    }
}

/// Iterator over the items of a collection
#[derive(Debug, Clone)]
pub struct Items<'p> {
    collection: CollectionRef<'p>,
    next: usize,
    len: usize,
}

impl<'p> Iterator for Items<'p> {
    type Item = Node<'p>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let item = self.collection.object_at(self.next);
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Items<'_> {}
