//! Selector composition.
//!
//! [`SelectorBuilder::build`] turns an ancestor scope chain, a local selector
//! and node options into a [`ComposedSelector`]. Plain fragments are joined
//! with the descendant combinator into a single host selector; indices and
//! text filters are kept aside and applied by the resolver after the host
//! engine has matched, so their meaning never depends on host quirks.
//!
//! ```text
//! chain [".scope", "li"@1]  +  local "span"  =>  segments [".scope li"@1, "span"]
//!                                              display ".scope li:eq(1) span"
//! ```

use crate::descriptor::NodeOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scope contribution of an ancestor node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFragment {
    /// Selector fragment; may be empty
    pub selector: String,
    /// Index bound by a collection item
    pub at: Option<usize>,
}

impl ScopeFragment {
    /// Plain fragment
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            at: None,
        }
    }

    /// Fragment narrowed to the match at `index`
    #[must_use]
    pub fn indexed(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            at: Some(index),
        }
    }
}

/// Root-to-leaf scope fragments collected from the ancestors of a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeChain {
    fragments: Vec<ScopeFragment>,
}

impl ScopeChain {
    /// Empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment
    pub fn push(&mut self, fragment: ScopeFragment) {
        self.fragments.push(fragment);
    }

    /// Discard everything collected so far
    pub fn reset(&mut self) {
        self.fragments.clear();
    }

    /// Fragments, root first
    #[must_use]
    pub fn fragments(&self) -> &[ScopeFragment] {
        &self.fragments
    }
}

impl<S: Into<String>> FromIterator<S> for ScopeChain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fragments: iter.into_iter().map(ScopeFragment::new).collect(),
        }
    }
}

/// A host selector plus the index applied to its matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Selector handed to the host engine; empty means "the context itself"
    pub css: String,
    /// Index applied after matching
    pub at: Option<usize>,
}

/// Filters applied to the matches of the last segment, before its index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafFilter {
    /// Drop hidden elements
    pub visible: bool,
    /// Keep elements whose normalized text contains this
    pub contains: Option<String>,
    /// Keep only the last element (ignored when the segment has an index)
    pub last: bool,
}

/// Final selector of a page object access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedSelector {
    segments: Vec<Segment>,
    filter: LeafFilter,
}

impl ComposedSelector {
    /// Segments, outermost first; never empty
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Filters of the last segment
    #[must_use]
    pub const fn filter(&self) -> &LeafFilter {
        &self.filter
    }

    /// Host selector text without indices and filters
    #[must_use]
    pub fn css(&self) -> String {
        join_non_empty(self.segments.iter().map(|s| s.css.as_str()))
    }
}

impl fmt::Display for ComposedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.segments.len().saturating_sub(1);
        let parts = self.segments.iter().enumerate().map(|(i, segment)| {
            let mut part = segment.css.clone();
            if i == last {
                if self.filter.visible {
                    part.push_str(":visible");
                }
                if let Some(text) = &self.filter.contains {
                    part.push_str(&format!(":contains({text:?})"));
                }
            }
            match segment.at {
                Some(at) => part.push_str(&format!(":eq({at})")),
                None if i == last && self.filter.last => part.push_str(":last"),
                None => {}
            }
            part
        });
        let rendered: Vec<String> = parts.collect();
        f.write_str(&join_non_empty(rendered.iter().map(String::as_str)))
    }
}

fn join_non_empty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Composes scope chains and local selectors
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorBuilder;

impl SelectorBuilder {
    /// Compose the final selector of a node.
    ///
    /// - `reset_scope` drops `chain` and starts from `options.scope`
    /// - otherwise `chain`, then `options.scope`, then `local`, descendant-joined
    /// - `options.at`, `contains`, `last` and `visible` become post-match steps
    #[must_use]
    pub fn build(chain: &ScopeChain, local: Option<&str>, options: &NodeOptions) -> ComposedSelector {
        let mut fragments: Vec<ScopeFragment> = if options.reset_scope {
            Vec::new()
        } else {
            chain.fragments().to_vec()
        };
        if let Some(scope) = options.scope.as_deref() {
            fragments.push(ScopeFragment::new(scope));
        }
        fragments.push(ScopeFragment {
            selector: local.unwrap_or_default().to_string(),
            at: options.at,
        });

        let mut segments = Vec::new();
        let mut pending: Vec<&str> = Vec::new();
        for fragment in &fragments {
            pending.push(&fragment.selector);
            if fragment.at.is_some() {
                segments.push(Segment {
                    css: join_non_empty(pending.drain(..)),
                    at: fragment.at,
                });
            }
        }
        if !pending.is_empty() {
            segments.push(Segment {
                css: join_non_empty(pending.drain(..)),
                at: None,
            });
        }

        let composed = ComposedSelector {
            segments,
            filter: LeafFilter {
                visible: options.visible,
                contains: options.contains.clone(),
                last: options.last,
            },
        };
        tracing::trace!(selector = %composed, reset_scope = options.reset_scope, "composed selector");
        composed
    }
}
