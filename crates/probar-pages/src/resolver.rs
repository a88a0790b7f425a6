//! Element resolution.
//!
//! Executes a [`ComposedSelector`] against the host [`Dom`] and enforces the
//! cardinality contract of the accessing node. Resolution is one synchronous
//! snapshot of the DOM: nothing is retried, nothing is cached.

use crate::descriptor::NodeOptions;
use crate::dom::{Dom, ElementId};
use crate::result::{DomError, PageError, PageResult};
use crate::selector::ComposedSelector;
use crate::text::normalize_text;
use tracing::debug;

/// Matched elements in document order
pub type ResultSet = Vec<ElementId>;

fn path_of(options: &NodeOptions) -> &str {
    options.page_object_key.as_deref().unwrap_or("<anonymous>")
}

fn host_error(options: &NodeOptions, selector: &str, source: DomError) -> PageError {
    PageError::Dom {
        path: path_of(options).to_string(),
        selector: selector.to_string(),
        source,
    }
}

/// Contexts the first segment is queried in: the testing root, or every
/// element matching the alternate test container. An absent container
/// yields no contexts, so nothing inside it matches.
fn root_contexts<D: Dom + ?Sized>(dom: &D, options: &NodeOptions) -> PageResult<ResultSet> {
    let Some(container) = options.test_container.as_deref() else {
        return Ok(vec![dom.testing_root()]);
    };
    dom.query_all(dom.document_root(), container)
        .map_err(|e| host_error(options, container, e))
}

fn query_each<D: Dom + ?Sized>(dom: &D, contexts: &[ElementId], css: &str) -> Result<ResultSet, DomError> {
    let mut matches = Vec::new();
    for &context in contexts {
        matches.extend(dom.query_all(context, css)?);
    }
    matches.sort_unstable();
    matches.dedup();
    Ok(matches)
}

/// Resolve `selector` without checking cardinality.
///
/// An index past the end yields an empty set rather than an error.
pub fn resolve<D: Dom + ?Sized>(
    dom: &D,
    selector: &ComposedSelector,
    options: &NodeOptions,
) -> PageResult<ResultSet> {
    let mut contexts = root_contexts(dom, options)?;
    let filter = selector.filter();
    let last = selector.segments().len().saturating_sub(1);

    for (i, segment) in selector.segments().iter().enumerate() {
        let mut matches = if segment.css.is_empty() {
            contexts
        } else {
            query_each(dom, &contexts, &segment.css)
                .map_err(|e| host_error(options, &selector.to_string(), e))?
        };

        if i == last {
            if filter.visible {
                matches.retain(|&el| dom.is_visible(el));
            }
            if let Some(needle) = filter.contains.as_deref() {
                let needle = normalize_text(needle);
                matches.retain(|&el| normalize_text(&dom.text(el)).contains(&needle));
            }
        }

        contexts = match segment.at {
            Some(at) => matches.get(at).copied().into_iter().collect(),
            None if i == last && filter.last => matches.last().copied().into_iter().collect(),
            None => matches,
        };
    }

    debug!(
        path = path_of(options),
        selector = %selector,
        container = options.test_container.as_deref().unwrap_or(""),
        matched = contexts.len(),
        "resolved page object selector"
    );
    Ok(contexts)
}

/// Resolve `selector` and require at least one match, and exactly one
/// unless `options.multiple` is set.
pub fn resolve_with_assert<D: Dom + ?Sized>(
    dom: &D,
    selector: &ComposedSelector,
    options: &NodeOptions,
) -> PageResult<ResultSet> {
    let found = resolve(dom, selector, options)?;
    match found.len() {
        0 => Err(PageError::ElementNotFound {
            path: path_of(options).to_string(),
            selector: selector.to_string(),
        }),
        count if count > 1 && !options.multiple => Err(PageError::AmbiguousElement {
            path: path_of(options).to_string(),
            selector: selector.to_string(),
            count,
        }),
        _ => Ok(found),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::HtmlFixture;
    use crate::selector::{ScopeChain, ScopeFragment, SelectorBuilder};

    fn keyed(options: NodeOptions) -> NodeOptions {
        NodeOptions {
            page_object_key: Some("page.foo".to_string()),
            ..options
        }
    }

    fn build(chain: &[&str], local: Option<&str>, options: &NodeOptions) -> ComposedSelector {
        let chain: ScopeChain = chain.iter().copied().collect();
        SelectorBuilder::build(&chain, local, options)
    }

    mod cardinality_tests {
        use super::*;

        #[test]
        fn test_exactly_one() {
            let dom = HtmlFixture::new("<span>a</span><p>b</p>");
            let options = keyed(NodeOptions::default());
            let found = resolve_with_assert(&dom, &build(&[], Some("span"), &options), &options).unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(dom.text(found[0]), "a");
        }

        #[test]
        fn test_none_is_not_found() {
            let dom = HtmlFixture::new("<p>b</p>");
            let options = keyed(NodeOptions::default());
            let err = resolve_with_assert(&dom, &build(&[".scope"], Some("span"), &options), &options)
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "page.foo: no element matching selector \".scope span\""
            );
        }

        #[test]
        fn test_many_is_ambiguous_unless_multiple() {
            let dom = HtmlFixture::new("<span>a</span><span>b</span>");
            let options = keyed(NodeOptions::default());
            let selector = build(&[], Some("span"), &options);
            match resolve_with_assert(&dom, &selector, &options) {
                Err(PageError::AmbiguousElement { count, .. }) => assert_eq!(count, 2),
                other => panic!("expected ambiguity, got {other:?}"),
            }

            let multiple = keyed(NodeOptions {
                multiple: true,
                ..NodeOptions::default()
            });
            assert_eq!(resolve_with_assert(&dom, &selector, &multiple).unwrap().len(), 2);
        }

        #[test]
        fn test_resolve_never_asserts() {
            let dom = HtmlFixture::new("<p>b</p>");
            let options = keyed(NodeOptions::default());
            assert!(resolve(&dom, &build(&[], Some("span"), &options), &options)
                .unwrap()
                .is_empty());
        }
    }

    mod index_tests {
        use super::*;

        #[test]
        fn test_at_picks_in_document_order() {
            let dom = HtmlFixture::new("<span>lorem</span><span>ipsum</span><span>dolor</span>");
            let options = keyed(NodeOptions {
                at: Some(1),
                ..NodeOptions::default()
            });
            let found = resolve_with_assert(&dom, &build(&[], Some("span"), &options), &options).unwrap();
            assert_eq!(dom.text(found[0]), "ipsum");
        }

        #[test]
        fn test_at_out_of_range_is_empty() {
            let dom = HtmlFixture::new("<span>lorem</span>");
            let options = keyed(NodeOptions {
                at: Some(5),
                ..NodeOptions::default()
            });
            let selector = build(&[], Some("span"), &options);
            assert!(resolve(&dom, &selector, &options).unwrap().is_empty());
            assert!(matches!(
                resolve_with_assert(&dom, &selector, &options),
                Err(PageError::ElementNotFound { .. })
            ));
        }

        #[test]
        fn test_at_applies_after_visibility() {
            let dom = HtmlFixture::new(
                r#"<span style="display: none">hidden</span><span>first</span><span>second</span>"#,
            );
            let options = keyed(NodeOptions {
                at: Some(0),
                visible: true,
                ..NodeOptions::default()
            });
            let found = resolve_with_assert(&dom, &build(&[], Some("span"), &options), &options).unwrap();
            assert_eq!(dom.text(found[0]), "first");
        }

        #[test]
        fn test_indexed_scope_narrows_descendants() {
            let dom = HtmlFixture::new(
                "<ul><li><span>a</span></li><li><span>b</span><span>c</span></li></ul>",
            );
            let mut chain = ScopeChain::new();
            chain.push(ScopeFragment::indexed("li", 1));
            let options = keyed(NodeOptions {
                multiple: true,
                ..NodeOptions::default()
            });
            let selector = SelectorBuilder::build(&chain, Some("span"), &options);
            let texts: Vec<String> = resolve_with_assert(&dom, &selector, &options)
                .unwrap()
                .into_iter()
                .map(|el| dom.text(el))
                .collect();
            assert_eq!(texts, vec!["b", "c"]);
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_contains_last_picks_innermost() {
            let dom = HtmlFixture::new("<div><form><button>Submit</button></form></div>");
            let options = keyed(NodeOptions {
                contains: Some("Submit".to_string()),
                last: true,
                multiple: true,
                ..NodeOptions::default()
            });
            let found = resolve(&dom, &build(&[], Some("*"), &options), &options).unwrap();
            assert_eq!(found.len(), 1);
            assert_eq!(dom.tag_name(found[0]).as_deref(), Some("button"));
        }

        #[test]
        fn test_contains_without_last_keeps_all() {
            let dom = HtmlFixture::new("<div><form><button>Submit</button></form></div>");
            let options = keyed(NodeOptions {
                contains: Some("Submit".to_string()),
                multiple: true,
                ..NodeOptions::default()
            });
            let found = resolve(&dom, &build(&[], Some("*"), &options), &options).unwrap();
            assert_eq!(found.len(), 3);
        }

        #[test]
        fn test_empty_selector_is_root_itself() {
            let dom = HtmlFixture::new("<p>x</p>");
            let options = keyed(NodeOptions::default());
            let found = resolve_with_assert(&dom, &build(&[], None, &options), &options).unwrap();
            assert_eq!(found, vec![dom.testing_root()]);
        }
    }

    mod container_tests {
        use super::*;
        use crate::fixture::ALTERNATE_ROOT_ID;

        #[test]
        fn test_alternate_container() {
            let dom = HtmlFixture::new("<h1>inside</h1>").with_alternate("<h1>lorem ipsum</h1>");
            let options = keyed(NodeOptions {
                test_container: Some(format!("#{ALTERNATE_ROOT_ID}")),
                ..NodeOptions::default()
            });
            let found = resolve_with_assert(&dom, &build(&[], Some("h1"), &options), &options).unwrap();
            assert_eq!(dom.text(found[0]), "lorem ipsum");
        }

        #[test]
        fn test_missing_container_matches_nothing() {
            let dom = HtmlFixture::new("<h1>inside</h1>");
            let options = keyed(NodeOptions {
                test_container: Some("#nowhere".to_string()),
                ..NodeOptions::default()
            });
            let selector = build(&[], Some("h1"), &options);
            assert!(resolve(&dom, &selector, &options).unwrap().is_empty());
            match resolve_with_assert(&dom, &selector, &options) {
                Err(PageError::ElementNotFound { selector, .. }) => assert_eq!(selector, "h1"),
                other => panic!("expected missing element, got {other:?}"),
            }
        }

        #[test]
        fn test_missing_container_with_empty_selector() {
            let dom = HtmlFixture::new("<h1>inside</h1>");
            let options = keyed(NodeOptions {
                test_container: Some("#nowhere".to_string()),
                multiple: true,
                ..NodeOptions::default()
            });
            assert!(resolve(&dom, &build(&[], None, &options), &options).unwrap().is_empty());
        }

        #[test]
        fn test_invalid_selector_surfaces_host_error() {
            let dom = HtmlFixture::new("<h1>inside</h1>");
            let options = keyed(NodeOptions::default());
            let err = resolve(&dom, &build(&[], Some("h1[[["), &options), &options).unwrap_err();
            assert!(matches!(err, PageError::Dom { .. }));
            assert_eq!(err.path(), Some("page.foo"));
        }
    }
}
