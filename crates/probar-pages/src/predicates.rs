//! Predicate behaviors: class membership and visibility.

use crate::descriptor::PredicateKind;
use crate::dom::Dom;
use crate::page_object::Binding;
use crate::resolver::{resolve, resolve_with_assert};
use crate::result::{PageError, PageResult};
use crate::value::Value;

/// Evaluate a predicate node against the current DOM.
///
/// Predicates need a single element; `multiple` is rejected when the page
/// object is created.
pub(crate) fn check<D: Dom + ?Sized>(dom: &D, kind: &PredicateKind, binding: &Binding<'_>) -> PageResult<Value> {
    let selector = binding.selector();
    let options = &binding.options;

    let outcome = match kind {
        PredicateKind::IsHidden => {
            // Absent counts as hidden; more than one is still ambiguous
            match resolve(dom, &selector, options)?.as_slice() {
                [] => true,
                [only] => !dom.is_visible(*only),
                several => {
                    return Err(PageError::AmbiguousElement {
                        path: binding.path().to_string(),
                        selector: selector.to_string(),
                        count: several.len(),
                    })
                }
            }
        }
        PredicateKind::IsVisible => {
            let found = resolve_with_assert(dom, &selector, options)?;
            dom.is_visible(found[0])
        }
        PredicateKind::HasClass(class) => {
            let found = resolve_with_assert(dom, &selector, options)?;
            dom.has_class(found[0], class)
        }
        PredicateKind::NotHasClass(class) => {
            let found = resolve_with_assert(dom, &selector, options)?;
            !dom.has_class(found[0], class)
        }
    };
    Ok(Value::Bool(outcome))
}
