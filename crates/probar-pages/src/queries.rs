//! Query behaviors: text, count, attribute, value.

use crate::descriptor::{NodeOptions, QueryKind};
use crate::dom::{Dom, ElementId};
use crate::page_object::Binding;
use crate::resolver::{resolve, resolve_with_assert};
use crate::result::PageResult;
use crate::text::normalize_text;
use crate::value::Value;

fn collect<F>(elements: &[ElementId], options: &NodeOptions, read: F) -> Value
where
    F: Fn(ElementId) -> Value,
{
    let mut values: Vec<Value> = elements.iter().map(|&el| read(el)).collect();
    if options.multiple {
        Value::List(values)
    } else {
        values.swap_remove(0)
    }
}

/// Evaluate a query node against the current DOM
pub(crate) fn read<D: Dom + ?Sized>(dom: &D, kind: &QueryKind, binding: &Binding<'_>) -> PageResult<Value> {
    let selector = binding.selector();
    let options = &binding.options;

    match kind {
        QueryKind::Count => {
            let counting = NodeOptions {
                multiple: true,
                ..options.clone()
            };
            Ok(Value::Count(resolve(dom, &selector, &counting)?.len()))
        }
        QueryKind::Text => {
            let elements = resolve_with_assert(dom, &selector, options)?;
            Ok(collect(&elements, options, |el| {
                let raw = dom.text(el);
                Value::Text(if options.normalize { normalize_text(&raw) } else { raw })
            }))
        }
        QueryKind::Attribute(name) => {
            let elements = resolve_with_assert(dom, &selector, options)?;
            Ok(collect(&elements, options, |el| dom.attribute(el, name).into()))
        }
        QueryKind::Value => {
            let elements = resolve_with_assert(dom, &selector, options)?;
            Ok(collect(&elements, options, |el| dom.value(el).into()))
        }
    }
}
