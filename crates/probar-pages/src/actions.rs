//! Action behaviors: click, click on text, fill, trigger, visit.
//!
//! Every action validates that its target exists (exactly one element)
//! before handing it to the [`Interact`] collaborator.

use crate::descriptor::{ActionKind, NodeOptions};
use crate::dom::{ActionTarget, Dom, Interact, UiAction};
use crate::page_object::Binding;
use crate::resolver::{resolve, resolve_with_assert};
use crate::result::{PageError, PageResult};
use crate::selector::{ComposedSelector, SelectorBuilder};
use crate::visit::VisitPath;
use tracing::debug;

fn single_arg<'a>(binding: &Binding<'_>, args: &[&'a str], what: &str) -> PageResult<&'a str> {
    match args {
        &[arg] => Ok(arg),
        _ => Err(PageError::invalid_usage(
            binding.path(),
            format!("expects exactly one argument ({what}), got {}", args.len()),
        )),
    }
}

fn no_args(binding: &Binding<'_>, args: &[&str]) -> PageResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(PageError::invalid_usage(
            binding.path(),
            format!("takes no arguments, got {}", args.len()),
        ))
    }
}

/// Selector for "click the element containing `text`".
///
/// Nested elements (a `<form>` around a `<button>`) all contain the text;
/// the innermost, last one in document order is the one meant. When no
/// descendant of the local selector contains the text, the local selector
/// itself is filtered instead.
fn click_on_text_selector<D: Dom + ?Sized>(
    dom: &D,
    binding: &Binding<'_>,
    text: &str,
) -> PageResult<ComposedSelector> {
    let descendants = match binding.local {
        Some(local) => format!("{local} *"),
        None => "*".to_string(),
    };
    let child_options = NodeOptions {
        contains: Some(text.to_string()),
        last: true,
        multiple: true,
        ..binding.options.clone()
    };
    let child = SelectorBuilder::build(&binding.chain, Some(&descendants), &child_options);
    if !resolve(dom, &child, &child_options)?.is_empty() {
        return Ok(child);
    }

    let own_options = NodeOptions {
        contains: Some(text.to_string()),
        ..binding.options.clone()
    };
    Ok(SelectorBuilder::build(&binding.chain, binding.local, &own_options))
}

fn act_on<D: Dom + Interact + ?Sized>(
    dom: &mut D,
    binding: &Binding<'_>,
    selector: &ComposedSelector,
    action: &UiAction,
) -> PageResult<()> {
    let options = &binding.options;
    let elements = resolve_with_assert(&*dom, selector, options)?;
    debug!(
        path = binding.path(),
        action = action.name(),
        selector = %selector,
        "performing page object action"
    );
    let target = ActionTarget {
        selector,
        container: options.test_container.as_deref(),
        elements: &elements,
    };
    dom.perform(&target, action).map_err(|source| PageError::Dom {
        path: binding.path().to_string(),
        selector: selector.to_string(),
        source,
    })
}

/// Run an action node
pub(crate) fn perform<D: Dom + Interact + ?Sized>(
    dom: &mut D,
    kind: &ActionKind,
    binding: &Binding<'_>,
    args: &[&str],
) -> PageResult<()> {
    match kind {
        ActionKind::Click => {
            no_args(binding, args)?;
            act_on(dom, binding, &binding.selector(), &UiAction::Click)
        }
        ActionKind::ClickOnText => {
            let text = single_arg(binding, args, "the text to click")?;
            let selector = click_on_text_selector(&*dom, binding, text)?;
            act_on(dom, binding, &selector, &UiAction::Click)
        }
        ActionKind::Fill => {
            let text = single_arg(binding, args, "the text to fill in")?;
            act_on(dom, binding, &binding.selector(), &UiAction::Fill(text.to_string()))
        }
        ActionKind::Trigger(event) => {
            no_args(binding, args)?;
            act_on(dom, binding, &binding.selector(), &UiAction::Trigger(event.clone()))
        }
        ActionKind::Visit(template) => {
            let visit = VisitPath::new(template);
            let url = visit.fill(args).map_err(|e| {
                PageError::invalid_usage(binding.path(), format!("{e} in {:?}", visit.template()))
            })?;
            debug!(path = binding.path(), template = visit.template(), url = %url, "visiting");
            dom.visit(&url).map_err(|source| PageError::Dom {
                path: binding.path().to_string(),
                selector: String::new(),
                source,
            })
        }
    }
}
