//! In-memory HTML host.
//!
//! [`HtmlFixture`] parses HTML with `scraper` and uses its native CSS
//! selector engine to implement [`Dom`]. It implements [`Interact`] by
//! recording fired events and visited URLs, and keeps filled form values in
//! an overlay so value queries observe them on the next access.
//! Clicking or filling an element carrying a `disabled` attribute fails
//! with [`DomError::ActionFailed`] and fires nothing.
//!
//! The fixture content is wrapped in a testing root
//! (`<div id="probar-testing">`); an optional alternate container
//! (`<div id="probar-alternate-testing">`) sits next to it.

use crate::dom::{ActionTarget, Dom, ElementId, Interact, UiAction};
use crate::result::DomError;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::trace;

/// Id of the element every page object query starts from
pub const TESTING_ROOT_ID: &str = "probar-testing";

/// Id of the alternate container
pub const ALTERNATE_ROOT_ID: &str = "probar-alternate-testing";

/// An event fired by an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredEvent {
    /// Event name (`click`, `input`, `change`, or the triggered event)
    pub name: String,
    /// Element the event was dispatched on
    pub target: ElementId,
}

/// HTML document acting as the host DOM
#[derive(Debug, Clone)]
pub struct HtmlFixture {
    html: Html,
    content: String,
    alternate: Option<String>,
    values: HashMap<ElementId, String>,
    events: Vec<FiredEvent>,
    visits: Vec<String>,
}

impl HtmlFixture {
    /// Render `content` inside the testing root
    #[must_use]
    pub fn new(content: &str) -> Self {
        Self {
            html: parse(content, None),
            content: content.to_string(),
            alternate: None,
            values: HashMap::new(),
            events: Vec::new(),
            visits: Vec::new(),
        }
    }

    /// Render `content` inside the alternate container as well
    #[must_use]
    pub fn with_alternate(mut self, content: &str) -> Self {
        self.alternate = Some(content.to_string());
        self.html = parse(&self.content, self.alternate.as_deref());
        self.values.clear();
        self
    }

    /// Replace the testing root content, as a re-render would.
    ///
    /// Filled values are dropped; recorded events and visits are kept.
    pub fn set_html(&mut self, content: &str) {
        content.clone_into(&mut self.content);
        self.html = parse(&self.content, self.alternate.as_deref());
        self.values.clear();
    }

    /// Events fired so far, oldest first
    #[must_use]
    pub fn events(&self) -> &[FiredEvent] {
        &self.events
    }

    /// Targets of every event named `name`
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<ElementId> {
        self.events
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.target)
            .collect()
    }

    /// URLs visited so far
    #[must_use]
    pub fn visits(&self) -> &[String] {
        &self.visits
    }

    /// Last visited URL
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.visits.last().map(String::as_str)
    }

    /// First element of the whole document matching `css`
    #[must_use]
    pub fn find(&self, css: &str) -> Option<ElementId> {
        self.query_all(self.document_root(), css)
            .ok()
            .and_then(|found| found.first().copied())
    }

    /// Lower-case tag name of an element
    #[must_use]
    pub fn tag_name(&self, element: ElementId) -> Option<String> {
        self.element(element).map(|e| e.value().name().to_string())
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.elements().nth(id.0)
    }

    fn select_value(&self, select: ElementRef<'_>) -> Option<String> {
        let options = Selector::parse("option").ok()?;
        let mut all = select.select(&options).peekable();
        let first = all.peek().copied();
        let chosen = all
            .find(|o| o.value().attr("selected").is_some())
            .or(first)?;
        Some(
            chosen
                .value()
                .attr("value")
                .map_or_else(|| chosen.text().collect(), str::to_string),
        )
    }
}

fn parse(content: &str, alternate: Option<&str>) -> Html {
    let alternate = alternate
        .map(|alt| format!("<div id=\"{ALTERNATE_ROOT_ID}\">{alt}</div>"))
        .unwrap_or_default();
    Html::parse_document(&format!(
        "<!DOCTYPE html><html><head></head><body><div id=\"{TESTING_ROOT_ID}\">{content}</div>{alternate}</body></html>"
    ))
}

fn style_declarations(element: &Element) -> Vec<(String, String)> {
    element
        .attr("style")
        .unwrap_or_default()
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(prop, value)| (prop.trim().to_ascii_lowercase(), value.trim().to_ascii_lowercase()))
        .collect()
}

/// Hidden itself, and so is its whole subtree
fn hides_subtree(element: &Element) -> bool {
    element.attr("hidden").is_some()
        || (element.name() == "input" && element.attr("type") == Some("hidden"))
        || style_declarations(element)
            .iter()
            .any(|(prop, value)| prop == "display" && value == "none")
}

fn has_zero_size(element: &Element) -> bool {
    style_declarations(element).iter().any(|(prop, value)| {
        (prop == "width" || prop == "height") && (value == "0" || value == "0px")
    })
}

impl Dom for HtmlFixture {
    fn testing_root(&self) -> ElementId {
        self.elements()
            .position(|e| e.value().id() == Some(TESTING_ROOT_ID))
            .map_or(ElementId(0), ElementId)
    }

    fn document_root(&self) -> ElementId {
        ElementId(0)
    }

    fn query_all(&self, context: ElementId, selector: &str) -> Result<Vec<ElementId>, DomError> {
        let context_ref = self
            .element(context)
            .ok_or(DomError::UnknownElement(context))?;
        if selector.trim().is_empty() {
            return Ok(vec![context]);
        }
        let parsed = Selector::parse(selector).map_err(|e| DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        let positions: HashMap<_, usize> = self
            .elements()
            .enumerate()
            .map(|(i, e)| (e.id(), i))
            .collect();
        Ok(context_ref
            .select(&parsed)
            .filter_map(|found| positions.get(&found.id()).copied())
            .map(ElementId)
            .collect())
    }

    fn is_visible(&self, element: ElementId) -> bool {
        let Some(el) = self.element(element) else {
            return false;
        };
        if has_zero_size(el.value()) {
            return false;
        }
        !std::iter::once(el)
            .chain(el.ancestors().filter_map(ElementRef::wrap))
            .any(|e| hides_subtree(e.value()))
    }

    fn text(&self, element: ElementId) -> String {
        self.element(element)
            .map(|e| e.text().collect())
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)
            .and_then(|e| e.value().attr(name).map(str::to_string))
    }

    fn value(&self, element: ElementId) -> Option<String> {
        if let Some(filled) = self.values.get(&element) {
            return Some(filled.clone());
        }
        let el = self.element(element)?;
        match el.value().name() {
            "textarea" => Some(el.text().collect()),
            "select" => self.select_value(el),
            _ => el.value().attr("value").map(str::to_string),
        }
    }
}

impl Interact for HtmlFixture {
    fn perform(&mut self, target: &ActionTarget<'_>, action: &UiAction) -> Result<(), DomError> {
        for &element in target.elements {
            let el = self.element(element).ok_or(DomError::UnknownElement(element))?;
            let needs_enabled = matches!(action, UiAction::Click | UiAction::Fill(_));
            if needs_enabled && el.value().attr("disabled").is_some() {
                return Err(DomError::ActionFailed {
                    action: action.name().to_string(),
                    reason: format!("{element} is disabled"),
                });
            }
        }
        for &element in target.elements {
            trace!(
                action = action.name(),
                %element,
                css = %target.selector.css(),
                container = target.container.unwrap_or(""),
                "fixture action"
            );
            let fired: &[&str] = match action {
                UiAction::Click => &["click"],
                UiAction::Fill(text) => {
                    let _ = self.values.insert(element, text.clone());
                    &["input", "change"]
                }
                UiAction::Trigger(event) => {
                    self.events.push(FiredEvent {
                        name: event.clone(),
                        target: element,
                    });
                    &[]
                }
            };
            self.events.extend(fired.iter().map(|name| FiredEvent {
                name: (*name).to_string(),
                target: element,
            }));
        }
        Ok(())
    }

    fn visit(&mut self, url: &str) -> Result<(), DomError> {
        trace!(url, "fixture visit");
        self.visits.push(url.to_string());
        Ok(())
    }
}
