//! In-memory page used by the CLI and the tests.
//! Built from a JSON page description; records every host-side effect
//! (alerts, navigations, document replacement) so callers can inspect it.

use dashmap::DashMap;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{ElementId, NewElement, View, Viewport};
use crate::error::{ClientError, ClientResult};

fn default_tag() -> String {
    "div".into()
}

fn zero_rect() -> Rect {
    Rect::ZERO
}

fn yes() -> bool {
    true
}

/// One element of a page description. Children nest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: BTreeMap<String, String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "type", default)]
    pub input_type: Option<String>,
    /// Layout box in document coordinates
    #[serde(default = "zero_rect")]
    pub rect: Rect,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

/// Whole page description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub viewport: Viewport,
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default)]
    pub session: BTreeMap<String, String>,
    #[serde(default = "yes")]
    pub service_worker_supported: bool,
    #[serde(default)]
    pub body: Vec<ElementSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub id: Option<String>,
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub content: String,
    pub text: String,
    pub name: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    #[serde(skip)]
    pub rect: Rect,
    #[serde(skip)]
    parent: Option<usize>,
    #[serde(skip)]
    initial_value: Option<String>,
}

impl Element {
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct DocumentLog {
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
    pub replaced_with: Option<String>,
    pub service_workers: Vec<String>,
    pub scrolled_into_view: Vec<ElementId>,
}

struct DocState {
    elements: Vec<Element>,
    viewport: Viewport,
    scroll_y: f64,
    service_worker_supported: bool,
    log: DocumentLog,
}

pub struct Document {
    state: Mutex<DocState>,
    session: DashMap<String, String>,
}

const BODY: usize = 0;

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        Self::from_spec(PageSpec {
            viewport,
            scroll_y: 0.0,
            session: BTreeMap::new(),
            service_worker_supported: true,
            body: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> ClientResult<Self> {
        let spec: PageSpec =
            serde_json::from_str(json).map_err(|e| ClientError::decode(format!("page description: {}", e)))?;
        Ok(Self::from_spec(spec))
    }

    pub fn from_spec(spec: PageSpec) -> Self {
        let mut elements = vec![Element {
            id: None,
            tag: "body".into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            content: String::new(),
            text: String::new(),
            name: None,
            value: None,
            input_type: None,
            rect: Rect::ZERO,
            parent: None,
            initial_value: None,
        }];
        for child in spec.body {
            flatten(child, BODY, &mut elements);
        }

        let session = DashMap::new();
        for (k, v) in spec.session {
            session.insert(k, v);
        }

        debug!("[VIEW] document with {} elements", elements.len());

        Self {
            state: Mutex::new(DocState {
                elements,
                viewport: spec.viewport,
                scroll_y: spec.scroll_y,
                service_worker_supported: spec.service_worker_supported,
                log: DocumentLog::default(),
            }),
            session,
        }
    }

    fn state(&self) -> MutexGuard<'_, DocState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a top-level element, returning its handle.
    pub fn push(&self, spec: ElementSpec) -> ElementId {
        let mut state = self.state();
        let id = state.elements.len();
        flatten(spec, BODY, &mut state.elements);
        ElementId(id)
    }

    pub fn scroll_to(&self, y: f64) {
        self.state().scroll_y = y;
    }

    pub fn resize(&self, viewport: Viewport) {
        self.state().viewport = viewport;
    }

    pub fn set_session_item(&self, key: &str, value: &str) {
        self.session.insert(key.to_string(), value.to_string());
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state().log.alerts.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state().log.navigations.clone()
    }

    pub fn replaced_with(&self) -> Option<String> {
        self.state().log.replaced_with.clone()
    }

    pub fn service_workers(&self) -> Vec<String> {
        self.state().log.service_workers.clone()
    }

    pub fn scrolled_into_view(&self) -> Vec<ElementId> {
        self.state().log.scrolled_into_view.clone()
    }

    pub fn element(&self, el: ElementId) -> Option<Element> {
        self.state().elements.get(el.0).cloned()
    }

    /// JSON dump of every element and the recorded host effects.
    pub fn snapshot(&self) -> serde_json::Value {
        let state = self.state();
        serde_json::json!({
            "scroll_y": state.scroll_y,
            "viewport": state.viewport,
            "elements": state.elements,
            "log": state.log,
        })
    }

    fn with_element<R>(&self, el: ElementId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let mut state = self.state();
        state.elements.get_mut(el.0).map(f)
    }
}

fn flatten(spec: ElementSpec, parent: usize, out: &mut Vec<Element>) {
    let index = out.len();
    out.push(Element {
        id: spec.id,
        tag: spec.tag,
        classes: spec.classes,
        attributes: spec.attributes,
        style: spec.style,
        content: spec.content,
        text: spec.text,
        name: spec.name,
        initial_value: spec.value.clone(),
        value: spec.value,
        input_type: spec.input_type,
        rect: spec.rect,
        parent: Some(parent),
    });
    for child in spec.children {
        flatten(child, index, out);
    }
}

fn is_descendant(elements: &[Element], mut index: usize, ancestor: usize) -> bool {
    while let Some(parent) = elements.get(index).and_then(|e| e.parent) {
        if parent == ancestor {
            return true;
        }
        index = parent;
    }
    false
}

impl View for Document {
    fn viewport(&self) -> Viewport {
        self.state().viewport
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.state()
            .elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(ElementId)
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.state()
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn find_in(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        let state = self.state();
        state
            .elements
            .iter()
            .enumerate()
            .find(|(i, e)| e.has_class(class) && is_descendant(&state.elements, *i, scope.0))
            .map(|(i, _)| ElementId(i))
    }

    fn inputs_of_type(&self, input_type: &str) -> Vec<ElementId> {
        self.state()
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.tag == "input" && e.input_type.as_deref() == Some(input_type))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn body(&self) -> ElementId {
        ElementId(BODY)
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let state = self.state();
        let scroll_y = state.scroll_y;
        state
            .elements
            .get(el.0)
            .map(|e| e.rect + kurbo::Vec2::new(0.0, -scroll_y))
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.state().elements.get(el.0)?.attributes.get(name).cloned()
    }

    fn set_attribute(&self, el: ElementId, name: &str, value: &str) {
        self.with_element(el, |e| e.attributes.insert(name.to_string(), value.to_string()));
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.state().elements.get(el.0)?.style.get(property).cloned()
    }

    fn set_style(&self, el: ElementId, property: &str, value: &str) {
        self.with_element(el, |e| e.style.insert(property.to_string(), value.to_string()));
    }

    fn set_content(&self, el: ElementId, html: &str) {
        self.with_element(el, |e| e.content = html.to_string());
    }

    fn text(&self, el: ElementId) -> String {
        self.with_element(el, |e| e.text.clone()).unwrap_or_default()
    }

    fn set_text(&self, el: ElementId, text: &str) {
        self.with_element(el, |e| e.text = text.to_string());
    }

    fn value(&self, el: ElementId) -> Option<String> {
        self.state().elements.get(el.0)?.value.clone()
    }

    fn set_value(&self, el: ElementId, value: &str) {
        self.with_element(el, |e| e.value = Some(value.to_string()));
    }

    fn add_class(&self, el: ElementId, class: &str) {
        self.with_element(el, |e| {
            if !e.has_class(class) {
                e.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, el: ElementId, class: &str) {
        self.with_element(el, |e| e.classes.retain(|c| c != class));
    }

    fn append(&self, parent: ElementId, element: NewElement) -> ElementId {
        let mut state = self.state();
        let index = state.elements.len();
        state.elements.push(Element {
            id: None,
            tag: element.tag,
            classes: element.classes,
            attributes: BTreeMap::new(),
            style: element.styles.into_iter().collect(),
            content: element.content,
            text: String::new(),
            name: None,
            value: None,
            input_type: None,
            rect: Rect::ZERO,
            parent: Some(parent.0),
            initial_value: None,
        });
        ElementId(index)
    }

    fn form_fields(&self, form: ElementId) -> Vec<(String, String)> {
        let state = self.state();
        state
            .elements
            .iter()
            .enumerate()
            .filter(|(i, _)| is_descendant(&state.elements, *i, form.0))
            .filter_map(|(_, e)| {
                e.name
                    .as_ref()
                    .map(|name| (name.clone(), e.value.clone().unwrap_or_default()))
            })
            .collect()
    }

    fn reset_form(&self, form: ElementId) {
        let mut state = self.state();
        let members: Vec<usize> = (0..state.elements.len())
            .filter(|i| is_descendant(&state.elements, *i, form.0))
            .collect();
        for i in members {
            let e = &mut state.elements[i];
            e.value = e.initial_value.clone();
        }
    }

    fn scroll_into_view(&self, el: ElementId) {
        let mut state = self.state();
        if let Some(top) = state.elements.get(el.0).map(|e| e.rect.y0) {
            state.scroll_y = top;
            state.log.scrolled_into_view.push(el);
        }
    }

    fn alert(&self, message: &str) {
        self.state().log.alerts.push(message.to_string());
    }

    fn navigate(&self, url: &str) {
        self.state().log.navigations.push(url.to_string());
    }

    fn replace_document(&self, html: &str) {
        self.state().log.replaced_with = Some(html.to_string());
    }

    fn session_item(&self, key: &str) -> Option<String> {
        self.session.get(key).map(|v| v.value().clone())
    }

    fn register_service_worker(&self, script: &str) -> ClientResult<()> {
        let mut state = self.state();
        if !state.service_worker_supported {
            return Err(ClientError::unsupported("service workers"));
        }
        state.log.service_workers.push(script.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/document.rs"]
mod tests;
