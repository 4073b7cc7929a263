//! Rendering-surface capability injected into the page controller.
//!
//! Everything the controller reads from or writes to the page goes through
//! [`View`], so the scanning, caching and form logic run the same against a
//! real host or the in-memory [`document::Document`].

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::error::ClientResult;

pub mod document;

/// Handle to one element, stable for the lifetime of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Size of the visible region, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Rectangle-overlap test against a viewport-relative bounding box.
    /// Touching edges count as visible; containment is not required.
    pub fn intersects(&self, rect: Rect) -> bool {
        rect.y0 <= self.height && rect.y1 >= 0.0 && rect.x0 <= self.width && rect.x1 >= 0.0
    }
}

/// Element to append under a parent.
#[derive(Debug, Clone, Default)]
pub struct NewElement {
    pub tag: String,
    pub classes: Vec<String>,
    pub content: String,
    pub styles: Vec<(String, String)>,
}

pub trait View: Send + Sync {
    fn viewport(&self) -> Viewport;

    fn element_by_id(&self, id: &str) -> Option<ElementId>;
    /// Elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;
    /// First descendant of `scope` carrying `class`.
    fn find_in(&self, scope: ElementId, class: &str) -> Option<ElementId>;
    /// `<input>` elements of the given `type`, in document order.
    fn inputs_of_type(&self, input_type: &str) -> Vec<ElementId>;
    fn body(&self) -> ElementId;

    /// Bounding box relative to the viewport origin.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&self, el: ElementId, name: &str, value: &str);
    fn style(&self, el: ElementId, property: &str) -> Option<String>;
    fn set_style(&self, el: ElementId, property: &str, value: &str);
    fn set_content(&self, el: ElementId, html: &str);
    fn text(&self, el: ElementId) -> String;
    fn set_text(&self, el: ElementId, text: &str);
    fn value(&self, el: ElementId) -> Option<String>;
    fn set_value(&self, el: ElementId, value: &str);
    fn add_class(&self, el: ElementId, class: &str);
    fn remove_class(&self, el: ElementId, class: &str);
    fn append(&self, parent: ElementId, element: NewElement) -> ElementId;

    /// Named fields of a form, in document order.
    fn form_fields(&self, form: ElementId) -> Vec<(String, String)>;
    fn reset_form(&self, form: ElementId);
    fn scroll_into_view(&self, el: ElementId);

    /// Blocking message dialog.
    fn alert(&self, message: &str);
    fn navigate(&self, url: &str);
    /// Replace the whole document with server-rendered HTML.
    fn replace_document(&self, html: &str);
    fn session_item(&self, key: &str) -> Option<String>;
    fn register_service_worker(&self, script: &str) -> ClientResult<()>;
}

/// Form field value by element id.
pub fn input_value(view: &dyn View, id: &str) -> Option<String> {
    view.element_by_id(id).and_then(|el| view.value(el))
}

#[cfg(test)]
#[path = "../../tests/unit/view/viewport.rs"]
mod tests;
