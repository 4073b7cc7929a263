//! Viewport scanner.
//! Finds image placeholders that are not loaded yet, and for the ones that
//! overlap the viewport starts a cached load. Success paints the image,
//! failure paints the fallback gradient; both mark the element loaded for good.

use dashmap::DashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::image::{CacheEntry, ImageCache};
use crate::view::{ElementId, View};

pub const IMAGE_CLASS: &str = "destination-image";
pub const SRC_ATTR: &str = "data-src";
pub const LOADED_ATTR: &str = "data-loaded";
pub const FALLBACK_GRADIENT: &str = "linear-gradient(135deg, #4fd1c5 0%, #319795 100%)";

/// Counts from one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Unloaded placeholders looked at
    pub examined: usize,
    /// Of those, overlapping the viewport
    pub visible: usize,
    /// Loads started
    pub started: usize,
}

/// Terminal state an element was driven to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finalized {
    Image,
    Fallback,
}

pub struct Scanner {
    view: Arc<dyn View>,
    cache: Arc<ImageCache>,
    fallback_label: String,
    in_flight: Arc<DashSet<ElementId>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Scanner {
    pub fn new(view: Arc<dyn View>, cache: Arc<ImageCache>, fallback_label: impl Into<String>) -> Self {
        Self {
            view,
            cache,
            fallback_label: fallback_label.into(),
            in_flight: Arc::new(DashSet::new()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Examine unloaded placeholders once and start loads for visible ones.
    /// Must run inside a tokio runtime.
    pub fn scan(&self) -> ScanReport {
        let viewport = self.view.viewport();
        let mut report = ScanReport::default();

        for el in self.view.elements_with_class(IMAGE_CLASS) {
            if is_loaded(self.view.as_ref(), el) || self.in_flight.contains(&el) {
                continue;
            }
            report.examined += 1;

            let Some(rect) = self.view.bounding_rect(el) else {
                continue;
            };
            if !viewport.intersects(rect) {
                continue;
            }
            report.visible += 1;

            let src = match self.view.attribute(el, SRC_ATTR) {
                Some(src) if !src.is_empty() => src,
                _ => continue,
            };

            self.in_flight.insert(el);
            report.started += 1;
            let handle = self.spawn_load(el, src);
            self.tasks.lock().unwrap_or_else(|e| e.into_inner()).push(handle);
        }

        debug!(
            "[SCAN] examined={} visible={} started={}",
            report.examined, report.visible, report.started
        );
        report
    }

    fn spawn_load(&self, el: ElementId, src: String) -> JoinHandle<()> {
        let view = Arc::clone(&self.view);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);
        let label = self.fallback_label.clone();

        tokio::spawn(async move {
            match cache.load(&src).await {
                Ok(entry) => apply_image(view.as_ref(), el, &entry),
                Err(e) => {
                    warn!("[SCAN] image failed, using fallback: {}", e);
                    apply_fallback(view.as_ref(), el, &label)
                }
            };
            in_flight.remove(&el);
        })
    }

    /// Await every load started so far.
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> =
                std::mem::take(&mut *self.tasks.lock().unwrap_or_else(|e| e.into_inner()));
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    warn!("[SCAN] load task ended abnormally: {}", e);
                }
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

pub fn is_loaded(view: &dyn View, el: ElementId) -> bool {
    view.attribute(el, LOADED_ATTR).as_deref() == Some("true")
}

pub fn apply_image(view: &dyn View, el: ElementId, entry: &CacheEntry) -> Finalized {
    view.set_style(el, "background-image", &format!("url('{}')", entry.src));
    view.set_attribute(el, LOADED_ATTR, "true");
    view.set_style(el, "opacity", "1");
    Finalized::Image
}

pub fn apply_fallback(view: &dyn View, el: ElementId, label: &str) -> Finalized {
    view.set_style(el, "background", FALLBACK_GRADIENT);
    view.set_style(el, "display", "flex");
    view.set_style(el, "align-items", "center");
    view.set_style(el, "justify-content", "center");
    view.set_content(el, &fallback_overlay(label));
    view.set_attribute(el, LOADED_ATTR, "true");
    Finalized::Fallback
}

pub fn fallback_overlay(label: &str) -> String {
    format!(r#"<span style="color: white; font-weight: bold;">{}</span>"#, label)
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/scanner.rs"]
mod tests;
