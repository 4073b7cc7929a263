use std::collections::BTreeMap;
use std::time::Duration;

use kurbo::Rect;

use super::*;
use crate::test_support::{cache_with, png_bytes, StubFetcher};
use crate::view::document::{Document, ElementSpec};
use crate::view::Viewport;

fn placeholder(src: &str, y0: f64) -> ElementSpec {
    let mut attributes = BTreeMap::new();
    attributes.insert(SRC_ATTR.to_string(), src.to_string());
    ElementSpec {
        id: None,
        tag: "div".into(),
        classes: vec![IMAGE_CLASS.into()],
        attributes,
        style: BTreeMap::new(),
        content: String::new(),
        text: String::new(),
        name: None,
        value: None,
        input_type: None,
        rect: Rect::new(0.0, y0, 300.0, y0 + 200.0),
        children: Vec::new(),
    }
}

fn page() -> Arc<Document> {
    Arc::new(Document::new(Viewport {
        width: 1024.0,
        height: 768.0,
    }))
}

#[tokio::test]
async fn visible_image_is_painted_and_marked() {
    let doc = page();
    let el = doc.push(placeholder("https://x/img.png", 100.0));
    let (_, cache) = cache_with(StubFetcher::default().with("https://x/img.png", png_bytes(300, 200)));
    let scanner = Scanner::new(doc.clone(), cache.clone(), "Sochi");

    let report = scanner.scan();
    assert_eq!(report, ScanReport { examined: 1, visible: 1, started: 1 });
    scanner.settle().await;

    assert_eq!(doc.style(el, "background-image").as_deref(), Some("url('https://x/img.png')"));
    assert_eq!(doc.style(el, "opacity").as_deref(), Some("1"));
    assert_eq!(doc.attribute(el, LOADED_ATTR).as_deref(), Some("true"));
    let cached = cache.get("https://x/img.png").unwrap();
    assert_eq!((cached.width, cached.height), (300, 200));
}

#[tokio::test]
async fn offscreen_element_is_left_alone() {
    let doc = page();
    let el = doc.push(placeholder("https://x/far.png", 2000.0));
    let (fetcher, cache) = cache_with(StubFetcher::default().with("https://x/far.png", png_bytes(1, 1)));
    let scanner = Scanner::new(doc.clone(), cache, "Sochi");

    let report = scanner.scan();
    scanner.settle().await;

    assert_eq!(report, ScanReport { examined: 1, visible: 0, started: 0 });
    assert_eq!(doc.attribute(el, LOADED_ATTR), None);
    assert_eq!(fetcher.calls(), 0);

    // Picked up once scrolled into view
    doc.scroll_to(1500.0);
    assert_eq!(scanner.scan().started, 1);
    scanner.settle().await;
    assert_eq!(doc.attribute(el, LOADED_ATTR).as_deref(), Some("true"));
}

#[tokio::test]
async fn failed_load_gets_fallback_exactly_once() {
    let doc = page();
    let el = doc.push(placeholder("https://x/broken.png", 0.0));
    let (fetcher, cache) = cache_with(StubFetcher::default().delayed(Duration::from_millis(10)));
    let scanner = Scanner::new(doc.clone(), cache, "Sochi");

    assert_eq!(scanner.scan().started, 1);
    // A scan while the load is in flight does not start another one
    assert_eq!(scanner.scan().started, 0);
    scanner.settle().await;

    assert_eq!(doc.style(el, "background").as_deref(), Some(FALLBACK_GRADIENT));
    assert_eq!(doc.style(el, "display").as_deref(), Some("flex"));
    assert_eq!(doc.element(el).unwrap().content, fallback_overlay("Sochi"));
    assert_eq!(doc.attribute(el, LOADED_ATTR).as_deref(), Some("true"));
    assert_eq!(doc.style(el, "background-image"), None);

    // Terminal: never retried
    assert_eq!(scanner.scan(), ScanReport::default());
    scanner.settle().await;
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(scanner.in_flight(), 0);
}

#[tokio::test]
async fn empty_source_is_skipped() {
    let doc = page();
    let el = doc.push(placeholder("", 0.0));
    let (fetcher, cache) = cache_with(StubFetcher::default());
    let scanner = Scanner::new(doc.clone(), cache, "Sochi");

    let report = scanner.scan();
    assert_eq!(report.visible, 1);
    assert_eq!(report.started, 0);
    assert_eq!(doc.attribute(el, LOADED_ATTR), None);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn loaded_elements_are_excluded() {
    let doc = page();
    let el = doc.push(placeholder("https://x/img.png", 0.0));
    doc.set_attribute(el, LOADED_ATTR, "true");
    let (_, cache) = cache_with(StubFetcher::default());
    let scanner = Scanner::new(doc, cache, "Sochi");

    assert_eq!(scanner.scan(), ScanReport::default());
}

#[tokio::test]
async fn shared_source_is_fetched_once_across_elements() {
    let doc = page();
    let a = doc.push(placeholder("https://x/same.png", 0.0));
    let b = doc.push(placeholder("https://x/same.png", 300.0));
    let (fetcher, cache) = cache_with(StubFetcher::default().with("https://x/same.png", png_bytes(8, 8)));
    let scanner = Scanner::new(doc.clone(), cache, "Sochi");

    assert_eq!(scanner.scan().started, 2);
    scanner.settle().await;

    assert!(is_loaded(doc.as_ref(), a));
    assert!(is_loaded(doc.as_ref(), b));
    assert_eq!(fetcher.calls(), 1);
}
