//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::backend_client::fetcher::{FetchFuture, ImageFetcher};
use crate::cache::image::{CacheEntry, ImageCache};
use crate::error::ClientError;

/// Encode a solid `width`×`height` PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 40, 60, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn entry(src: &str) -> CacheEntry {
    CacheEntry {
        src: src.to_string(),
        width: 1,
        height: 1,
        image: Arc::new(image::RgbaImage::new(1, 1)),
    }
}

/// Serves canned bytes per URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StubFetcher {
    pub images: HashMap<String, Vec<u8>>,
    pub delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubFetcher {
    pub fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageFetcher for StubFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.images
                .get(url)
                .cloned()
                .ok_or_else(|| ClientError::image_load(url, "404 Not Found"))
        })
    }
}

pub fn cache_with(fetcher: StubFetcher) -> (Arc<StubFetcher>, Arc<ImageCache>) {
    let fetcher = Arc::new(fetcher);
    let cache = Arc::new(ImageCache::new(fetcher.clone(), 50, 10));
    (fetcher, cache)
}
