//! Page controller.
//!
//! Owns the image cache, the viewport scanner, the scroll throttle and the
//! backend client for one page, and maps host lifecycle events onto them:
//!
//! - `dom_ready`: warm critical images, register the service worker, floor
//!   date inputs, add decoration, scan once, start the cache sweeper
//! - `load`: scan once
//! - `scroll` / `resize`: scan, throttled
//! - form submissions, destination clicks, booking

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::backend_client::client::BackendClient;
use crate::backend_client::fetcher::ImageFetcher;
use crate::cache::image::ImageCache;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::services::{self, Submission};
use crate::types::backend::BookingRequest;
use crate::view::{ElementId, View};
use crate::viewport::reveal::reveal_cards;
use crate::viewport::scanner::{ScanReport, Scanner};
use crate::viewport::throttle::Throttle;

pub mod decor;
pub mod destinations;

pub struct Page {
    config: ClientConfig,
    view: Arc<dyn View>,
    backend: BackendClient,
    cache: Arc<ImageCache>,
    scanner: Arc<Scanner>,
    throttle: Throttle,
    sweeper: Option<JoinHandle<()>>,
}

impl Page {
    /// Page whose images come from the backend client.
    pub fn new(config: ClientConfig, view: Arc<dyn View>) -> ClientResult<Self> {
        let backend = BackendClient::from_config(&config)?;
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(backend.clone());
        Ok(Self::with_fetcher(config, view, backend, fetcher))
    }

    pub fn with_fetcher(
        config: ClientConfig,
        view: Arc<dyn View>,
        backend: BackendClient,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        let cache = Arc::new(ImageCache::new(
            fetcher,
            config.cache_capacity,
            config.cache_evict_batch,
        ));
        let scanner = Arc::new(Scanner::new(
            Arc::clone(&view),
            Arc::clone(&cache),
            config.fallback_label.clone(),
        ));
        let throttle = Throttle::new(config.scan_throttle());

        Self {
            config,
            view,
            backend,
            cache,
            scanner,
            throttle,
            sweeper: None,
        }
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    pub fn dom_ready(&mut self) -> ScanReport {
        self.cache.preload(&self.config.preload_images);

        match self.view.register_service_worker(&self.config.service_worker) {
            Ok(()) => info!("[PAGE] service worker registered"),
            Err(e) => info!("[PAGE] service worker unavailable: {}", e),
        }

        destinations::set_min_dates(self.view.as_ref(), chrono::Utc::now().date_naive());
        decor::add_airplanes(self.view.as_ref());

        if self.sweeper.is_none() {
            self.sweeper = Some(self.cache.spawn_sweeper(self.config.cache_sweep_interval()));
        }

        self.refresh()
    }

    pub fn load(&self) -> ScanReport {
        self.refresh()
    }

    /// Returns whether this event scheduled a scan.
    pub fn scroll(&self) -> bool {
        let scanner = Arc::clone(&self.scanner);
        let view = Arc::clone(&self.view);
        self.throttle.trigger(move || {
            scanner.scan();
            reveal_cards(view.as_ref());
        })
    }

    pub fn resize(&self) -> bool {
        self.scroll()
    }

    /// Scan for images and reveal cards now.
    pub fn refresh(&self) -> ScanReport {
        let report = self.scanner.scan();
        reveal_cards(self.view.as_ref());
        report
    }

    /// Wait for every image load started so far.
    pub async fn settle(&self) {
        self.scanner.settle().await;
    }

    pub async fn submit(&self, form_id: &str) -> Submission {
        let view = self.view.as_ref();
        match form_id {
            services::subscribe::FORM_ID => services::subscribe::submit_subscription(view, &self.backend).await,
            services::auth::LOGIN_FORM => services::auth::submit_login(view, &self.backend).await,
            services::auth::REGISTER_FORM => services::auth::submit_registration(view, &self.backend).await,
            services::search::SEARCH_FORM => services::search::submit_search(view, &self.backend).await,
            other => {
                warn!("[PAGE] no handler for form #{}", other);
                Submission::Skipped
            }
        }
    }

    pub async fn book(&self, flight: &BookingRequest) -> Submission {
        services::booking::book_flight(self.view.as_ref(), &self.backend, flight).await
    }

    pub fn download_ticket(&self, booking_ref: &str) -> Submission {
        services::booking::download_ticket(self.view.as_ref(), booking_ref)
    }

    pub fn click_destination(&self, card: ElementId) -> ClientResult<(String, String)> {
        destinations::choose_destination(self.view.as_ref(), card)
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/controller.rs"]
mod tests;
