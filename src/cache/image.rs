//! Image cache loader.
//! Resolves an image URL to a decoded image, memoizing successes in
//! insertion order. Entries leave only through the periodic sweep.

use dashmap::DashMap;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend_client::fetcher::ImageFetcher;
use crate::error::{ClientError, ClientResult};

const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);

/// A successfully loaded image.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub image: Arc<image::RgbaImage>,
}

impl CacheEntry {
    /// Decode encoded image bytes into an entry for `src`.
    pub fn decode(src: &str, bytes: &[u8]) -> ClientResult<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|e| ClientError::image_load(src, e))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            src: src.to_string(),
            width,
            height,
            image: Arc::new(rgba),
        })
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys, oldest first
    order: VecDeque<String>,
}

pub struct ImageCache {
    fetcher: Arc<dyn ImageFetcher>,
    state: Mutex<CacheState>,
    locks: DashMap<String, Arc<tokio::sync::Mutex<()>>>,
    capacity: usize,
    evict_batch: usize,
    fetches: AtomicUsize,
}

impl ImageCache {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, capacity: usize, evict_batch: usize) -> Self {
        Self {
            fetcher,
            state: Mutex::new(CacheState::default()),
            locks: DashMap::new(),
            capacity,
            evict_batch,
            fetches: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, url: &str) -> Option<CacheEntry> {
        self.state().entries.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.state().entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in eviction order.
    pub fn keys(&self) -> Vec<String> {
        self.state().order.iter().cloned().collect()
    }

    /// Number of underlying fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Store an entry. A key already present keeps its eviction position.
    pub fn insert(&self, entry: CacheEntry) {
        let mut state = self.state();
        let key = entry.src.clone();
        if state.entries.insert(key.clone(), entry).is_none() {
            state.order.push_back(key);
        }
    }

    /// Resolve `url` to a decoded image, fetching it on a miss.
    pub async fn load(&self, url: &str) -> ClientResult<CacheEntry> {
        if let Some(hit) = self.get(url) {
            debug!("[CACHE] hit {}", url);
            return Ok(hit);
        }

        // Coalesce concurrent loads of the same URL
        let lock = self
            .locks
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone();

        let guard = lock.lock().await;

        if let Some(hit) = self.get(url) {
            debug!("[CACHE] hit {} (after wait)", url);
            return Ok(hit);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        let result = match self.fetcher.fetch(url).await {
            Ok(bytes) => CacheEntry::decode(url, &bytes),
            Err(e) => Err(e),
        };

        match result {
            Ok(entry) => {
                debug!("[CACHE] loaded {} ({}x{})", url, entry.width, entry.height);
                self.insert(entry.clone());
                drop(guard);
                self.locks.remove(url);
                Ok(entry)
            }
            Err(e) => {
                drop(guard);
                self.locks.remove(url);
                Err(e)
            }
        }
    }

    /// Warm the cache in the background. Failures are ignored.
    pub fn preload(self: &Arc<Self>, urls: &[String]) -> Vec<JoinHandle<()>> {
        urls.iter()
            .cloned()
            .map(|url| {
                let cache = Arc::clone(self);
                tokio::spawn(async move {
                    if let Err(e) = cache.load(&url).await {
                        debug!("[CACHE] preload skipped: {}", e);
                    }
                })
            })
            .collect()
    }

    /// Evict the oldest batch once the cache has grown past capacity.
    /// Returns how many entries were removed.
    pub fn sweep(&self) -> usize {
        let mut state = self.state();
        if state.entries.len() <= self.capacity {
            return 0;
        }

        let count = self.evict_batch.min(state.order.len());
        for _ in 0..count {
            if let Some(key) = state.order.pop_front() {
                state.entries.remove(&key);
            }
        }

        info!("[CACHE] swept {} entries, {} remain", count, state.entries.len());
        count
    }

    /// Run [`sweep`](Self::sweep) every `every`, starting one period from now.
    /// Periods under one second are raised to one second.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let every = every.max(MIN_SWEEP_PERIOD);
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            loop {
                ticker.tick().await;
                match cache.upgrade() {
                    Some(cache) => {
                        cache.sweep();
                    }
                    None => break,
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/image.rs"]
mod tests;
