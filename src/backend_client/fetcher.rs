//! Image byte source injected into the image cache.

use std::future::Future;
use std::pin::Pin;

use super::client::BackendClient;
use crate::error::{ClientError, ClientResult};

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = ClientResult<Vec<u8>>> + Send + 'a>>;

/// Fetches the encoded bytes behind an image URL.
pub trait ImageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

impl ImageFetcher for BackendClient {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            self.get_bytes(url)
                .await
                .map_err(|e| ClientError::image_load(url, e))
        })
    }
}
