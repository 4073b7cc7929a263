use std::time::Duration;

use super::*;
use crate::test_support::{cache_with, entry, png_bytes, StubFetcher};

#[tokio::test]
async fn second_load_after_resolve_is_served_from_cache() {
    let url = "https://x/img.png";
    let (fetcher, cache) = cache_with(StubFetcher::default().with(url, png_bytes(300, 200)));

    let first = cache.load(url).await.unwrap();
    assert_eq!((first.width, first.height), (300, 200));
    assert_eq!(first.src, url);

    let second = cache.load(url).await.unwrap();
    assert!(Arc::ptr_eq(&first.image, &second.image));
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(cache.fetch_count(), 1);
}

#[tokio::test]
async fn failed_load_is_rejected_and_not_cached() {
    let (fetcher, cache) = cache_with(StubFetcher::default());

    let err = cache.load("https://x/missing.png").await.unwrap_err();
    assert!(matches!(err, ClientError::ImageLoad { ref url, .. } if url == "https://x/missing.png"));
    assert!(!cache.contains("https://x/missing.png"));

    // Nothing remembered: the next call goes to the network again
    let _ = cache.load("https://x/missing.png").await;
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn undecodable_bytes_are_a_load_failure() {
    let url = "https://x/garbage.png";
    let (_, cache) = cache_with(StubFetcher::default().with(url, b"not an image".to_vec()));

    let err = cache.load(url).await.unwrap_err();
    assert!(matches!(err, ClientError::ImageLoad { .. }));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn concurrent_loads_of_one_url_share_a_fetch() {
    let url = "https://x/slow.png";
    let (fetcher, cache) = cache_with(
        StubFetcher::default()
            .with(url, png_bytes(4, 4))
            .delayed(Duration::from_millis(20)),
    );

    let (a, b) = tokio::join!(cache.load(url), cache.load(url));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn sweep_of_51_entries_evicts_the_10_oldest() {
    let (_, cache) = cache_with(StubFetcher::default());
    for i in 0..51 {
        cache.insert(entry(&format!("https://x/{i}.png")));
    }

    assert_eq!(cache.sweep(), 10);
    assert_eq!(cache.len(), 41);
    for i in 0..10 {
        assert!(!cache.contains(&format!("https://x/{i}.png")));
    }
    for i in 10..51 {
        assert!(cache.contains(&format!("https://x/{i}.png")));
    }
}

#[test]
fn sweep_at_or_below_capacity_is_a_no_op() {
    let (_, cache) = cache_with(StubFetcher::default());
    for i in 0..50 {
        cache.insert(entry(&format!("https://x/{i}.png")));
    }
    assert_eq!(cache.sweep(), 0);
    assert_eq!(cache.len(), 50);
}

#[test]
fn reinserting_keeps_the_original_position() {
    let (_, cache) = cache_with(StubFetcher::default());
    cache.insert(entry("a"));
    cache.insert(entry("b"));
    cache.insert(entry("a"));
    assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn sweeper_runs_after_one_full_interval() {
    let (_, cache) = cache_with(StubFetcher::default());
    for i in 0..51 {
        cache.insert(entry(&format!("{i}")));
    }

    let handle = cache.spawn_sweeper(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_secs(59)).await;
    assert_eq!(cache.len(), 51);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.len(), 41);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn zero_period_sweeper_still_sweeps() {
    let (_, cache) = cache_with(StubFetcher::default());
    for i in 0..51 {
        cache.insert(entry(&format!("{i}")));
    }

    let handle = cache.spawn_sweeper(Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!handle.is_finished());
    assert_eq!(cache.len(), 41);
    handle.abort();
}

#[tokio::test]
async fn preload_ignores_failures() {
    let ok = "https://x/ok.png";
    let (_, cache) = cache_with(StubFetcher::default().with(ok, png_bytes(2, 2)));

    let handles = cache.preload(&[ok.to_string(), "https://x/bad.png".to_string()]);
    for h in handles {
        h.await.unwrap();
    }
    assert!(cache.contains(ok));
    assert_eq!(cache.len(), 1);
}
