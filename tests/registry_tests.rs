//! Registry tests
//!
//! Concurrency and expiry behavior of the in-memory registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::{TimeDelta, Utc};

use linkpulse::errors::LinkpulseError;
use linkpulse::registry::{ClickContext, Clock, CreateLink, ManualClock, Registry};
use linkpulse::telemetry::NullTelemetry;

// =============================================================================
// Test Setup
// =============================================================================

fn new_registry() -> Registry {
    Registry::new("http://localhost:5000", Arc::new(NullTelemetry))
}

fn create_with_code(registry: &Registry, url: &str, code: &str) {
    registry
        .create(CreateLink {
            url: url.to_string(),
            validity_minutes: Some(30),
            shortcode: Some(code.to_string()),
        })
        .expect("create should succeed");
}

// =============================================================================
// Create / resolve
// =============================================================================

#[test]
fn test_distinct_codes_resolve_to_original_urls() {
    let registry = new_registry();
    let urls: Vec<String> = (0..50)
        .map(|i| format!("https://example.com/page/{}?q={}", i, i * 7))
        .collect();

    let codes: Vec<String> = urls
        .iter()
        .map(|url| {
            registry
                .create(CreateLink {
                    url: url.clone(),
                    ..CreateLink::default()
                })
                .unwrap()
                .code
        })
        .collect();

    for (code, url) in codes.iter().zip(&urls) {
        assert_eq!(
            &registry.resolve(code, ClickContext::default()).unwrap(),
            url
        );
    }
    assert_eq!(registry.len(), 50);
}

#[test]
fn test_concurrent_creates_same_code_one_winner() {
    let registry = Arc::new(new_registry());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry.create(CreateLink {
                    url: format!("https://example.com/{}", i),
                    validity_minutes: None,
                    shortcode: Some("race01".to_string()),
                })
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(LinkpulseError::CodeConflict(_))))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 15);
    assert_eq!(registry.len(), 1);
}

// =============================================================================
// Click accounting
// =============================================================================

#[test]
fn test_concurrent_resolves_count_every_click() {
    const THREADS: usize = 8;
    const CLICKS_PER_THREAD: usize = 250;

    let registry = Arc::new(new_registry());
    create_with_code(&registry, "https://example.com", "hot001");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..CLICKS_PER_THREAD {
                    let context = ClickContext::new(
                        Some(format!("https://ref/{}/{}", t, i)),
                        Some(format!("10.0.0.{}", t)),
                    );
                    registry.resolve("hot001", context).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = registry.stats("hot001").unwrap();
    let expected = (THREADS * CLICKS_PER_THREAD) as u64;
    assert_eq!(stats.total_clicks, expected);
    assert_eq!(stats.click_log.len() as u64, expected);

    // 日志顺序即完成顺序，时间戳单调不减
    assert!(
        stats
            .click_log
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    );
}

#[test]
fn test_stats_never_observes_torn_state() {
    let registry = Arc::new(new_registry());
    create_with_code(&registry, "https://example.com", "torn01");
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0;
                while !done.load(Ordering::Acquire) {
                    let stats = registry.stats("torn01").unwrap();
                    assert_eq!(stats.total_clicks, stats.click_log.len() as u64);
                    assert!(stats.total_clicks >= observed);
                    observed = stats.total_clicks;
                }
            })
        })
        .collect();

    let writers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    registry.resolve("torn01", ClickContext::default()).unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(registry.stats("torn01").unwrap().total_clicks, 2000);
}

#[test]
fn test_clicks_on_one_record_do_not_touch_another() {
    let registry = new_registry();
    create_with_code(&registry, "https://a.example", "recA01");
    create_with_code(&registry, "https://b.example", "recB01");

    for _ in 0..3 {
        registry.resolve("recA01", ClickContext::default()).unwrap();
    }

    assert_eq!(registry.stats("recA01").unwrap().total_clicks, 3);
    assert_eq!(registry.stats("recB01").unwrap().total_clicks, 0);
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_expiry_boundary_with_manual_clock() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let registry = new_registry().with_clock(clock.clone());

    let created = registry
        .create(CreateLink {
            url: "https://example.com".to_string(),
            validity_minutes: Some(1),
            shortcode: Some("ttl001".to_string()),
        })
        .unwrap();
    assert_eq!(created.expires_at, clock.now() + TimeDelta::minutes(1));

    clock.set(created.expires_at);
    assert_eq!(
        registry.resolve("ttl001", ClickContext::default()).unwrap(),
        "https://example.com"
    );

    clock.advance(TimeDelta::milliseconds(1));
    assert!(matches!(
        registry.resolve("ttl001", ClickContext::default()),
        Err(LinkpulseError::Expired(_))
    ));
}

#[test]
fn test_stats_survive_expiry() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let registry = new_registry().with_clock(clock.clone());
    create_with_code(&registry, "https://example.com", "old001");

    registry.resolve("old001", ClickContext::default()).unwrap();
    registry.resolve("old001", ClickContext::default()).unwrap();

    clock.advance(TimeDelta::days(1));
    assert!(registry.resolve("old001", ClickContext::default()).is_err());

    let stats = registry.stats("old001").unwrap();
    assert_eq!(stats.total_clicks, 2);
    assert_eq!(stats.click_log.len(), 2);
    assert_eq!(stats.original_url, "https://example.com");
}

#[test]
fn test_expired_code_cannot_be_recreated() {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let registry = new_registry().with_clock(clock.clone());
    create_with_code(&registry, "https://example.com", "gone01");

    clock.advance(TimeDelta::hours(2));
    let err = registry
        .create(CreateLink {
            url: "https://other.example".to_string(),
            validity_minutes: None,
            shortcode: Some("gone01".to_string()),
        })
        .unwrap_err();

    assert!(matches!(err, LinkpulseError::CodeConflict(_)));
}
