//! Integration tests for the concurrent observe / finalize / lookup flow.

use std::sync::Arc;
use std::thread;

use wordvault::{CacheConfig, VocabCache, WordEntity, WordvaultError};

fn fresh_cache() -> VocabCache {
    VocabCache::new(CacheConfig::default()).unwrap()
}

#[test]
fn test_fresh_cache_resolves_everything_to_sentinel() {
    let cache = fresh_cache();

    assert_eq!(cache.word_at(0).as_deref(), Some("UNK"));
    assert_eq!(cache.size(), 0);
    assert_eq!(cache.resolve("cat").word(), "UNK");
    assert_eq!(cache.resolve("dog").word(), "UNK");
}

#[test]
fn test_word_frequencies_accumulate() {
    let cache = fresh_cache();
    cache.observe("cat").unwrap();
    cache.observe("cat").unwrap();
    cache.observe("cat").unwrap();
    cache.observe("dog").unwrap();

    assert_eq!(cache.word_frequency("cat"), 3);
    assert_eq!(cache.word_frequency("dog"), 1);
    assert_eq!(cache.word_frequency("fox"), 0);
    assert_eq!(cache.total_word_occurrences(), 4);
}

#[test]
fn test_observe_by_applies_amount() {
    let cache = fresh_cache();
    cache.observe_by("cat", 10).unwrap();
    cache.observe_by("cat", 5).unwrap();

    assert_eq!(cache.word_frequency("cat"), 15);
    assert_eq!(cache.total_word_occurrences(), 15);
    assert_eq!(cache.token_for("cat").unwrap().count(), 15);
}

#[test]
fn test_concurrent_observation_is_sum_correct() {
    let cache = Arc::new(fresh_cache());
    let words = ["cat", "dog", "fox", "owl"];

    let mut handles = Vec::new();
    for worker in 0..8 {
        let cache = cache.clone();
        handles.push(thread::spawn(move || {
            for i in 0..1_000 {
                let word = words[(worker + i) % words.len()];
                cache.observe(word).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let total: u64 = words.iter().map(|w| cache.word_frequency(w)).sum();
    assert_eq!(total, 8_000);
    assert_eq!(cache.total_word_occurrences(), 8_000);

    // entity-local counters agree with the frequency table
    for word in words {
        assert_eq!(
            cache.token_for(word).unwrap().count(),
            cache.word_frequency(word)
        );
    }
}

#[test]
fn test_promote_requires_registration() {
    let cache = fresh_cache();

    let err = cache.finalizer().promote("cat").unwrap_err();
    assert!(matches!(err, WordvaultError::NotRegistered(_)));

    cache.observe("cat").unwrap();
    let index = cache.finalizer().promote("cat").unwrap();
    assert!(index >= 1);
    assert_eq!(cache.size(), 1);
}

#[test]
fn test_promotion_bijection_roundtrip() {
    let cache = fresh_cache();
    for word in ["cat", "dog", "fox"] {
        cache.observe(word).unwrap();
    }

    {
        let finalizer = cache.finalizer();
        for word in ["cat", "dog", "fox"] {
            finalizer.promote(word).unwrap();
        }
    }

    for word in ["cat", "dog", "fox"] {
        let index = cache.index_of(word).unwrap();
        assert_eq!(cache.word_at(index).as_deref(), Some(word));
        assert_eq!(cache.resolve(word).word(), word);
    }
    assert_eq!(cache.size(), 3);
}

#[test]
fn test_repeated_promote_counts_once() {
    let cache = fresh_cache();
    cache.observe("cat").unwrap();

    let finalizer = cache.finalizer();
    for _ in 0..5 {
        finalizer.promote("cat").unwrap();
    }
    drop(finalizer);

    assert_eq!(cache.size(), 1);
    let words = cache.words();
    assert_eq!(words.iter().filter(|w| w.as_str() == "cat").count(), 1);
}

#[test]
fn test_reads_concurrent_with_finalization() {
    let cache = Arc::new(fresh_cache());
    for i in 0..100 {
        cache.observe(&format!("word{i}")).unwrap();
    }

    let reader = {
        let cache = cache.clone();
        thread::spawn(move || {
            // unpromoted words resolve to the sentinel, promoted ones to
            // themselves; either way resolve never comes back absent
            for _ in 0..10 {
                for i in 0..100 {
                    let word = format!("word{i}");
                    let entity = cache.resolve(&word);
                    assert!(entity.word() == word || entity.word() == "UNK");
                }
            }
        })
    };

    {
        let finalizer = cache.finalizer();
        for i in 0..100 {
            finalizer.promote(&format!("word{i}")).unwrap();
        }
    }
    reader.join().unwrap();

    assert_eq!(cache.size(), 100);
}

#[test]
fn test_document_statistics() {
    let cache = fresh_cache();
    cache.increment_document_frequency("cat", 1).unwrap();
    cache.increment_document_frequency("cat", 2).unwrap();
    assert_eq!(cache.document_frequency("cat"), 3);
    assert_eq!(cache.document_frequency("dog"), 0);

    // bulk-load escape hatch overwrites history
    cache.set_document_frequency("cat", 7).unwrap();
    assert_eq!(cache.document_frequency("cat"), 7);

    assert_eq!(cache.increment_document_count(), 1);
    assert_eq!(cache.increment_document_count_by(4), 5);
    assert_eq!(cache.total_documents(), 5);
}

#[test]
fn test_empty_words_rejected_everywhere() {
    let cache = fresh_cache();

    assert!(cache.observe("").unwrap_err().is_invalid_input());
    assert!(cache
        .increment_document_frequency("", 1)
        .unwrap_err()
        .is_invalid_input());
    assert!(cache
        .set_document_frequency("", 1)
        .unwrap_err()
        .is_invalid_input());
    assert!(cache.finalizer().promote("").unwrap_err().is_invalid_input());
}

#[test]
fn test_registered_entity_survives_promotion() {
    let cache = fresh_cache();
    cache.register(WordEntity::with_count("dog", 42)).unwrap();

    let index = cache.finalizer().promote("dog").unwrap();
    let entity = cache.resolve("dog");

    assert_eq!(entity.word(), "dog");
    assert_eq!(entity.count(), 42);
    assert_eq!(entity.index(), Some(index));
}

#[test]
fn test_tokens_and_vocab_views_diverge_until_promotion() {
    let cache = fresh_cache();
    cache.observe("cat").unwrap();
    cache.observe("dog").unwrap();

    // sentinel plus the two observed tokens
    assert_eq!(cache.token_count(), 3);
    assert_eq!(cache.size(), 0);

    cache.finalizer().promote("cat").unwrap();
    assert_eq!(cache.size(), 1);
    assert!(cache.contains_word("cat"));
    assert!(!cache.contains_word("dog"));

    let promoted: Vec<String> = cache
        .vocab_entities()
        .iter()
        .map(|e| e.word().to_owned())
        .collect();
    assert!(promoted.contains(&"cat".to_string()));
    assert!(!promoted.contains(&"dog".to_string()));
}

#[test]
fn test_metrics_track_cache_activity() {
    let cache = fresh_cache();
    cache.observe_by("cat", 3).unwrap();
    cache.observe("dog").unwrap();
    cache.finalizer().promote("cat").unwrap();

    let metrics = cache.metrics();
    assert_eq!(metrics.words_observed.get() as u64, 4);
    assert_eq!(metrics.words_promoted.get() as u64, 1);
    assert_eq!(metrics.vocabulary_size.get() as u64, 1);
}
