//! Bounded in-memory similarity cache over embedded questions.
//!
//! Entries are keyed by the literal query string; re-inserting the same
//! query overwrites the previous entry (last-write-wins). When the number
//! of distinct keys exceeds the configured capacity, the oldest entries
//! are evicted until the count equals the capacity exactly.
//!
//! The cache is an aid, never a blocker: all operations are infallible
//! from the caller's point of view. Internal problems (e.g. a poisoned
//! lock from a panicked holder) are logged and recovered from; `lookup`
//! degrades to an empty result set and `insert` stays best-effort.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::embedding::{cosine_similarity, embed};

/// Default maximum number of distinct cached questions.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Maximum number of hits one lookup returns.
const MAX_MATCHES: usize = 5;

/// Immutable cached record for one question.
#[derive(Debug, Clone)]
struct CacheEntry {
    embedding: Vec<f32>,
    category: String,
    created_at: DateTime<Utc>,
    /// Monotonic insertion counter; breaks `created_at` ties on eviction.
    seq: u64,
}

/// One nearest-neighbor hit returned by [`SimilarityCache::lookup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMatch {
    /// The cached question text.
    pub query: String,
    /// Cosine similarity against the lookup query, in (threshold, 1].
    pub similarity: f32,
    /// Category the cached question was filed under.
    pub category: String,
    /// When the cached entry was created.
    pub timestamp: DateTime<Utc>,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    next_seq: u64,
}

/// Capacity-bounded similarity cache.
///
/// Construct one instance at the composition root and share it by
/// reference; interior mutability is handled by a single lock around the
/// whole read-modify-write sequence. The lock is never held across an
/// `await` point — every operation here is synchronous and bounded by a
/// linear scan over at most `capacity` entries.
pub struct SimilarityCache {
    capacity: usize,
    inner: Mutex<CacheState>,
}

impl SimilarityCache {
    /// Creates an empty cache holding at most `capacity` distinct queries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Finds cached questions similar to `query`.
    ///
    /// Embeds the query, scores every stored entry by cosine similarity,
    /// keeps entries **strictly greater** than `threshold`, and returns at
    /// most the top 5, best first. Empty cache or no qualifying entry
    /// yields an empty list; so does any internal failure.
    pub fn lookup(&self, query: &str, threshold: f32) -> Vec<SimilarMatch> {
        let needle = embed(query);
        let state = self.lock();

        let mut hits: Vec<SimilarMatch> = state
            .entries
            .iter()
            .filter_map(|(cached_query, entry)| {
                let similarity = cosine_similarity(&needle, &entry.embedding);
                (similarity > threshold).then(|| SimilarMatch {
                    query: cached_query.clone(),
                    similarity,
                    category: entry.category.clone(),
                    timestamp: entry.created_at,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(MAX_MATCHES);
        hits
    }

    /// Stores `query` with its embedding and category.
    ///
    /// Re-inserting an identical query string overwrites the earlier
    /// entry (embedding, category, timestamp). If the insert pushes the
    /// key count past capacity, the oldest entries are evicted until the
    /// count equals the capacity exactly.
    pub fn insert(&self, query: &str, category: &str) {
        let embedding = embed(query);
        let mut state = self.lock();

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            query.to_string(),
            CacheEntry {
                embedding,
                category: category.to_string(),
                created_at: Utc::now(),
                seq,
            },
        );

        if state.entries.len() > self.capacity {
            let excess = state.entries.len() - self.capacity;
            let mut order: Vec<(String, DateTime<Utc>, u64)> = state
                .entries
                .iter()
                .map(|(k, e)| (k.clone(), e.created_at, e.seq))
                .collect();
            order.sort_by_key(|(_, created_at, seq)| (*created_at, *seq));
            for (key, _, _) in order.into_iter().take(excess) {
                state.entries.remove(&key);
            }
            debug!(evicted = excess, len = state.entries.len(), "cache evicted oldest entries");
        }
    }

    /// Number of distinct cached queries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquires the cache lock, recovering from poisoning.
    ///
    /// A poisoned lock means a previous holder panicked mid-update; the
    /// map itself is still structurally sound, so we log and continue
    /// rather than letting cache trouble block answer generation.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            warn!("similarity cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
