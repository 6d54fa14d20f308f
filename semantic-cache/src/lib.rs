//! Deterministic text embeddings and a bounded similarity cache.
//!
//! The embedder is a pure, hash-based bag-of-words scheme: no learned
//! weights, no I/O, same vector for the same text every time. On top of
//! it, [`SimilarityCache`] keeps a capacity-bounded map of previously
//! seen questions and answers nearest-neighbor lookups by cosine
//! similarity.
//!
//! The cache is a performance/fallback aid, not a system of record: it is
//! process-local, rebuilds from empty on restart, and swallows internal
//! failures rather than propagating them to answer generation.

pub mod cache;
pub mod embedding;

pub use cache::{DEFAULT_CAPACITY, SimilarMatch, SimilarityCache};
pub use embedding::{EMBEDDING_DIM, cosine_similarity, embed};
