//! Deterministic hash-based bag-of-words embeddings.
//!
//! Each token is mapped to a bucket by a stable hash (SHA-256 prefix), so
//! the same text yields the same vector across calls and processes. The
//! result is L2-normalized, which makes cosine similarity a plain dot
//! product for non-degenerate inputs.

use sha2::{Digest, Sha256};

/// Fixed dimensionality of every embedding vector.
pub const EMBEDDING_DIM: usize = 100;

/// Embeds free text into a fixed-length vector.
///
/// Lowercases, tokenizes on whitespace, counts tokens per hash bucket,
/// then L2-normalizes. Inputs with zero tokens return the zero vector
/// unnormalized. Never fails.
///
/// # Examples
///
/// ```
/// use semantic_cache::{EMBEDDING_DIM, embed};
///
/// let v = embed("printer is offline");
/// assert_eq!(v.len(), EMBEDDING_DIM);
///
/// let zero = embed("   ");
/// assert!(zero.iter().all(|&x| x == 0.0));
/// ```
pub fn embed(text: &str) -> Vec<f32> {
    let mut counts = vec![0.0f32; EMBEDDING_DIM];
    let mut tokens = 0usize;

    for token in text.to_lowercase().split_whitespace() {
        counts[token_bucket(token)] += 1.0;
        tokens += 1;
    }
    if tokens == 0 {
        return counts;
    }

    let norm = counts.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in counts.iter_mut() {
            *v /= norm;
        }
    }
    counts
}

/// Maps a token to its embedding bucket via a stable hash.
fn token_bucket(token: &str) -> usize {
    let digest = Sha256::digest(token.as_bytes());
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(raw) % EMBEDDING_DIM as u64) as usize
}

/// Cosine similarity of two vectors.
///
/// Defined as `0.0` when either operand has zero norm, so degenerate
/// (empty-text) embeddings never rank as similar to anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
