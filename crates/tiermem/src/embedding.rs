//! Embedding capability for long-term memory
//!
//! The embedding function is an external collaborator: the core only assumes
//! a deterministic `text -> fixed-length vector` capability with a known
//! dimensionality, supplied at construction.

use crate::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};

/// A dense float vector produced by an embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// The vector values
    pub vector: Vec<f32>,

    /// Dimensionality of the vector
    pub dimensions: usize,

    /// Model that produced the embedding
    pub model: String,
}

impl Embedding {
    /// Create a new embedding
    pub fn new(vector: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            dimensions,
            model: model.into(),
        }
    }

    /// Cosine similarity with another embedding of the same dimensionality
    pub fn cosine_similarity(&self, other: &Embedding) -> MemoryResult<f32> {
        if self.dimensions != other.dimensions {
            return Err(MemoryError::dimensions(self.dimensions, other.dimensions));
        }

        Ok(cosine_similarity(&self.vector, &other.vector))
    }
}

/// Cosine similarity between two raw vectors
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs; the zero vector is
/// similar to nothing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Trait for embedding generation backends
///
/// Implementations must be deterministic for identical input within a model
/// version, and must produce vectors of exactly `dimensions()` length.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for the given text
    async fn embed(&self, text: &str) -> MemoryResult<Embedding>;

    /// Model identifier
    fn model_name(&self) -> &str;

    /// Dimensionality of produced embeddings
    fn dimensions(&self) -> usize;
}

/// Deterministic hash-based embedding provider (for tests and demos only)
///
/// Hashes the text with per-dimension seeds. Identical text always maps to the
/// same vector, so exact-text recall round-trips, but there is no real
/// semantic structure.
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Create a hash-based provider with the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_embed(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0; self.dimensions];

        for (i, slot) in vector.iter_mut().enumerate() {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);

            let hash = hasher.finish();
            // Normalize to [-1, 1]
            *slot = ((hash as f32) / (u64::MAX as f32)) * 2.0 - 1.0;
        }

        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> MemoryResult<Embedding> {
        Ok(Embedding::new(self.hash_embed(text), self.model_name()))
    }

    fn model_name(&self) -> &str {
        "hash-embedding"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
