//! Memory subsystem configuration

/// Default time-to-live for short-term entries, in minutes
pub const DEFAULT_STM_TTL_MINUTES: i64 = 30;

/// Default long-term memory collection name
pub const DEFAULT_COLLECTION_NAME: &str = "long_term_memory";

/// Default embedding model identifier
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Default embedding dimensionality (matches the default model)
pub const DEFAULT_VECTOR_SIZE: usize = 384;

/// Configuration for the two-tier memory system
///
/// Covers the short-term TTL and the parameters of the long-term collection.
/// There is no other environment coupling; the embedding provider and vector
/// store are injected separately at construction.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Time-to-live for short-term entries, in minutes
    pub stm_ttl_minutes: i64,

    /// Name of the long-term memory collection
    pub collection_name: String,

    /// Embedding model identifier (informational; the provider is injected)
    pub embedding_model: String,

    /// Dimensionality of the embedding vectors
    pub vector_size: usize,

    /// Vector store host (used by the qdrant backend)
    pub backend_host: String,

    /// Vector store port (qdrant gRPC)
    pub backend_port: u16,
}

impl MemoryConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the short-term TTL in minutes
    pub fn with_stm_ttl_minutes(mut self, minutes: i64) -> Self {
        self.stm_ttl_minutes = minutes;
        self
    }

    /// Set the long-term collection name
    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Set the embedding model identifier
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the embedding dimensionality
    pub fn with_vector_size(mut self, size: usize) -> Self {
        self.vector_size = size;
        self
    }

    /// Set the vector store host and port
    pub fn with_backend(mut self, host: impl Into<String>, port: u16) -> Self {
        self.backend_host = host.into();
        self.backend_port = port;
        self
    }

    /// URL of the vector store backend
    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.backend_host, self.backend_port)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            stm_ttl_minutes: DEFAULT_STM_TTL_MINUTES,
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vector_size: DEFAULT_VECTOR_SIZE,
            backend_host: "localhost".to_string(),
            backend_port: 6334,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MemoryConfig::default();
        assert_eq!(config.stm_ttl_minutes, 30);
        assert_eq!(config.collection_name, "long_term_memory");
        assert_eq!(config.vector_size, 384);
    }

    #[test]
    fn test_config_builder() {
        let config = MemoryConfig::new()
            .with_stm_ttl_minutes(5)
            .with_collection_name("agent_memory")
            .with_vector_size(768)
            .with_backend("qdrant.internal", 7000);

        assert_eq!(config.stm_ttl_minutes, 5);
        assert_eq!(config.collection_name, "agent_memory");
        assert_eq!(config.vector_size, 768);
        assert_eq!(config.backend_url(), "http://qdrant.internal:7000");
    }
}
