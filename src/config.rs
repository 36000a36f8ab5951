use serde::{Deserialize, Serialize};

/// Token reserved at index 0 for out-of-vocabulary lookups.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "UNK";

/// Cache configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Word stored for the unknown sentinel entity at index 0
    pub unknown_token: String,
    /// Capacity hint for the token and frequency maps
    pub expected_words: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            unknown_token: DEFAULT_UNKNOWN_TOKEN.to_string(),
            expected_words: 10_000,
        }
    }
}

impl CacheConfig {
    /// Override the sentinel token
    pub fn with_unknown_token(mut self, token: impl Into<String>) -> Self {
        self.unknown_token = token.into();
        self
    }

    /// Set the capacity hint for the internal maps
    pub fn with_expected_words(mut self, expected: usize) -> Self {
        self.expected_words = expected;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.unknown_token, "UNK");
        assert!(config.expected_words > 0);
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::default()
            .with_unknown_token("<unk>")
            .with_expected_words(500);
        assert_eq!(config.unknown_token, "<unk>");
        assert_eq!(config.expected_words, 500);
    }
}
