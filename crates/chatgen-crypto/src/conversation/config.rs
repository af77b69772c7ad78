//! Cipher configuration

use super::error::CipherError;

/// Application-wide PBKDF2 salt shared by every conversation.
pub const DEFAULT_SALT: &[u8] = b"chat-app-salt";

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest iteration count accepted by [`CipherConfig::new`].
pub const MIN_ITERATIONS: u32 = 100_000;

/// Default number of participant pairs whose keys are kept in memory.
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 256;

/// Key derivation parameters for a [`crate::ConversationCipher`].
///
/// Salt and iteration count must be identical on every client for two
/// participants to arrive at the same key. They are not per-pair and not
/// random.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherConfig {
    salt: Vec<u8>,
    iterations: u32,
    cache_keys: bool,
    key_cache_capacity: usize,
}

impl CipherConfig {
    /// Build a config with an explicit salt and iteration count.
    ///
    /// # Errors
    ///
    /// - `Config` if the salt is empty or `iterations < MIN_ITERATIONS`
    pub fn new(salt: impl Into<Vec<u8>>, iterations: u32) -> Result<Self, CipherError> {
        let salt = salt.into();

        if salt.is_empty() {
            return Err(CipherError::Config { reason: "salt must not be empty".to_string() });
        }

        if iterations < MIN_ITERATIONS {
            return Err(CipherError::Config {
                reason: format!("iterations {iterations} below minimum {MIN_ITERATIONS}"),
            });
        }

        Ok(Self { salt, iterations, ..Self::default() })
    }

    /// Enable or disable the in-memory per-pair key cache.
    #[must_use]
    pub fn with_key_cache(mut self, enabled: bool) -> Self {
        self.cache_keys = enabled;
        self
    }

    /// Bound the key cache to `capacity` pairs.
    ///
    /// A full cache is emptied before the next key is inserted. A capacity of
    /// zero disables caching.
    #[must_use]
    pub fn with_key_cache_capacity(mut self, capacity: usize) -> Self {
        self.key_cache_capacity = capacity;
        self
    }

    /// PBKDF2 salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether derived keys are cached per canonical pair.
    pub fn cache_keys(&self) -> bool {
        self.cache_keys && self.key_cache_capacity > 0
    }

    /// Most participant pairs kept in the key cache.
    pub fn key_cache_capacity(&self) -> usize {
        self.key_cache_capacity
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            cache_keys: true,
            key_cache_capacity: DEFAULT_KEY_CACHE_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_deployed_constants() {
        let config = CipherConfig::default();
        assert_eq!(config.salt(), b"chat-app-salt");
        assert_eq!(config.iterations(), 100_000);
        assert!(config.cache_keys());
        assert_eq!(config.key_cache_capacity(), DEFAULT_KEY_CACHE_CAPACITY);
    }

    #[test]
    fn rejects_low_iteration_count() {
        let result = CipherConfig::new("salt", MIN_ITERATIONS - 1);
        assert!(matches!(result, Err(CipherError::Config { .. })));
    }

    #[test]
    fn rejects_empty_salt() {
        let result = CipherConfig::new(Vec::new(), DEFAULT_ITERATIONS);
        assert!(matches!(result, Err(CipherError::Config { reason }) if reason.contains("salt")));
    }

    #[test]
    fn accepts_rotated_salt() {
        let config = CipherConfig::new("chat-app-salt-v2", 200_000).unwrap();
        assert_eq!(config.salt(), b"chat-app-salt-v2");
        assert_eq!(config.iterations(), 200_000);
    }

    #[test]
    fn key_cache_can_be_disabled() {
        let config = CipherConfig::default().with_key_cache(false);
        assert!(!config.cache_keys());
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let config = CipherConfig::default().with_key_cache_capacity(0);
        assert!(!config.cache_keys());
    }
}
