//! Registry of API keys accepted on key-gated routes.

use std::collections::HashMap;

/// Map from opaque API key to the subject identifier it authenticates as.
///
/// Built once from configuration and shared read-only through application state.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyRegistry {
    keys: HashMap<String, String>,
}

impl ApiKeyRegistry {
    pub fn new(keys: HashMap<String, String>) -> Self {
        Self { keys }
    }

    /// Looks up the subject registered for `key`.
    ///
    /// # Arguments
    /// - `key` - Value of the `Api-Key` header
    ///
    /// # Returns
    /// - `Some(&str)` - Subject identifier registered for the key
    /// - `None` - Key is empty or not registered
    pub fn lookup(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.keys.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<(String, String)> for ApiKeyRegistry {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
