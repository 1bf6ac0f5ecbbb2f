//! In-memory secret store served by the lookup server.
//!
//! # Guarantees
//!
//! - **Built once**: the loader produces the store before the server starts
//! - **Read-only**: there is no API to insert or remove entries afterwards
//! - **No value leaks**: `Debug` output lists key names only

use std::collections::HashMap;
use std::fmt;

/// Flat mapping of secret name to secret value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretStore {
    secrets: HashMap<String, String>,
}

impl SecretStore {
    /// Create a store from an already-built mapping.
    pub fn new(secrets: HashMap<String, String>) -> Self {
        Self { secrets }
    }

    /// Create a store with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a secret value by key.
    ///
    /// # Returns
    ///
    /// - `Some(&str)` - The secret value if the key exists
    /// - `None` - If the key doesn't exist
    pub fn get(&self, key: &str) -> Option<&str> {
        self.secrets.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.secrets.contains_key(key)
    }

    /// Key names in sorted order, suitable for logging.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.secrets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl FromIterator<(String, String)> for SecretStore {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            secrets: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("keys", &self.keys())
            .finish()
    }
}
