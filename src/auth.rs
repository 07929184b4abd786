//! Client authorization
//!
//! Conversion clients are provisioned through configuration: every
//! environment entry whose name ends in `_API_KEY` becomes one row of the
//! client key table, with the prefix as the client id and the value as the
//! key. The table is built once at startup and never mutated afterwards;
//! authorizing a request is an exact, case-sensitive lookup against that
//! snapshot.

use std::collections::HashMap;

/// Suffix that marks a configuration entry as a client API key.
pub const API_KEY_SUFFIX: &str = "_API_KEY";

/// Read-only mapping from client id to API key.
#[derive(Debug, Clone, Default)]
pub struct ClientKeyTable {
    keys: HashMap<String, String>,
}

impl ClientKeyTable {
    /// Build the table from the current process environment. `.env` entries
    /// participate when they were loaded into the environment first.
    pub fn from_env() -> Self {
        Self::from_entries(std::env::vars())
    }

    /// Build the table from arbitrary `(name, value)` configuration entries.
    /// Entries whose name does not carry the key suffix are ignored.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let keys = entries
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_suffix(API_KEY_SUFFIX)
                    .map(|client| (client.to_string(), value))
            })
            .collect();
        Self { keys }
    }

    /// True only when `client` is provisioned and `key` matches its stored
    /// API key exactly.
    pub fn authorize(&self, client: &str, key: &str) -> bool {
        self.keys.get(client).is_some_and(|expected| expected == key)
    }

    /// Number of provisioned clients.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no client is provisioned at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ClientKeyTable {
        ClientKeyTable::from_entries([
            ("ACME_API_KEY".to_string(), "s3cret".to_string()),
            ("NADIR_API_KEY".to_string(), "hunter2".to_string()),
            ("SERVER_PORT".to_string(), "3000".to_string()),
        ])
    }

    #[test]
    fn only_suffixed_entries_become_clients() {
        let table = table();
        assert_eq!(table.len(), 2);
        assert!(!table.authorize("SERVER_PORT", "3000"));
        assert!(!table.authorize("SERVER", "3000"));
    }

    #[test]
    fn matching_credentials_authorize() {
        let table = table();
        assert!(table.authorize("ACME", "s3cret"));
        assert!(table.authorize("NADIR", "hunter2"));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let table = table();
        assert!(!table.authorize("ACME", "hunter2"));
        assert!(!table.authorize("ACME", ""));
    }

    #[test]
    fn unknown_client_is_rejected() {
        assert!(!table().authorize("GHOST", "s3cret"));
        assert!(!table().authorize("", ""));
    }

    #[test]
    fn lookups_are_case_sensitive() {
        let table = table();
        assert!(!table.authorize("acme", "s3cret"));
        assert!(!table.authorize("ACME", "S3CRET"));
    }

    #[test]
    fn entry_named_exactly_the_suffix_maps_to_the_empty_client() {
        let table =
            ClientKeyTable::from_entries([("_API_KEY".to_string(), "anon".to_string())]);
        assert!(table.authorize("", "anon"));
    }

    #[test]
    fn empty_table_rejects_everything() {
        let table = ClientKeyTable::from_entries(Vec::<(String, String)>::new());
        assert!(table.is_empty());
        assert!(!table.authorize("ACME", "s3cret"));
    }
}
