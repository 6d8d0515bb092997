use heedless_core::{KeyValueStore, StorageError};

use crate::utils::dom;

/// `localStorage` backend for the catalog cache.
///
/// Storage is looked up on every call, so a store that becomes unavailable
/// mid-session degrades to misses and failed writes instead of panicking.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        dom::local_storage()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed {
                key: key.to_string(),
            })
    }
}
