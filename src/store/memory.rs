use super::{CredentialKey, CredentialStore};
use anyhow::Result;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

/// In-process credential store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<CredentialKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no credential is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: CredentialKey) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(&key);
        Ok(())
    }

    fn set_all(&self, entries: &[(CredentialKey, &str)]) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            values.insert(*key, (*value).to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set(CredentialKey::AccessToken, "tok1").unwrap();
        assert_eq!(
            store.get(CredentialKey::AccessToken).unwrap().as_deref(),
            Some("tok1")
        );

        store.remove(CredentialKey::AccessToken).unwrap();
        assert!(store.get(CredentialKey::AccessToken).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let store = MemoryStore::new();
        for key in CredentialKey::ALL {
            store.set(key, "value").unwrap();
        }

        store.clear().unwrap();
        assert!(store.is_empty());
    }
}
