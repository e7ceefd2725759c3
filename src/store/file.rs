//! Credential store backed by a JSON file.
//!
//! The file holds a flat object keyed by [`CredentialKey::as_str`]. Every write
//! replaces the file atomically (write to a sibling temp file, then rename) and
//! restricts it to the owner on Unix. A missing file is an empty store.

use super::{CredentialKey, CredentialStore};
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};
use tracing::debug;

type Entries = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("credential file {} is corrupt", self.path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to read credential file {}", self.path.display())),
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        if entries.is_empty() {
            return self.remove_file();
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let payload = serde_json::to_vec_pretty(entries).context("failed to encode credentials")?;
        let tmp = self.path.with_extension("tmp");

        let mut file = open_private(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        file.write_all(&payload)
            .and_then(|()| file.sync_all())
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        drop(file);

        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), "credential file updated");

        Ok(())
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential file removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("failed to remove {}", self.path.display())),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Entries)) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_entries()?.remove(key.as_str()))
    }

    fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn remove(&self, key: CredentialKey) -> Result<()> {
        self.update(|entries| {
            entries.remove(key.as_str());
        })
    }

    fn set_all(&self, values: &[(CredentialKey, &str)]) -> Result<()> {
        self.update(|entries| {
            for (key, value) in values {
                entries.insert(key.as_str().to_string(), (*value).to_string());
            }
        })
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.remove_file()
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
