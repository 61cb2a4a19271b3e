//! Account list persisted as a single JSON array on disk.
//!
//! Reads load the whole file. Updates are serialized across processes with an
//! exclusive lock on a sibling `<file>.lock`, and land atomically: the new list
//! is written to `<file>.tmp`, synced, then renamed over the original, so a
//! reader never sees a half-written file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs4::fs_std::FileExt;
use tracing::{debug, warn};
use web_infra::Redacted;

use super::{Account, AccountStore, StoreError};

#[derive(Debug, Clone)]
pub struct JsonFileAccountStore {
    path: PathBuf,
}

impl JsonFileAccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || op(&path))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl AccountStore for JsonFileAccountStore {
    async fn get(&self, email: &str) -> Result<Account, StoreError> {
        let email = email.to_string();
        self.run_blocking(move |path| {
            read_accounts(path)?
                .into_iter()
                .find(|account| account.email == email)
                .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn update_beneficiary(
        &self,
        email: &str,
        beneficiary: &str,
    ) -> Result<Account, StoreError> {
        let email = email.to_string();
        let beneficiary = beneficiary.to_string();
        self.run_blocking(move |path| update_locked(path, &email, &beneficiary))
            .await
    }
}

fn read_accounts(path: &Path) -> Result<Vec<Account>, StoreError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn update_locked(path: &Path, email: &str, beneficiary: &str) -> Result<Account, StoreError> {
    let lock_path = sibling(path, ".lock");
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;

    FileExt::lock_exclusive(&lock_file)?;
    debug!(lock_path = %lock_path.display(), "account file lock acquired");

    let result = rewrite_beneficiary(path, email, beneficiary);

    if let Err(e) = FileExt::unlock(&lock_file) {
        // The lock is released when the handle closes regardless
        warn!(lock_path = %lock_path.display(), error = %e, "account file unlock failed");
    }

    result
}

fn rewrite_beneficiary(path: &Path, email: &str, beneficiary: &str) -> Result<Account, StoreError> {
    let mut accounts = read_accounts(path)?;

    let account = accounts
        .iter_mut()
        .find(|account| account.email == email)
        .ok_or(StoreError::NotFound)?;
    account.set_beneficiary(beneficiary);
    let updated = account.clone();

    write_atomically(path, &accounts)?;
    debug!(email = %Redacted(email), "beneficiary updated");

    Ok(updated)
}

fn write_atomically(path: &Path, accounts: &[Account]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(accounts)?;
    let tmp_path = sibling(path, ".tmp");

    let mut tmp = File::create(&tmp_path)?;
    tmp.write_all(&bytes)?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// `accounts.json` + `.lock` -> `accounts.json.lock`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
