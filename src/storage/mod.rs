mod error;

pub use error::StorageError;

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::UserId;

use crate::services::user::UserRecord;

/// In-memory session table with best-effort file durability.
///
/// The map is the authority: a failed `persist` degrades durability but never
/// rolls back memory, and the next successful flush wins. Records are stored
/// on disk as a flat JSON array keyed by the record's own `id`.
#[derive(Clone)]
pub struct SessionRepository {
    records: Arc<DashMap<UserId, UserRecord>>,
    path: PathBuf,
}

impl SessionRepository {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let records = DashMap::new();

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let stored: Vec<UserRecord> = serde_json::from_slice(&bytes)?;
                for record in stored {
                    records.insert(record.id, record);
                }
                info!("Loaded {} user records from {}", records.len(), path.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No session file at {}, starting empty", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            records: Arc::new(records),
            path,
        })
    }

    pub fn get(&self, id: UserId) -> Option<UserRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// Returns the stored record, creating a fresh one on first contact.
    /// The boolean reports whether a record was created by this call.
    pub fn get_or_create(
        &self,
        id: UserId,
        first_name: &str,
        username: Option<&str>,
    ) -> (UserRecord, bool) {
        let mut created = false;
        let record = self
            .records
            .entry(id)
            .or_insert_with(|| {
                created = true;
                UserRecord::new(id, first_name, username)
            })
            .clone();

        if created {
            info!("New user initialized: {} ({})", id, username.unwrap_or("no username"));
        }

        (record, created)
    }

    /// Runs `f` under the record's entry lock. This is the per-user critical
    /// section: `f` must stay synchronous and must not block.
    pub fn update<R>(&self, id: UserId, f: impl FnOnce(&mut UserRecord) -> R) -> Option<R> {
        self.records.get_mut(&id).map(|mut r| f(r.value_mut()))
    }

    /// Snapshot for the scheduler sweeps. Each record is cloned under its own
    /// entry lock, so a concurrent update is either fully visible or not at
    /// all; the scan never sees a half-written record.
    pub fn scan(&self) -> Vec<UserRecord> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    pub fn user_ids(&self) -> Vec<UserId> {
        self.records.iter().map(|r| *r.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub async fn persist(&self) -> Result<(), StorageError> {
        let snapshot = self.scan();
        let json = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }
        tokio::fs::write(&self.path, json).await?;

        debug!("Persisted {} user records to {}", snapshot.len(), self.path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::STARTING_COINS;

    fn repo_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("sessions.json")
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SessionRepository::load(repo_path(&dir)).await.unwrap();
        assert_eq!(repo.len(), 0);
    }

    #[tokio::test]
    async fn test_get_or_create_grants_starting_coins_once() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SessionRepository::load(repo_path(&dir)).await.unwrap();

        let (record, created) = repo.get_or_create(UserId(7), "Olena", Some("olena"));
        assert!(created);
        assert_eq!(record.coins, STARTING_COINS);

        repo.update(UserId(7), |u| u.credit(10));

        let (record, created) = repo.get_or_create(UserId(7), "Olena", Some("olena"));
        assert!(!created);
        assert_eq!(record.coins, STARTING_COINS + 10);
    }

    #[tokio::test]
    async fn test_persist_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);

        let repo = SessionRepository::load(&path).await.unwrap();
        repo.get_or_create(UserId(1), "A", None);
        repo.get_or_create(UserId(2), "B", Some("b"));
        repo.update(UserId(2), |u| u.credit(42));
        repo.persist().await.unwrap();

        let reloaded = SessionRepository::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(UserId(2)).unwrap().coins, STARTING_COINS + 42);
        assert_eq!(reloaded.get(UserId(2)).unwrap().username.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_update_missing_user_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SessionRepository::load(repo_path(&dir)).await.unwrap();
        assert!(repo.update(UserId(99), |u| u.credit(1)).is_none());
    }
}
