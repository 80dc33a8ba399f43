use std::collections::HashMap;

use async_trait::async_trait;
use contracts::domain::a001_waitlist_entry::aggregate::{NewWaitlistEntry, WaitlistEntry};
use thiserror::Error;
use tokio::sync::RwLock;

/// Ошибки хранилища листа ожидания
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage-level uniqueness guard on `email` fired
    #[error("an entry with email {0} already exists")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Хранилище записей листа ожидания
///
/// Бизнес-дедупликация здесь не выполняется: сервис сначала вызывает
/// `find_entry_by_email`. Уникальность `email` на уровне хранилища только
/// последний рубеж для гонки двух одновременных запросов.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Количество сохранённых записей
    async fn count_entries(&self) -> Result<u64, StorageError>;

    /// Точный поиск по (нормализованному) email; `None`, если записи нет
    async fn find_entry_by_email(&self, email: &str)
        -> Result<Option<WaitlistEntry>, StorageError>;

    /// Сохранить новую запись и вернуть её с присвоенным ID
    async fn create_entry(&self, data: NewWaitlistEntry) -> Result<WaitlistEntry, StorageError>;
}

/// In-process store keyed by email. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryWaitlistStore {
    entries: RwLock<HashMap<String, WaitlistEntry>>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn count_entries(&self) -> Result<u64, StorageError> {
        Ok(self.entries.read().await.len() as u64)
    }

    async fn find_entry_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WaitlistEntry>, StorageError> {
        Ok(self.entries.read().await.get(email).cloned())
    }

    async fn create_entry(&self, data: NewWaitlistEntry) -> Result<WaitlistEntry, StorageError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&data.email) {
            return Err(StorageError::UniqueViolation(data.email));
        }

        let entry = WaitlistEntry::new_for_insert(data);
        entries.insert(entry.email.clone(), entry.clone());
        Ok(entry)
    }
}
