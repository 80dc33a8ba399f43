use std::sync::Arc;

use contracts::domain::a001_waitlist_entry::aggregate::WaitlistEntry;
use contracts::domain::a001_waitlist_entry::validator;
use contracts::shared::validation::ValidationError;
use serde_json::Value;
use thiserror::Error;

use super::store::{StorageError, WaitlistStore};

/// Исходы записи в лист ожидания, кроме успешного
#[derive(Debug, Error)]
pub enum JoinError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} is already on the waitlist")]
    DuplicateEmail(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Сервис листа ожидания: валидация, проверка дубликата, сохранение
#[derive(Clone)]
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self { store }
    }

    /// Количество записей в листе ожидания
    pub async fn count(&self) -> Result<u64, StorageError> {
        self.store.count_entries().await
    }

    /// Записать в лист ожидания
    ///
    /// Проверка по email до вставки нужна ради понятного сообщения; гонку
    /// двух одновременных запросов закрывает уникальный индекс хранилища,
    /// и такая ошибка тоже возвращается как `DuplicateEmail`.
    pub async fn join(&self, raw: &Value) -> Result<WaitlistEntry, JoinError> {
        let data = validator::validate_join_request(raw)?;

        if self.store.find_entry_by_email(&data.email).await?.is_some() {
            tracing::info!(email = %data.email, "Waitlist signup rejected: duplicate email");
            return Err(JoinError::DuplicateEmail(data.email));
        }

        match self.store.create_entry(data).await {
            Ok(entry) => {
                tracing::info!(id = %entry.to_string_id(), "Waitlist entry created");
                Ok(entry)
            }
            Err(StorageError::UniqueViolation(email)) => {
                tracing::info!(email = %email, "Waitlist signup lost insert race: duplicate email");
                Err(JoinError::DuplicateEmail(email))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::a001_waitlist_entry::store::InMemoryWaitlistStore;
    use async_trait::async_trait;
    use contracts::domain::a001_waitlist_entry::aggregate::NewWaitlistEntry;
    use serde_json::json;

    /// Store whose every call fails, as if the database were unreachable
    pub(crate) struct FailingStore;

    #[async_trait]
    impl WaitlistStore for FailingStore {
        async fn count_entries(&self) -> Result<u64, StorageError> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn find_entry_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<WaitlistEntry>, StorageError> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn create_entry(
            &self,
            _data: NewWaitlistEntry,
        ) -> Result<WaitlistEntry, StorageError> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    /// Lookup never sees the existing row, so only the storage guard can
    /// catch the duplicate; mimics two requests racing past the check.
    struct RacingStore {
        inner: InMemoryWaitlistStore,
    }

    #[async_trait]
    impl WaitlistStore for RacingStore {
        async fn count_entries(&self) -> Result<u64, StorageError> {
            self.inner.count_entries().await
        }

        async fn find_entry_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<WaitlistEntry>, StorageError> {
            Ok(None)
        }

        async fn create_entry(
            &self,
            data: NewWaitlistEntry,
        ) -> Result<WaitlistEntry, StorageError> {
            self.inner.create_entry(data).await
        }
    }

    fn service() -> WaitlistService {
        WaitlistService::new(Arc::new(InMemoryWaitlistStore::new()))
    }

    #[tokio::test]
    async fn test_join_creates_entry_and_increments_count() {
        let service = service();
        assert_eq!(service.count().await.unwrap(), 0);

        let entry = service
            .join(&json!({"fullName": "Ada Lovelace", "email": "ada@example.com"}))
            .await
            .unwrap();

        assert_eq!(entry.email, "ada@example.com");
        assert_eq!(entry.company, None);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_persisted() {
        let service = service();
        let err = service
            .join(&json!({"fullName": "", "email": "x@example.com"}))
            .await
            .unwrap_err();

        match err {
            JoinError::Validation(v) => assert!(v.has_field("fullName")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let service = service();
        let input = json!({"fullName": "Ada Lovelace", "email": "ada@example.com"});

        service.join(&input).await.unwrap();
        let err = service.join(&input).await.unwrap_err();

        assert!(matches!(err, JoinError::DuplicateEmail(ref e) if e == "ada@example.com"));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_detection_ignores_case_and_whitespace() {
        let service = service();
        service
            .join(&json!({"fullName": "Ada", "email": "ada@example.com"}))
            .await
            .unwrap();

        let err = service
            .join(&json!({"fullName": "Ada", "email": "  ADA@Example.com "}))
            .await
            .unwrap_err();

        assert!(matches!(err, JoinError::DuplicateEmail(_)));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_uniqueness_violation_maps_to_duplicate() {
        let service = WaitlistService::new(Arc::new(RacingStore {
            inner: InMemoryWaitlistStore::new(),
        }));
        let input = json!({"fullName": "Ada", "email": "ada@example.com"});

        service.join(&input).await.unwrap();
        let err = service.join(&input).await.unwrap_err();

        assert!(matches!(err, JoinError::DuplicateEmail(_)));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_storage_failures_propagate() {
        let service = WaitlistService::new(Arc::new(FailingStore));

        assert!(matches!(
            service.count().await,
            Err(StorageError::Unavailable(_))
        ));

        let err = service
            .join(&json!({"fullName": "Ada", "email": "ada@example.com"}))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::Storage(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_validation_runs_before_storage() {
        let service = WaitlistService::new(Arc::new(FailingStore));
        let err = service
            .join(&json!({"email": "broken"}))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::Validation(_)));
    }
}
