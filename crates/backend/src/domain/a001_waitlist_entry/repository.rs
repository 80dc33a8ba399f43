use async_trait::async_trait;
use contracts::domain::a001_waitlist_entry::aggregate::{
    NewWaitlistEntry, WaitlistEntry, WaitlistEntryId,
};
use contracts::domain::common::AggregateId;

use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryFilter, Set, SqlErr};

use super::store::{StorageError, WaitlistStore};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_waitlist_entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub company: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for WaitlistEntry {
    type Error = DbErr;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let id = WaitlistEntryId::from_string(&m.id)
            .map_err(|e| DbErr::Type(format!("a001_waitlist_entry.id: {}", e)))?;

        Ok(WaitlistEntry {
            id,
            full_name: m.full_name,
            email: m.email,
            company: m.company,
            created_at: m.created_at,
        })
    }
}

/// Хранилище листа ожидания в SQLite через sea-orm
#[derive(Clone)]
pub struct SqliteWaitlistStore {
    conn: DatabaseConnection,
}

impl SqliteWaitlistStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl WaitlistStore for SqliteWaitlistStore {
    async fn count_entries(&self) -> Result<u64, StorageError> {
        Ok(Entity::find().count(&self.conn).await?)
    }

    async fn find_entry_by_email(
        &self,
        email: &str,
    ) -> Result<Option<WaitlistEntry>, StorageError> {
        let result = Entity::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await?;
        Ok(result.map(WaitlistEntry::try_from).transpose()?)
    }

    async fn create_entry(&self, data: NewWaitlistEntry) -> Result<WaitlistEntry, StorageError> {
        let entry = WaitlistEntry::new_for_insert(data);
        let active = ActiveModel {
            id: Set(entry.to_string_id()),
            full_name: Set(entry.full_name.clone()),
            email: Set(entry.email.clone()),
            company: Set(entry.company.clone()),
            created_at: Set(entry.created_at),
        };

        match Entity::insert(active)
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) => Ok(entry),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(StorageError::UniqueViolation(entry.email))
                }
                _ => Err(err.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    async fn store() -> SqliteWaitlistStore {
        SqliteWaitlistStore::new(connect_in_memory().await.unwrap())
    }

    fn new_entry(email: &str, company: Option<&str>) -> NewWaitlistEntry {
        NewWaitlistEntry {
            full_name: "Ada Lovelace".into(),
            email: email.into(),
            company: company.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_empty_table_counts_zero() {
        let store = store().await;
        assert_eq!(store.count_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let store = store().await;
        let created = store
            .create_entry(new_entry("ada@example.com", Some("Analytical Engines")))
            .await
            .unwrap();

        let found = store
            .find_entry_by_email("ada@example.com")
            .await
            .unwrap()
            .expect("entry should be stored");

        assert_eq!(found.id, created.id);
        assert_eq!(found.full_name, "Ada Lovelace");
        assert_eq!(found.company.as_deref(), Some("Analytical Engines"));
        assert_eq!(store.count_entries().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_email_is_absent_not_error() {
        let store = store().await;
        store
            .create_entry(new_entry("ada@example.com", None))
            .await
            .unwrap();

        let found = store.find_entry_by_email("grace@example.com").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_unique_index_rejects_second_insert() {
        let store = store().await;
        store
            .create_entry(new_entry("ada@example.com", None))
            .await
            .unwrap();

        let err = store
            .create_entry(new_entry("ada@example.com", Some("Other")))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UniqueViolation(ref e) if e == "ada@example.com"));
        assert_eq!(store.count_entries().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_each_entry_gets_its_own_id() {
        let store = store().await;
        let a = store
            .create_entry(new_entry("a@example.com", None))
            .await
            .unwrap();
        let b = store
            .create_entry(new_entry("b@example.com", None))
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.count_entries().await.unwrap(), 2);
    }
}
