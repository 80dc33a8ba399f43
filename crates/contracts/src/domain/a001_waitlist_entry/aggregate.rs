use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::AggregateId;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи в листе ожидания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaitlistEntryId(pub Uuid);

impl WaitlistEntryId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for WaitlistEntryId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(WaitlistEntryId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Запись в листе ожидания
///
/// Создаётся один раз и больше не изменяется. `email` хранится в
/// нормализованном виде и уникален среди всех записей.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: WaitlistEntryId,

    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    pub company: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// Создать запись для вставки в хранилище: новый ID и текущее время
    pub fn new_for_insert(data: NewWaitlistEntry) -> Self {
        Self {
            id: WaitlistEntryId::new_v4(),
            full_name: data.full_name,
            email: data.email,
            company: data.company,
            created_at: Utc::now(),
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }
}

/// Провалидированные данные новой записи (результат `validator`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWaitlistEntry {
    pub full_name: String,
    pub email: String,
    pub company: Option<String>,
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Тело запроса POST /api/waitlist в том виде, как его отправляет форма
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JoinWaitlistRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Подтверждение записи: только публичные поля, без служебных
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntryConfirmation {
    pub id: String,

    #[serde(rename = "fullName")]
    pub full_name: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl From<&WaitlistEntry> for WaitlistEntryConfirmation {
    fn from(entry: &WaitlistEntry) -> Self {
        Self {
            id: entry.to_string_id(),
            full_name: entry.full_name.clone(),
            email: entry.email.clone(),
            company: entry.company.clone(),
        }
    }
}

/// Ответ 201 на POST /api/waitlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistResponse {
    pub message: String,
    pub entry: WaitlistEntryConfirmation,
}

/// Ответ GET /api/waitlist/count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistCountResponse {
    pub count: u64,
}
