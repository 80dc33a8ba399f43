//! Общие типы backend и клиентов лендинга: агрегаты, DTO и валидация.

pub mod domain;
pub mod shared;
