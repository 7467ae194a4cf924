use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    #[serde(rename = "category")]
    pub category_id: i64,
    #[serde(rename = "author")]
    pub author_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated category fields.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub title: String,
    pub slug: String,
}

/// Validated product fields. The author is supplied separately on insert and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub price: Decimal,
    pub category_id: i64,
}
