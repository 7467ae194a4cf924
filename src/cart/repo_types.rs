use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A product and quantity in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub id: i64,
    #[serde(rename = "product")]
    pub product_id: i64,
    pub qty: i32,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct CartItemDraft {
    pub product_id: i64,
    pub qty: i32,
}
