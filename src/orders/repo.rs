use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Order;

impl Order {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Order>> {
        sqlx::query_as::<_, Order>(
            r#"
            SELECT id, cart_item_id, user_id, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn insert(db: &PgPool, user_id: Uuid, cart_item_id: i64) -> sqlx::Result<Order> {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (cart_item_id, user_id)
            VALUES ($1, $2)
            RETURNING id, cart_item_id, user_id, created_at
            "#,
        )
        .bind(cart_item_id)
        .bind(user_id)
        .fetch_one(db)
        .await
    }
}
