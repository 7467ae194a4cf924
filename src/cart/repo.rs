use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{CartItem, CartItemDraft};

impl CartItem {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<CartItem>> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, product_id, qty, user_id, created_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<CartItem>> {
        sqlx::query_as::<_, CartItem>(
            r#"
            SELECT id, product_id, qty, user_id, created_at
            FROM cart_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(db: &PgPool, user_id: Uuid, draft: &CartItemDraft) -> sqlx::Result<CartItem> {
        sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (product_id, qty, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, qty, user_id, created_at
            "#,
        )
        .bind(draft.product_id)
        .bind(draft.qty)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: i64, draft: &CartItemDraft) -> sqlx::Result<bool> {
        let done = sqlx::query("UPDATE cart_items SET product_id = $2, qty = $3 WHERE id = $1")
            .bind(id)
            .bind(draft.product_id)
            .bind(draft.qty)
            .execute(db)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<bool> {
        let done = sqlx::query("DELETE FROM cart_items WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
