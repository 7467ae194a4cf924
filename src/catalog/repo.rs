use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Category, CategoryDraft, Product, ProductDraft};

impl Category {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, title, slug FROM categories ORDER BY id")
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, title, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn insert(db: &PgPool, draft: &CategoryDraft) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (title, slug)
            VALUES ($1, $2)
            RETURNING id, title, slug
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.slug)
        .fetch_one(db)
        .await
    }
}

impl Product {
    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, price, category_id, author_id, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, id: i64) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, price, category_id, author_id, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(db: &PgPool, draft: &ProductDraft, author_id: Uuid) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (title, price, category_id, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, price, category_id, author_id, created_at
            "#,
        )
        .bind(&draft.title)
        .bind(draft.price)
        .bind(draft.category_id)
        .bind(author_id)
        .fetch_one(db)
        .await
    }

    pub async fn update(db: &PgPool, id: i64, draft: &ProductDraft) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET title = $2, price = $3, category_id = $4
             WHERE id = $1
            RETURNING id, title, price, category_id, author_id, created_at
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(draft.price)
        .bind(draft.category_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: i64) -> sqlx::Result<bool> {
        let done = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
