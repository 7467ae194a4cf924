use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::{
    auth::repo_types::{NewUser, User},
    cart::repo_types::{CartItem, CartItemDraft},
    catalog::repo_types::{Category, CategoryDraft, Product, ProductDraft},
    orders::repo_types::Order,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// `Store` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database migrations applied");
        Ok(Self::new(db))
    }
}

fn reference_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(c) if c.ends_with("_category_id_fkey") => "category",
        Some(c) if c.ends_with("_author_id_fkey") => "author",
        Some(c) if c.ends_with("_product_id_fkey") => "product",
        Some(c) if c.ends_with("_cart_item_id_fkey") => "cart_item",
        _ => "user",
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return Self::Conflict(db.message().to_string()),
                Some(FOREIGN_KEY_VIOLATION) => {
                    return Self::InvalidReference(reference_field(db.constraint()))
                }
                _ => {}
            }
        }
        Self::Database(e)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        Ok(User::create(&self.db, &new).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.db, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.db, email).await?)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(Category::list(&self.db).await?)
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(Category::find(&self.db, id).await?)
    }

    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category> {
        Ok(Category::insert(&self.db, &draft).await?)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(Product::list(&self.db).await?)
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(Product::find(&self.db, id).await?)
    }

    async fn create_product(&self, draft: ProductDraft, author_id: Uuid) -> StoreResult<Product> {
        Ok(Product::insert(&self.db, &draft, author_id).await?)
    }

    async fn update_product(&self, id: i64, draft: ProductDraft) -> StoreResult<Option<Product>> {
        Ok(Product::update(&self.db, id, &draft).await?)
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        Ok(Product::delete(&self.db, id).await?)
    }

    async fn list_cart_items(&self, user_id: Uuid) -> StoreResult<Vec<CartItem>> {
        Ok(CartItem::list_by_user(&self.db, user_id).await?)
    }

    async fn get_cart_item(&self, id: i64) -> StoreResult<Option<CartItem>> {
        Ok(CartItem::find(&self.db, id).await?)
    }

    async fn create_cart_item(&self, user_id: Uuid, draft: CartItemDraft) -> StoreResult<CartItem> {
        Ok(CartItem::insert(&self.db, user_id, &draft).await?)
    }

    async fn update_cart_item(&self, id: i64, draft: CartItemDraft) -> StoreResult<bool> {
        Ok(CartItem::update(&self.db, id, &draft).await?)
    }

    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool> {
        Ok(CartItem::delete(&self.db, id).await?)
    }

    async fn list_orders(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        Ok(Order::list_by_user(&self.db, user_id).await?)
    }

    async fn create_order(&self, user_id: Uuid, cart_item_id: i64) -> StoreResult<Order> {
        Ok(Order::insert(&self.db, user_id, cart_item_id).await?)
    }
}
