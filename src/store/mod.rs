use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    cart::repo_types::{CartItem, CartItemDraft},
    catalog::repo_types::{Category, CategoryDraft, Product, ProductDraft},
    orders::repo_types::Order,
};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    /// A foreign key pointed at a missing row; carries the payload field name.
    #[error("{0} does not exist")]
    InvalidReference(&'static str),
    #[error(transparent)]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for every record kind the API exposes.
///
/// Lookups return `Ok(None)` for missing rows; updates and deletes report
/// whether a row was touched.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>>;
    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category>;

    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>>;
    async fn create_product(&self, draft: ProductDraft, author_id: Uuid) -> StoreResult<Product>;
    async fn update_product(&self, id: i64, draft: ProductDraft) -> StoreResult<Option<Product>>;
    async fn delete_product(&self, id: i64) -> StoreResult<bool>;

    async fn list_cart_items(&self, user_id: Uuid) -> StoreResult<Vec<CartItem>>;
    async fn get_cart_item(&self, id: i64) -> StoreResult<Option<CartItem>>;
    async fn create_cart_item(&self, user_id: Uuid, draft: CartItemDraft) -> StoreResult<CartItem>;
    async fn update_cart_item(&self, id: i64, draft: CartItemDraft) -> StoreResult<bool>;
    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool>;

    async fn list_orders(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;
    async fn create_order(&self, user_id: Uuid, cart_item_id: i64) -> StoreResult<Order>;
}
