use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::{
    auth::repo_types::{NewUser, User},
    cart::repo_types::{CartItem, CartItemDraft},
    catalog::repo_types::{Category, CategoryDraft, Product, ProductDraft},
    orders::repo_types::Order,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    cart_items: BTreeMap<i64, CartItem>,
    orders: BTreeMap<i64, Order>,
    category_seq: i64,
    product_seq: i64,
    cart_item_seq: i64,
    order_seq: i64,
}

// Ids are never reused, like a BIGSERIAL column.
fn bump(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl Tables {
    fn remove_cart_item(&mut self, id: i64) -> bool {
        let removed = self.cart_items.remove(&id).is_some();
        if removed {
            self.orders.retain(|_, o| o.cart_item_id != id);
        }
        removed
    }
}

/// In-process `Store` with the same constraints as the SQL schema: unique
/// email and slug, foreign keys checked on write, cascading deletes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!("email {} already exists", new.email)));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            is_superuser: new.is_superuser,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create_category(&self, draft: CategoryDraft) -> StoreResult<Category> {
        let mut t = self.tables.write().await;
        if t.categories.values().any(|c| c.slug == draft.slug) {
            return Err(StoreError::Conflict(format!("slug {} already exists", draft.slug)));
        }
        let category = Category {
            id: bump(&mut t.category_seq),
            title: draft.title,
            slug: draft.slug,
        };
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn get_product(&self, id: i64) -> StoreResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn create_product(&self, draft: ProductDraft, author_id: Uuid) -> StoreResult<Product> {
        let mut t = self.tables.write().await;
        if !t.categories.contains_key(&draft.category_id) {
            return Err(StoreError::InvalidReference("category"));
        }
        if !t.users.contains_key(&author_id) {
            return Err(StoreError::InvalidReference("author"));
        }
        let product = Product {
            id: bump(&mut t.product_seq),
            title: draft.title,
            price: draft.price,
            category_id: draft.category_id,
            author_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i64, draft: ProductDraft) -> StoreResult<Option<Product>> {
        let mut t = self.tables.write().await;
        if !t.products.contains_key(&id) {
            return Ok(None);
        }
        if !t.categories.contains_key(&draft.category_id) {
            return Err(StoreError::InvalidReference("category"));
        }
        Ok(t.products.get_mut(&id).map(|p| {
            p.title = draft.title;
            p.price = draft.price;
            p.category_id = draft.category_id;
            p.clone()
        }))
    }

    async fn delete_product(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.products.remove(&id).is_none() {
            return Ok(false);
        }
        let doomed: Vec<i64> = t
            .cart_items
            .values()
            .filter(|c| c.product_id == id)
            .map(|c| c.id)
            .collect();
        for cart_item_id in doomed {
            t.remove_cart_item(cart_item_id);
        }
        Ok(true)
    }

    async fn list_cart_items(&self, user_id: Uuid) -> StoreResult<Vec<CartItem>> {
        let t = self.tables.read().await;
        Ok(t.cart_items
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_cart_item(&self, id: i64) -> StoreResult<Option<CartItem>> {
        Ok(self.tables.read().await.cart_items.get(&id).cloned())
    }

    async fn create_cart_item(&self, user_id: Uuid, draft: CartItemDraft) -> StoreResult<CartItem> {
        let mut t = self.tables.write().await;
        if !t.products.contains_key(&draft.product_id) {
            return Err(StoreError::InvalidReference("product"));
        }
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::InvalidReference("user"));
        }
        let item = CartItem {
            id: bump(&mut t.cart_item_seq),
            product_id: draft.product_id,
            qty: draft.qty,
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.cart_items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_cart_item(&self, id: i64, draft: CartItemDraft) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if !t.cart_items.contains_key(&id) {
            return Ok(false);
        }
        if !t.products.contains_key(&draft.product_id) {
            return Err(StoreError::InvalidReference("product"));
        }
        if let Some(item) = t.cart_items.get_mut(&id) {
            item.product_id = draft.product_id;
            item.qty = draft.qty;
        }
        Ok(true)
    }

    async fn delete_cart_item(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_cart_item(id))
    }

    async fn list_orders(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let t = self.tables.read().await;
        Ok(t.orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_order(&self, user_id: Uuid, cart_item_id: i64) -> StoreResult<Order> {
        let mut t = self.tables.write().await;
        if !t.cart_items.contains_key(&cart_item_id) {
            return Err(StoreError::InvalidReference("cart_item"));
        }
        if !t.users.contains_key(&user_id) {
            return Err(StoreError::InvalidReference("user"));
        }
        let order = Order {
            id: bump(&mut t.order_seq),
            cart_item_id,
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.orders.insert(order.id, order.clone());
        Ok(order)
    }
}
