use serde::Deserialize;

use super::repo_types::CartItemDraft;
use crate::error::ApiError;

fn default_qty() -> i32 {
    1
}

/// Body of `POST /cart` and `PUT /cart/:id`. A previously serialized cart
/// item is accepted as-is: `id`, `user` and `created_at` are ignored.
#[derive(Debug, Deserialize)]
pub struct CartItemPayload {
    pub product: Option<i64>,
    #[serde(default = "default_qty")]
    pub qty: i32,
}

impl CartItemPayload {
    pub fn validate(self) -> Result<CartItemDraft, ApiError> {
        let product_id = self
            .product
            .ok_or_else(|| ApiError::validation("product", "This field is required."))?;
        if self.qty < 1 {
            return Err(ApiError::validation(
                "qty",
                "Ensure this value is greater than or equal to 1.",
            ));
        }
        Ok(CartItemDraft {
            product_id,
            qty: self.qty,
        })
    }
}
