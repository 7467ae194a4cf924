use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::repo_types::{CategoryDraft, ProductDraft};
use crate::error::ApiError;

const MAX_TITLE_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 50;
const PRICE_SCALE: u32 = 2;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug regex compiles");
}

/// Body of `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub title: Option<String>,
    pub slug: Option<String>,
}

/// Body of `POST /products` and `PUT /products/:id`. Unknown fields such as
/// `id` or `author` are ignored; the author is always the caller.
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<i64>,
}

fn required_text(field: &'static str, value: Option<String>, max: usize) -> Result<String, ApiError> {
    let value = value.ok_or_else(|| ApiError::validation(field, "This field is required."))?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ApiError::validation(field, "This field may not be blank."));
    }
    if value.chars().count() > max {
        return Err(ApiError::validation(
            field,
            format!("Ensure this field has no more than {max} characters."),
        ));
    }
    Ok(value)
}

/// Round to cents and pin the scale so every backend renders e.g. `"3.00"`.
fn normalize_price(price: Decimal) -> Result<Decimal, ApiError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ApiError::validation(
            "price",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    let mut price = price.round_dp(PRICE_SCALE);
    price.rescale(PRICE_SCALE);
    // NUMERIC(10, 2)
    if price >= Decimal::new(100_000_000, 0) {
        return Err(ApiError::validation(
            "price",
            "Ensure that there are no more than 10 digits in total.",
        ));
    }
    Ok(price)
}

impl CategoryPayload {
    pub fn validate(self) -> Result<CategoryDraft, ApiError> {
        let title = required_text("title", self.title, MAX_TITLE_LEN)?;
        let slug = required_text("slug", self.slug, MAX_SLUG_LEN)?;
        if !SLUG_RE.is_match(&slug) {
            return Err(ApiError::validation(
                "slug",
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            ));
        }
        Ok(CategoryDraft { title, slug })
    }
}

impl ProductPayload {
    /// Field-level checks. Whether `category` exists is up to the caller.
    pub fn validate(self) -> Result<ProductDraft, ApiError> {
        let title = required_text("title", self.title, MAX_TITLE_LEN)?;
        let price = self
            .price
            .ok_or_else(|| ApiError::validation("price", "This field is required."))
            .and_then(normalize_price)?;
        let category_id = self
            .category
            .ok_or_else(|| ApiError::validation("category", "This field is required."))?;
        Ok(ProductDraft {
            title,
            price,
            category_id,
        })
    }
}
