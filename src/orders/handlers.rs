use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{dto::CheckoutPayload, repo_types::Order};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(checkout))
        .route("/orders", get(my_orders))
}

/// Turn one of the caller's cart items into an order. No totals, tax or
/// stock bookkeeping happen here.
#[instrument(skip(state, payload))]
pub async fn checkout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(payload) = payload?;
    let cart_item_id = payload
        .cart_item
        .ok_or_else(|| ApiError::validation("cart_item", "This field is required."))?;

    let item = state.store.get_cart_item(cart_item_id).await?.ok_or_else(|| {
        ApiError::validation(
            "cart_item",
            format!("Invalid pk \"{cart_item_id}\" - object does not exist."),
        )
    })?;
    if item.user_id != user_id {
        warn!(%user_id, cart_item_id, "checkout of foreign cart item");
        return Err(ApiError::Forbidden(
            "You can only check out items from your own cart".into(),
        ));
    }

    let order = state.store.create_order(user_id, item.id).await?;
    info!(%user_id, order_id = order.id, cart_item_id, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

#[instrument(skip(state))]
pub async fn my_orders(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.store.list_orders(user_id).await?))
}
