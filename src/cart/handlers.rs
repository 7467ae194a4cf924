use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::CartItemPayload,
    repo_types::{CartItem, CartItemDraft},
};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(my_cart).post(add_to_cart))
        .route(
            "/cart/:id",
            get(cart_item_detail)
                .put(edit_cart_item)
                .delete(delete_cart_item),
        )
}

/// 404 when the item is missing, 403 when it belongs to someone else.
async fn owned_cart_item(state: &AppState, user_id: Uuid, id: i64) -> Result<CartItem, ApiError> {
    let item = state
        .store
        .get_cart_item(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cart item"))?;
    if item.user_id != user_id {
        warn!(%user_id, cart_item_id = id, owner_id = %item.user_id, "cart item access denied");
        return Err(ApiError::Forbidden(
            "You do not have permission to access this cart item".into(),
        ));
    }
    Ok(item)
}

async fn validated_item(state: &AppState, payload: CartItemPayload) -> Result<CartItemDraft, ApiError> {
    let draft = payload.validate()?;
    if state.store.get_product(draft.product_id).await?.is_none() {
        return Err(ApiError::validation(
            "product",
            format!("Invalid pk \"{}\" - object does not exist.", draft.product_id),
        ));
    }
    Ok(draft)
}

#[instrument(skip(state, payload))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CartItemPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let draft = validated_item(&state, payload).await?;
    let item = state.store.create_cart_item(user_id, draft).await?;
    info!(%user_id, cart_item_id = item.id, product_id = item.product_id, qty = item.qty, "added to cart");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/cart/{}", item.id))],
        Json(item),
    ))
}

#[instrument(skip(state))]
pub async fn my_cart(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    Ok(Json(state.store.list_cart_items(user_id).await?))
}

#[instrument(skip(state))]
pub async fn cart_item_detail(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CartItem>, ApiError> {
    let Path(id) = id?;
    Ok(Json(owned_cart_item(&state, user_id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn edit_cart_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CartItemPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    owned_cart_item(&state, user_id, id).await?;
    let Json(payload) = payload?;
    let draft = validated_item(&state, payload).await?;

    if !state.store.update_cart_item(id, draft).await? {
        return Err(ApiError::not_found("Cart item"));
    }
    info!(%user_id, cart_item_id = id, "cart item updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    owned_cart_item(&state, user_id, id).await?;
    if !state.store.delete_cart_item(id).await? {
        return Err(ApiError::not_found("Cart item"));
    }
    info!(%user_id, cart_item_id = id, "cart item deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, to_value};

    use super::*;
    use crate::{
        auth::repo_types::User,
        testing::{
            bearer, create_category, create_product, create_user, request, send, send_with_headers,
            test_app,
        },
    };

    struct Fixture {
        state: AppState,
        app: Router,
        user: User,
        product_id: i64,
        item: CartItem,
    }

    async fn fixture() -> Fixture {
        let (state, app) = test_app();
        let author = create_user(&state, "testsuper@user.com", true).await;
        let user = create_user(&state, "test@user.com", false).await;
        let category = create_category(&state, "test category", "testcategory").await;
        let product = create_product(&state, "Product 1", 3, &category, &author).await;
        let item = state
            .store
            .create_cart_item(
                user.id,
                CartItemDraft {
                    product_id: product.id,
                    qty: 1,
                },
            )
            .await
            .unwrap();
        Fixture {
            state,
            app,
            user,
            product_id: product.id,
            item,
        }
    }

    #[tokio::test]
    async fn add_to_cart_creates_item_owned_by_caller() {
        let f = fixture().await;
        let token = bearer(&f.state, &f.user);
        // re-post a serialized item, as a client echoing the cart would
        let payload = to_value(&f.item).unwrap();

        let (status, headers, body) = send_with_headers(
            &f.app,
            request(Method::POST, "/api/v1/cart", Some(&token), Some(payload)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            headers[axum::http::header::LOCATION],
            format!("/api/v1/cart/{}", body["id"]).as_str()
        );
        assert_eq!(body["user"], f.user.id.to_string());
        assert_eq!(body["product"], f.product_id);
        assert_ne!(body["id"], f.item.id);

        let mine = f.state.store.list_cart_items(f.user.id).await.unwrap();
        assert_eq!(mine.len(), 2);
    }

    #[tokio::test]
    async fn add_to_cart_requires_auth_and_valid_product() {
        let f = fixture().await;
        let (status, _) = send(
            &f.app,
            request(
                Method::POST,
                "/api/v1/cart",
                None,
                Some(json!({"product": f.product_id, "qty": 5})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = bearer(&f.state, &f.user);
        for payload in [
            json!({"product": 999, "qty": 5}),
            json!({"product": f.product_id, "qty": 0}),
            json!({"qty": 2}),
        ] {
            let (status, _) = send(
                &f.app,
                request(Method::POST, "/api/v1/cart", Some(&token), Some(payload)),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn my_cart_lists_only_own_items() {
        let f = fixture().await;
        let other = create_user(&f.state, "other@user.com", false).await;
        f.state
            .store
            .create_cart_item(
                other.id,
                CartItemDraft {
                    product_id: f.product_id,
                    qty: 9,
                },
            )
            .await
            .unwrap();

        let token = bearer(&f.state, &f.user);
        let (status, body) = send(&f.app, request(Method::GET, "/api/v1/cart", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([to_value(&f.item).unwrap()]));

        let (status, _) = send(&f.app, request(Method::GET, "/api/v1/cart", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn cart_item_detail_matches_store() {
        let f = fixture().await;
        let token = bearer(&f.state, &f.user);
        let uri = format!("/api/v1/cart/{}", f.item.id);

        let (status, body) = send(&f.app, request(Method::GET, &uri, Some(&token), None)).await;
        let stored = f.state.store.get_cart_item(f.item.id).await.unwrap().unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, to_value(&stored).unwrap());
    }

    #[tokio::test]
    async fn foreign_or_missing_items_are_refused() {
        let f = fixture().await;
        let other = create_user(&f.state, "other@user.com", false).await;
        let token = bearer(&f.state, &other);
        let uri = format!("/api/v1/cart/{}", f.item.id);

        let (status, _) = send(&f.app, request(Method::GET, &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(
            &f.app,
            request(Method::PUT, &uri, Some(&token), Some(json!({"product": f.product_id, "qty": 3}))),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&f.app, request(Method::DELETE, &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(f.state.store.get_cart_item(f.item.id).await.unwrap().is_some());

        let (status, _) =
            send(&f.app, request(Method::GET, "/api/v1/cart/999", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, body) =
            send(&f.app, request(Method::GET, "/api/v1/cart/abc", Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn update_cart_item_returns_204_without_body() {
        let f = fixture().await;
        let token = bearer(&f.state, &f.user);
        let uri = format!("/api/v1/cart/{}", f.item.id);
        let mut payload = to_value(&f.item).unwrap();
        payload["qty"] = json!(5);

        let (status, body) = send(&f.app, request(Method::PUT, &uri, Some(&token), Some(payload))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let stored = f.state.store.get_cart_item(f.item.id).await.unwrap().unwrap();
        assert_eq!(stored.qty, 5);
        assert_eq!(stored.user_id, f.user.id);

        let (status, _) = send(
            &f.app,
            request(Method::PUT, &uri, Some(&token), Some(json!({"product": f.product_id, "qty": -1}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_cart_item_returns_204_without_body() {
        let f = fixture().await;
        let token = bearer(&f.state, &f.user);
        let uri = format!("/api/v1/cart/{}", f.item.id);

        let (status, body) = send(&f.app, request(Method::DELETE, &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
        assert!(f.state.store.get_cart_item(f.item.id).await.unwrap().is_none());

        let (status, _) = send(&f.app, request(Method::DELETE, &uri, Some(&token), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
