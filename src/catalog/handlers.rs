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

use super::{
    dto::{CategoryPayload, ProductPayload},
    repo_types::{Category, Product, ProductDraft},
};
use crate::{auth::AdminUser, error::ApiError, state::AppState};

// --- routers ---

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", get(get_category))
}

// --- products ---

#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.list_products().await?))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    state
        .store
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product"))
}

/// Field checks plus the category lookup, run before the privilege check so
/// a malformed product is a 400 for every caller.
async fn validated_product(state: &AppState, payload: ProductPayload) -> Result<ProductDraft, ApiError> {
    let draft = payload.validate().map_err(|e| {
        warn!(error = %e, "product rejected");
        e
    })?;
    if state.store.get_category(draft.category_id).await?.is_none() {
        warn!(category_id = draft.category_id, "product references unknown category");
        return Err(ApiError::validation(
            "category",
            format!("Invalid pk \"{}\" - object does not exist.", draft.category_id),
        ));
    }
    Ok(draft)
}

#[instrument(skip(state, admin, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: Result<AdminUser, ApiError>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let draft = validated_product(&state, payload).await?;
    let AdminUser(author) = admin?;

    let product = state.store.create_product(draft, author.id).await?;
    info!(product_id = product.id, author_id = %author.id, "product created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/products/{}", product.id))],
        Json(product),
    ))
}

#[instrument(skip(state, admin, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    admin: Result<AdminUser, ApiError>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let draft = validated_product(&state, payload).await?;
    let AdminUser(editor) = admin?;

    let product = state
        .store
        .update_product(id, draft)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    info!(product_id = id, editor_id = %editor.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state, admin))]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AdminUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    if !state.store.delete_product(id).await? {
        return Err(ApiError::not_found("Product"));
    }
    info!(product_id = id, editor_id = %admin.0.id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- categories ---

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories().await?))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Category>, ApiError> {
    let Path(id) = id?;
    state
        .store
        .get_category(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category"))
}

#[instrument(skip(state, admin, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    admin: AdminUser,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let draft = payload.validate()?;
    let category = state.store.create_category(draft).await?;
    info!(category_id = category.id, slug = %category.slug, editor_id = %admin.0.id, "category created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/categories/{}", category.id))],
        Json(category),
    ))
}
