//! Product route handlers.
//!
//! Reads are open to any authenticated user; mutations require the admin or
//! manager role.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use akubata_core::{ProductId, Role, SupplierId};

use crate::db::products::ProductRepository;
use crate::db::suppliers::SupplierRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

const CATALOG_ROLES: &[Role] = &[Role::Admin, Role::Manager];

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_owned()))?;

    Ok(Json(product))
}

/// GET /api/products/by-supplier/{id}
pub async fn list_by_supplier(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<SupplierId>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list_by_supplier(id)
        .await?;
    Ok(Json(products))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<NewProduct>,
) -> Result<Json<Product>> {
    user.authorize(CATALOG_ROLES)?;

    if request.product_name.trim().is_empty() {
        return Err(AppError::BadRequest("product_name is required".to_owned()));
    }
    ensure_supplier_exists(&state, request.supplier_id).await?;

    let product = ProductRepository::new(state.pool()).create(&request).await?;

    tracing::info!(product_id = %product.id, by = %user.id, "Product created");

    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    user.authorize(CATALOG_ROLES)?;

    ensure_supplier_exists(&state, patch.supplier_id).await?;

    let product = ProductRepository::new(state.pool())
        .update(id, &patch)
        .await?;

    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    user.authorize(CATALOG_ROLES)?;

    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("product not found".to_owned()));
    }

    tracing::info!(product_id = %id, by = %user.id, "Product deleted");

    Ok(Json(json!({ "message": "Product deleted" })))
}

/// A product may reference a supplier; when it does, the supplier must
/// exist before the write lands.
async fn ensure_supplier_exists(
    state: &AppState,
    supplier_id: Option<SupplierId>,
) -> Result<()> {
    if let Some(supplier_id) = supplier_id {
        SupplierRepository::new(state.pool())
            .get(supplier_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("supplier {supplier_id} does not exist")))?;
    }
    Ok(())
}
