//! Supplier route handlers.
//!
//! Reads are open to any authenticated user; mutations require the admin or
//! manager role.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use akubata_core::{Role, SupplierId};

use crate::db::suppliers::SupplierRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewSupplier, Supplier, SupplierPatch};
use crate::state::AppState;

const CATALOG_ROLES: &[Role] = &[Role::Admin, Role::Manager];

/// GET /api/suppliers
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Supplier>>> {
    let suppliers = SupplierRepository::new(state.pool()).list().await?;
    Ok(Json(suppliers))
}

/// GET /api/suppliers/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<SupplierId>,
) -> Result<Json<Supplier>> {
    let supplier = SupplierRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("supplier not found".to_owned()))?;

    Ok(Json(supplier))
}

/// POST /api/suppliers
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<NewSupplier>,
) -> Result<Json<Supplier>> {
    user.authorize(CATALOG_ROLES)?;

    if request.company_name.trim().is_empty() {
        return Err(AppError::BadRequest("company_name is required".to_owned()));
    }

    let supplier = SupplierRepository::new(state.pool())
        .create(&request)
        .await?;

    tracing::info!(supplier_id = %supplier.id, by = %user.id, "Supplier created");

    Ok(Json(supplier))
}

/// PUT /api/suppliers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<SupplierId>,
    Json(patch): Json<SupplierPatch>,
) -> Result<Json<Supplier>> {
    user.authorize(CATALOG_ROLES)?;

    let supplier = SupplierRepository::new(state.pool())
        .update(id, &patch)
        .await?;

    Ok(Json(supplier))
}

/// DELETE /api/suppliers/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<SupplierId>,
) -> Result<Json<Value>> {
    user.authorize(CATALOG_ROLES)?;

    if !SupplierRepository::new(state.pool()).delete(id).await? {
        return Err(AppError::NotFound("supplier not found".to_owned()));
    }

    tracing::info!(supplier_id = %id, by = %user.id, "Supplier deleted");

    Ok(Json(json!({ "message": "Supplier deleted" })))
}
