//! Address route handlers.
//!
//! All endpoints are owner-scoped: the path id is only ever resolved against
//! the authenticated user's rows, so other users' addresses 404 rather than
//! leak.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use akubata_core::AddressId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Address, AddressPatch, NewAddress};
use crate::services::addresses::AddressService;
use crate::state::AppState;

/// GET /api/addresses
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Address>>> {
    let addresses = AddressService::new(state.pool()).list(user.id).await?;
    Ok(Json(addresses))
}

/// POST /api/addresses
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<NewAddress>,
) -> Result<Json<Address>> {
    let address = AddressService::new(state.pool())
        .create(user.id, &request)
        .await?;

    tracing::info!(user_id = %user.id, address_id = %address.id, "Address created");

    Ok(Json(address))
}

/// GET /api/addresses/default
pub async fn get_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Option<Address>>> {
    let address = AddressService::new(state.pool())
        .get_default(user.id)
        .await?;
    Ok(Json(address))
}

/// GET /api/addresses/{id}
pub async fn get(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>> {
    let address = AddressService::new(state.pool()).get(user.id, id).await?;
    Ok(Json(address))
}

/// PUT /api/addresses/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(patch): Json<AddressPatch>,
) -> Result<Json<Address>> {
    let address = AddressService::new(state.pool())
        .update(user.id, id, &patch)
        .await?;
    Ok(Json(address))
}

/// PATCH /api/addresses/{id}/default
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Address>> {
    let address = AddressService::new(state.pool())
        .set_default(user.id, id)
        .await?;

    tracing::info!(user_id = %user.id, address_id = %address.id, "Default address changed");

    Ok(Json(address))
}

/// DELETE /api/addresses/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Value>> {
    AddressService::new(state.pool()).delete(user.id, id).await?;
    Ok(Json(json!({ "message": "Address deleted" })))
}
