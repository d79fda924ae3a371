//! HTTP handlers for collections (payments received)

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::collection::{Collection, CreateCollectionInput};
use crate::services::CollectionService;
use crate::AppState;

/// Record a collection against a customer's due
pub async fn create_collection(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCollectionInput>,
) -> AppResult<Json<Collection>> {
    let service = CollectionService::new(state.db);
    let collection = service.create(current_user.0.user_id, input).await?;
    Ok(Json(collection))
}

/// List all collections, newest first
pub async fn list_collections(State(state): State<AppState>) -> AppResult<Json<Vec<Collection>>> {
    let service = CollectionService::new(state.db);
    let collections = service.list().await?;
    Ok(Json(collections))
}
