use axum::{extract::State, Json};

use crate::dto::MigrationDto;
use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/admin/migrations", tag = "admin",
    responses(
        (status = 200, description = "Applied migration steps, oldest first", body = [MigrationDto]),
        (status = 503, description = "Storage unavailable", body = crate::dto::ErrorDto)
    )
)]
pub async fn list_migrations(State(state): State<AppState>) -> Result<Json<Vec<MigrationDto>>, ApiError> {
    let entries = state.storage.ledger().await?;
    Ok(Json(entries.into_iter().map(MigrationDto::from).collect()))
}
