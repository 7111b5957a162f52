use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::{error_response, SearchRequest, WriteResponse};
use encore_booking::catalog::{self, Area, SearchResults, Summary, VenueDetail, VenueProfile};
use encore_booking::{integrity, EntityKind, VenueForm, VenueUpdate, WriteAction};
use encore_db::AppState;

/// GET /api/venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Area>>, (StatusCode, String)> {
    catalog::list_venues(&state.db, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResults<Summary>>, (StatusCode, String)> {
    catalog::search_venues(&state.db, &body.search_term, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/venues/:id
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>, (StatusCode, String)> {
    catalog::venue_detail(&state.db, id, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/venues/:id/edit
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueProfile>, (StatusCode, String)> {
    catalog::venue_profile(&state.db, id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Json(form): Json<VenueForm>,
) -> Result<(StatusCode, Json<WriteResponse>), (StatusCode, String)> {
    let created = integrity::create_venue(&state.db, form)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(WriteResponse::new(
            EntityKind::Venue,
            created.id,
            &created.name,
            WriteAction::Create,
        )),
    ))
}

/// PUT /api/venues/:id
pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(update): Json<VenueUpdate>,
) -> Result<Json<WriteResponse>, (StatusCode, String)> {
    let updated = integrity::update_venue(&state.db, id, update)
        .await
        .map_err(error_response)?;
    Ok(Json(WriteResponse::new(
        EntityKind::Venue,
        updated.id,
        &updated.name,
        WriteAction::Update,
    )))
}

/// DELETE /api/venues/:id
///
/// Removes the venue together with every show it hosts.
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<WriteResponse>, (StatusCode, String)> {
    let removed = integrity::delete_venue(&state.db, id)
        .await
        .map_err(error_response)?;
    Ok(Json(WriteResponse::new(
        EntityKind::Venue,
        removed.id,
        &removed.name,
        WriteAction::Delete,
    )))
}
