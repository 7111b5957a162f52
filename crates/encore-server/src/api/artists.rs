use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::{error_response, SearchRequest, WriteResponse};
use encore_booking::catalog::{
    self, ArtistDetail, ArtistListing, ArtistProfile, SearchResults, Summary,
};
use encore_booking::{integrity, ArtistForm, ArtistUpdate, EntityKind, WriteAction};
use encore_db::AppState;

/// GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArtistListing>>, (StatusCode, String)> {
    catalog::list_artists(&state.db)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResults<Summary>>, (StatusCode, String)> {
    catalog::search_artists(&state.db, &body.search_term, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>, (StatusCode, String)> {
    catalog::artist_detail(&state.db, id, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /api/artists/:id/edit
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistProfile>, (StatusCode, String)> {
    catalog::artist_profile(&state.db, id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ArtistForm>,
) -> Result<(StatusCode, Json<WriteResponse>), (StatusCode, String)> {
    let created = integrity::create_artist(&state.db, form)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(WriteResponse::new(
            EntityKind::Artist,
            created.id,
            &created.name,
            WriteAction::Create,
        )),
    ))
}

/// PUT /api/artists/:id
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(update): Json<ArtistUpdate>,
) -> Result<Json<WriteResponse>, (StatusCode, String)> {
    let updated = integrity::update_artist(&state.db, id, update)
        .await
        .map_err(error_response)?;
    Ok(Json(WriteResponse::new(
        EntityKind::Artist,
        updated.id,
        &updated.name,
        WriteAction::Update,
    )))
}

/// DELETE /api/artists/:id
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<WriteResponse>, (StatusCode, String)> {
    let removed = integrity::delete_artist(&state.db, id)
        .await
        .map_err(error_response)?;
    Ok(Json(WriteResponse::new(
        EntityKind::Artist,
        removed.id,
        &removed.name,
        WriteAction::Delete,
    )))
}
