use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{error_response, SearchRequest, WriteResponse};
use encore_booking::catalog::{self, SearchResults, ShowListing};
use encore_booking::{integrity, EntityKind, ShowForm, WriteAction};
use encore_db::AppState;

/// GET /api/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListing>>, (StatusCode, String)> {
    catalog::list_shows(&state.db)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/shows/search
///
/// Matches on the performing artist's name.
pub async fn search_shows(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResults<ShowListing>>, (StatusCode, String)> {
    catalog::search_shows(&state.db, &body.search_term)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/shows
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ShowForm>,
) -> Result<(StatusCode, Json<WriteResponse>), (StatusCode, String)> {
    let created = integrity::create_show(&state.db, form)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(WriteResponse::new(
            EntityKind::Show,
            created.id,
            &created.name,
            WriteAction::Create,
        )),
    ))
}
