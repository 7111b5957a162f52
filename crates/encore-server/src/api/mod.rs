pub mod artists;
pub mod shows;
pub mod venues;

use axum::http::StatusCode;
use encore_booking::{BookingError, EntityKind, WriteAction};
use serde::{Deserialize, Serialize};

/// Body of the three search endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// Returned by every successful write.
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub id: i32,
    pub message: String,
}

impl WriteResponse {
    pub fn new(kind: EntityKind, id: i32, name: &str, action: WriteAction) -> Self {
        let message = match (kind, action) {
            (EntityKind::Show, WriteAction::Create) => "Show was successfully listed!".to_string(),
            (_, WriteAction::Delete) => format!("{kind} {name} was successfully deleted."),
            _ => format!("{kind} {name} was successfully {action}!"),
        };
        Self { id, message }
    }
}

/// Map a booking failure onto the handler error tuple.
pub fn error_response(err: BookingError) -> (StatusCode, String) {
    let status = match &err {
        BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
        BookingError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::IntegrityFailed { .. } => StatusCode::CONFLICT,
        BookingError::ReferentialFault { .. } | BookingError::Database(_) => {
            tracing::error!("{err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
