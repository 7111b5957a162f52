//! Booking error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The three record kinds the booking core manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Venue => "Venue",
            EntityKind::Artist => "Artist",
            EntityKind::Show => "Show",
        })
    }
}

/// Which write was attempted, worded the way listings talk about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteAction::Create => "listed",
            WriteAction::Update => "updated",
            WriteAction::Delete => "deleted",
        })
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i32 },

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// A write or commit failed and the transaction was rolled back.
    #[error("{kind} {label} could not be {action}: {reason}")]
    IntegrityFailed {
        kind: EntityKind,
        label: String,
        action: WriteAction,
        reason: String,
    },

    /// A show points at a venue or artist that no longer resolves.
    #[error("show {show_id} references missing {kind} {id}")]
    ReferentialFault {
        show_id: i32,
        kind: EntityKind,
        id: i32,
    },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl BookingError {
    pub fn integrity(
        kind: EntityKind,
        label: impl Into<String>,
        action: WriteAction,
        reason: impl fmt::Display,
    ) -> Self {
        BookingError::IntegrityFailed {
            kind,
            label: label.into(),
            action,
            reason: reason.to_string(),
        }
    }
}
