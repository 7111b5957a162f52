//! Write paths: create, edit and cascade delete.
//!
//! Every write runs in its own transaction and ends in exactly one commit or
//! one rollback. Store errors raised inside the transaction surface as
//! [`BookingError::IntegrityFailed`] after the rollback.

use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, PrimaryKeyTrait,
    TransactionTrait,
};
use serde::Serialize;

use crate::error::{BookingError, EntityKind, WriteAction};
use crate::forms::{optional_text, ArtistForm, ArtistUpdate, ShowForm, VenueForm, VenueUpdate};
use crate::merge::{merge_artist, merge_venue};
use encore_db::entities::{artist, show, venue, Genres};
use encore_db::store;

/// A newly listed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub kind: EntityKind,
    pub id: i32,
    pub name: String,
}

/// Outcome of a cascade delete: the entity row plus `shows_removed` show rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removed {
    pub kind: EntityKind,
    pub id: i32,
    pub name: String,
    pub shows_removed: u64,
}

impl Removed {
    pub fn rows_removed(&self) -> u64 {
        self.shows_removed + 1
    }
}

/// What a transaction is writing, for error reporting.
struct Target<'a> {
    kind: EntityKind,
    action: WriteAction,
    label: &'a str,
}

impl Target<'_> {
    fn failed(&self, reason: impl std::fmt::Display) -> BookingError {
        BookingError::integrity(self.kind, self.label, self.action, reason)
    }
}

async fn begin(db: &DatabaseConnection, target: &Target<'_>) -> Result<DatabaseTransaction, BookingError> {
    db.begin().await.map_err(|e| target.failed(e))
}

/// Commit on success; otherwise roll back and report.
async fn settle<T>(
    txn: DatabaseTransaction,
    outcome: Result<T, BookingError>,
    target: &Target<'_>,
) -> Result<T, BookingError> {
    match outcome {
        Ok(value) => {
            if let Err(e) = txn.commit().await {
                tracing::warn!(
                    kind = %target.kind,
                    label = target.label,
                    action = %target.action,
                    "commit failed: {e}"
                );
                return Err(target.failed(e));
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = txn.rollback().await {
                tracing::error!(kind = %target.kind, label = target.label, "rollback failed: {e}");
            }
            tracing::warn!(
                kind = %target.kind,
                label = target.label,
                action = %target.action,
                "transaction rolled back: {err}"
            );
            Err(match err {
                BookingError::Database(e) => target.failed(e),
                other => other,
            })
        }
    }
}

pub async fn create_venue(db: &DatabaseConnection, form: VenueForm) -> Result<Created, BookingError> {
    form.validate()?;
    let name = form.name.trim().to_string();
    let target = Target {
        kind: EntityKind::Venue,
        action: WriteAction::Create,
        label: &name,
    };

    let record = venue::ActiveModel {
        id: NotSet,
        name: Set(name.clone()),
        city: Set(form.city.trim().to_string()),
        state: Set(form.state.trim().to_string()),
        address: Set(form.address.trim().to_string()),
        phone: Set(form.phone.trim().to_string()),
        genres: Set(Genres(form.genres)),
        facebook_link: Set(optional_text(form.facebook_link)),
        image_link: Set(optional_text(form.image_link)),
        website_link: Set(optional_text(form.website_link)),
        seeking_talent: Set(form.seeking_talent),
        seeking_description: Set(optional_text(form.seeking_description)),
    };

    let txn = begin(db, &target).await?;
    let outcome = store::insert(&txn, record).await.map_err(BookingError::from);
    let created = settle(txn, outcome, &target).await?;

    tracing::info!(venue_id = created.id, name = %created.name, "venue listed");
    Ok(Created {
        kind: EntityKind::Venue,
        id: created.id,
        name: created.name,
    })
}

pub async fn create_artist(
    db: &DatabaseConnection,
    form: ArtistForm,
) -> Result<Created, BookingError> {
    form.validate()?;
    let name = form.name.trim().to_string();
    let target = Target {
        kind: EntityKind::Artist,
        action: WriteAction::Create,
        label: &name,
    };

    let record = artist::ActiveModel {
        id: NotSet,
        name: Set(name.clone()),
        city: Set(form.city.trim().to_string()),
        state: Set(form.state.trim().to_string()),
        phone: Set(form.phone.trim().to_string()),
        genres: Set(Genres(form.genres)),
        facebook_link: Set(optional_text(form.facebook_link)),
        image_link: Set(optional_text(form.image_link)),
        website_link: Set(optional_text(form.website_link)),
        seeking_venue: Set(form.seeking_venue),
        seeking_description: Set(optional_text(form.seeking_description)),
    };

    let txn = begin(db, &target).await?;
    let outcome = store::insert(&txn, record).await.map_err(BookingError::from);
    let created = settle(txn, outcome, &target).await?;

    tracing::info!(artist_id = created.id, name = %created.name, "artist listed");
    Ok(Created {
        kind: EntityKind::Artist,
        id: created.id,
        name: created.name,
    })
}

/// Book an artist at a venue.
///
/// Both ids are checked inside the transaction so a dangling reference fails
/// with `IntegrityFailed` whether or not the store enforces foreign keys.
pub async fn create_show(db: &DatabaseConnection, form: ShowForm) -> Result<Created, BookingError> {
    let show = form.validate()?;
    let label = format!("venue {} / artist {}", show.venue_id, show.artist_id);
    let target = Target {
        kind: EntityKind::Show,
        action: WriteAction::Create,
        label: &label,
    };

    let txn = begin(db, &target).await?;
    let outcome: Result<_, BookingError> = async {
        if store::get_by_id::<venue::Entity, _>(&txn, show.venue_id)
            .await?
            .is_none()
        {
            return Err(target.failed(format!("venue {} does not exist", show.venue_id)));
        }
        if store::get_by_id::<artist::Entity, _>(&txn, show.artist_id)
            .await?
            .is_none()
        {
            return Err(target.failed(format!("artist {} does not exist", show.artist_id)));
        }
        let record = show::ActiveModel {
            id: NotSet,
            venue_id: Set(show.venue_id),
            artist_id: Set(show.artist_id),
            start_time: Set(show.start_time),
        };
        Ok(store::insert(&txn, record).await?)
    }
    .await;
    let created = settle(txn, outcome, &target).await?;

    tracing::info!(
        show_id = created.id,
        venue_id = created.venue_id,
        artist_id = created.artist_id,
        "show listed"
    );
    Ok(Created {
        kind: EntityKind::Show,
        id: created.id,
        name: label,
    })
}

pub async fn update_venue(
    db: &DatabaseConnection,
    id: i32,
    update: VenueUpdate,
) -> Result<venue::Model, BookingError> {
    update.validate()?;
    let label = update
        .name
        .as_deref()
        .map(str::trim)
        .map_or_else(|| id.to_string(), String::from);
    let target = Target {
        kind: EntityKind::Venue,
        action: WriteAction::Update,
        label: &label,
    };

    let txn = begin(db, &target).await?;
    let outcome: Result<_, BookingError> = async {
        let stored = store::get_by_id::<venue::Entity, _>(&txn, id)
            .await?
            .ok_or(BookingError::NotFound {
                kind: EntityKind::Venue,
                id,
            })?;
        Ok(store::update(&txn, merge_venue(stored, update)).await?)
    }
    .await;
    let updated = settle(txn, outcome, &target).await?;

    tracing::info!(venue_id = id, name = %updated.name, "venue updated");
    Ok(updated)
}

pub async fn update_artist(
    db: &DatabaseConnection,
    id: i32,
    update: ArtistUpdate,
) -> Result<artist::Model, BookingError> {
    update.validate()?;
    let label = update
        .name
        .as_deref()
        .map(str::trim)
        .map_or_else(|| id.to_string(), String::from);
    let target = Target {
        kind: EntityKind::Artist,
        action: WriteAction::Update,
        label: &label,
    };

    let txn = begin(db, &target).await?;
    let outcome: Result<_, BookingError> = async {
        let stored = store::get_by_id::<artist::Entity, _>(&txn, id)
            .await?
            .ok_or(BookingError::NotFound {
                kind: EntityKind::Artist,
                id,
            })?;
        Ok(store::update(&txn, merge_artist(stored, update)).await?)
    }
    .await;
    let updated = settle(txn, outcome, &target).await?;

    tracing::info!(artist_id = id, name = %updated.name, "artist updated");
    Ok(updated)
}

/// Delete every show referencing `id` through `column`, one row at a time.
async fn remove_dependent_shows<C: ConnectionTrait>(
    conn: &C,
    column: show::Column,
    id: i32,
) -> Result<u64, DbErr> {
    let shows = store::filter_by_foreign_key::<show::Entity, _>(conn, column, id).await?;
    let mut removed = 0;
    for show in &shows {
        removed += store::delete::<show::Entity, _>(conn, show.id).await?;
    }
    Ok(removed)
}

/// Shows first, then the entity they depend on, in one transaction.
async fn delete_with_shows<E>(
    db: &DatabaseConnection,
    kind: EntityKind,
    id: i32,
    dependents: show::Column,
    name_of: fn(&E::Model) -> String,
) -> Result<Removed, BookingError>
where
    E: EntityTrait,
    i32: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    let id_label = id.to_string();
    let lookup = Target {
        kind,
        action: WriteAction::Delete,
        label: &id_label,
    };

    let txn = begin(db, &lookup).await?;
    let record = match store::get_by_id::<E, _>(&txn, id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return settle(txn, Err(BookingError::NotFound { kind, id }), &lookup).await;
        }
        Err(e) => return settle(txn, Err(e.into()), &lookup).await,
    };

    let name = name_of(&record);
    let target = Target {
        kind,
        action: WriteAction::Delete,
        label: &name,
    };
    let outcome: Result<_, BookingError> = async {
        let shows_removed = remove_dependent_shows(&txn, dependents, id).await?;
        if store::delete::<E, _>(&txn, id).await? == 0 {
            return Err(target.failed(format!("{kind} {id} disappeared during delete")));
        }
        Ok(shows_removed)
    }
    .await;
    let shows_removed = settle(txn, outcome, &target).await?;

    tracing::info!(%kind, id, name = %name, shows_removed, "deleted with dependent shows");
    Ok(Removed {
        kind,
        id,
        name,
        shows_removed,
    })
}

pub async fn delete_venue(db: &DatabaseConnection, id: i32) -> Result<Removed, BookingError> {
    delete_with_shows::<venue::Entity>(db, EntityKind::Venue, id, show::Column::VenueId, |v| {
        v.name.clone()
    })
    .await
}

pub async fn delete_artist(db: &DatabaseConnection, id: i32) -> Result<Removed, BookingError> {
    delete_with_shows::<artist::Entity>(db, EntityKind::Artist, id, show::Column::ArtistId, |a| {
        a.name.clone()
    })
    .await
}
