//! Past/upcoming classification of shows.
//!
//! Classification is derived on every read from a caller-supplied `now` and
//! never persisted. A show starting exactly at `now` counts as past.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::display::{format_datetime, DateFormat};
use crate::error::{BookingError, EntityKind};
use encore_db::entities::{artist, show, venue};
use encore_db::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

pub fn timing_of(start_time: &DateTime<FixedOffset>, now: DateTime<Utc>) -> Timing {
    if start_time.with_timezone(&Utc) > now {
        Timing::Upcoming
    } else {
        Timing::Past
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule<T> {
    pub past_shows: Vec<T>,
    pub upcoming_shows: Vec<T>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Partition `shows` around `now`, keeping their input order.
pub fn classify<T, I>(now: DateTime<Utc>, shows: I) -> Schedule<T>
where
    I: IntoIterator<Item = (DateTime<FixedOffset>, T)>,
{
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for (start_time, entry) in shows {
        match timing_of(&start_time, now) {
            Timing::Past => past_shows.push(entry),
            Timing::Upcoming => upcoming_shows.push(entry),
        }
    }
    Schedule {
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    }
}

/// A show as listed on a venue page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSlot {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// A show as listed on an artist page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueSlot {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

fn unique_ids(ids: impl Iterator<Item = i32>) -> Vec<i32> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

pub(crate) async fn artists_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl Iterator<Item = i32>,
) -> Result<HashMap<i32, artist::Model>, BookingError> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(artist::Entity::find()
        .filter(artist::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect())
}

pub(crate) async fn venues_by_id<C: ConnectionTrait>(
    conn: &C,
    ids: impl Iterator<Item = i32>,
) -> Result<HashMap<i32, venue::Model>, BookingError> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(venue::Entity::find()
        .filter(venue::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect())
}

/// Resolve the counterpart of `show`, failing on a dangling reference.
pub(crate) fn counterpart<'a, M>(
    index: &'a HashMap<i32, M>,
    show: &show::Model,
    kind: EntityKind,
    id: i32,
) -> Result<&'a M, BookingError> {
    index.get(&id).ok_or(BookingError::ReferentialFault {
        show_id: show.id,
        kind,
        id,
    })
}

/// Shows hosted by a venue, each labelled with its artist.
pub async fn venue_schedule<C: ConnectionTrait>(
    conn: &C,
    venue_id: i32,
    now: DateTime<Utc>,
) -> Result<Schedule<ArtistSlot>, BookingError> {
    let shows =
        store::filter_by_foreign_key::<show::Entity, _>(conn, show::Column::VenueId, venue_id)
            .await?;
    let artists = artists_by_id(conn, shows.iter().map(|s| s.artist_id)).await?;

    let mut entries = Vec::with_capacity(shows.len());
    for show in &shows {
        let artist = counterpart(&artists, show, EntityKind::Artist, show.artist_id)?;
        entries.push((
            show.start_time,
            ArtistSlot {
                artist_id: artist.id,
                artist_name: artist.name.clone(),
                artist_image_link: artist.image_link.clone(),
                start_time: format_datetime(&show.start_time, DateFormat::Medium),
            },
        ));
    }
    Ok(classify(now, entries))
}

/// Shows played by an artist, each labelled with its venue.
pub async fn artist_schedule<C: ConnectionTrait>(
    conn: &C,
    artist_id: i32,
    now: DateTime<Utc>,
) -> Result<Schedule<VenueSlot>, BookingError> {
    let shows =
        store::filter_by_foreign_key::<show::Entity, _>(conn, show::Column::ArtistId, artist_id)
            .await?;
    let venues = venues_by_id(conn, shows.iter().map(|s| s.venue_id)).await?;

    let mut entries = Vec::with_capacity(shows.len());
    for show in &shows {
        let venue = counterpart(&venues, show, EntityKind::Venue, show.venue_id)?;
        entries.push((
            show.start_time,
            VenueSlot {
                venue_id: venue.id,
                venue_name: venue.name.clone(),
                venue_image_link: venue.image_link.clone(),
                start_time: format_datetime(&show.start_time, DateFormat::Medium),
            },
        ));
    }
    Ok(classify(now, entries))
}
