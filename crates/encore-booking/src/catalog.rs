//! Read-side views: listings, detail pages, search and edit forms.

use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::display::{format_datetime, DateFormat};
use crate::error::{BookingError, EntityKind};
use crate::schedule::{
    artist_schedule, artists_by_id, counterpart, timing_of, venue_schedule, venues_by_id,
    ArtistSlot, Schedule, Timing, VenueSlot,
};
use encore_db::entities::{artist, show, venue};
use encore_db::store;

/// A venue or artist in a listing or search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing a city and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistListing {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<T: Serialize> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> From<Vec<T>> for SearchResults<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Stored venue fields as shown on its page and edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueProfile {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl From<venue::Model> for VenueProfile {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            name: v.name,
            genres: v.genres.0,
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            website: v.website_link,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistProfile {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

impl From<artist::Model> for ArtistProfile {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            genres: a.genres.0,
            city: a.city,
            state: a.state,
            phone: a.phone,
            website: a.website_link,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            image_link: a.image_link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: VenueProfile,
    #[serde(flatten)]
    pub schedule: Schedule<ArtistSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: ArtistProfile,
    #[serde(flatten)]
    pub schedule: Schedule<VenueSlot>,
}

/// Upcoming show count per venue or artist, keyed by `key(show)`.
async fn upcoming_counts<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
    key: fn(&show::Model) -> i32,
) -> Result<HashMap<i32, usize>, BookingError> {
    let mut counts = HashMap::new();
    for show in store::get_all::<show::Entity, _>(conn).await? {
        if timing_of(&show.start_time, now) == Timing::Upcoming {
            *counts.entry(key(&show)).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

fn summarize(id: i32, name: String, counts: &HashMap<i32, usize>) -> Summary {
    Summary {
        id,
        name,
        num_upcoming_shows: counts.get(&id).copied().unwrap_or(0),
    }
}

/// Every venue grouped by area, areas ordered by state then city.
pub async fn list_venues<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<Vec<Area>, BookingError> {
    let venues = store::get_all::<venue::Entity, _>(conn).await?;
    let counts = upcoming_counts(conn, now, |s| s.venue_id).await?;

    let mut areas: BTreeMap<(String, String), Vec<Summary>> = BTreeMap::new();
    for v in venues {
        areas
            .entry((v.state, v.city))
            .or_default()
            .push(summarize(v.id, v.name, &counts));
    }
    Ok(areas
        .into_iter()
        .map(|((state, city), venues)| Area {
            city,
            state,
            venues,
        })
        .collect())
}

pub async fn list_artists<C: ConnectionTrait>(conn: &C) -> Result<Vec<ArtistListing>, BookingError> {
    Ok(store::get_all::<artist::Entity, _>(conn)
        .await?
        .into_iter()
        .map(|a| ArtistListing {
            id: a.id,
            name: a.name,
        })
        .collect())
}

async fn show_listings<C: ConnectionTrait>(
    conn: &C,
    shows: Vec<show::Model>,
) -> Result<Vec<ShowListing>, BookingError> {
    let venues = venues_by_id(conn, shows.iter().map(|s| s.venue_id)).await?;
    let artists = artists_by_id(conn, shows.iter().map(|s| s.artist_id)).await?;

    shows
        .iter()
        .map(|show| {
            let venue = counterpart(&venues, show, EntityKind::Venue, show.venue_id)?;
            let artist = counterpart(&artists, show, EntityKind::Artist, show.artist_id)?;
            Ok(ShowListing {
                venue_id: venue.id,
                venue_name: venue.name.clone(),
                artist_id: artist.id,
                artist_name: artist.name.clone(),
                artist_image_link: artist.image_link.clone(),
                start_time: format_datetime(&show.start_time, DateFormat::Medium),
            })
        })
        .collect()
}

/// Every show, latest start time first.
pub async fn list_shows<C: ConnectionTrait>(conn: &C) -> Result<Vec<ShowListing>, BookingError> {
    let shows = store::order_by_desc::<show::Entity, _>(conn, show::Column::StartTime).await?;
    show_listings(conn, shows).await
}

pub async fn venue_profile<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<VenueProfile, BookingError> {
    store::get_by_id::<venue::Entity, _>(conn, id)
        .await?
        .map(VenueProfile::from)
        .ok_or(BookingError::NotFound {
            kind: EntityKind::Venue,
            id,
        })
}

pub async fn artist_profile<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<ArtistProfile, BookingError> {
    store::get_by_id::<artist::Entity, _>(conn, id)
        .await?
        .map(ArtistProfile::from)
        .ok_or(BookingError::NotFound {
            kind: EntityKind::Artist,
            id,
        })
}

pub async fn venue_detail<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    now: DateTime<Utc>,
) -> Result<VenueDetail, BookingError> {
    let venue = venue_profile(conn, id).await?;
    let schedule = venue_schedule(conn, id, now).await?;
    Ok(VenueDetail { venue, schedule })
}

pub async fn artist_detail<C: ConnectionTrait>(
    conn: &C,
    id: i32,
    now: DateTime<Utc>,
) -> Result<ArtistDetail, BookingError> {
    let artist = artist_profile(conn, id).await?;
    let schedule = artist_schedule(conn, id, now).await?;
    Ok(ArtistDetail { artist, schedule })
}

pub async fn search_venues<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<Summary>, BookingError> {
    let venues =
        store::filter_substring_ci::<venue::Entity, _>(conn, venue::Column::Name, term).await?;
    let counts = upcoming_counts(conn, now, |s| s.venue_id).await?;
    Ok(venues
        .into_iter()
        .map(|v| summarize(v.id, v.name, &counts))
        .collect::<Vec<_>>()
        .into())
}

pub async fn search_artists<C: ConnectionTrait>(
    conn: &C,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<Summary>, BookingError> {
    let artists =
        store::filter_substring_ci::<artist::Entity, _>(conn, artist::Column::Name, term).await?;
    let counts = upcoming_counts(conn, now, |s| s.artist_id).await?;
    Ok(artists
        .into_iter()
        .map(|a| summarize(a.id, a.name, &counts))
        .collect::<Vec<_>>()
        .into())
}

/// Shows whose artist name contains `term`, latest first.
pub async fn search_shows<C: ConnectionTrait>(
    conn: &C,
    term: &str,
) -> Result<SearchResults<ShowListing>, BookingError> {
    let shows = show::Entity::find()
        .join(JoinType::InnerJoin, show::Relation::Artist.def())
        .filter(store::contains_ci(
            (artist::Entity, artist::Column::Name),
            term,
        ))
        .order_by_desc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .all(conn)
        .await?;
    Ok(show_listings(conn, shows).await?.into())
}
