// Shared fixtures for booking integration tests
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use encore_booking::{
    create_artist, create_show, create_venue, ArtistForm, ShowForm, VenueForm,
};
use encore_db::{connect, DatabaseConfig};
use encore_migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

/// Fresh in-memory database with the full schema applied.
pub async fn test_db() -> DatabaseConnection {
    let db = connect(&DatabaseConfig::single("sqlite::memory:"))
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
    VenueForm {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: "1015 Folsom Street".to_string(),
        phone: "123-123-1234".to_string(),
        genres: vec!["Jazz".to_string(), "Folk".to_string()],
        facebook_link: Some("https://www.facebook.com/venue".to_string()),
        seeking_talent: true,
        ..Default::default()
    }
}

pub fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        phone: "326-123-5000".to_string(),
        genres: vec!["Rock n Roll".to_string()],
        ..Default::default()
    }
}

pub async fn add_venue(db: &DatabaseConnection, name: &str) -> i32 {
    create_venue(db, venue_form(name, "San Francisco", "CA"))
        .await
        .expect("create venue")
        .id
}

pub async fn add_artist(db: &DatabaseConnection, name: &str) -> i32 {
    create_artist(db, artist_form(name))
        .await
        .expect("create artist")
        .id
}

/// Book a show starting `offset` away from `now`.
pub async fn add_show(
    db: &DatabaseConnection,
    venue_id: i32,
    artist_id: i32,
    now: DateTime<Utc>,
    offset: Duration,
) -> i32 {
    let form = ShowForm {
        venue_id: Some(venue_id),
        artist_id: Some(artist_id),
        start_time: Some((now + offset).to_rfc3339_opts(SecondsFormat::Secs, true)),
    };
    create_show(db, form).await.expect("create show").id
}
