mod common;

use chrono::{Duration, Utc};
use common::{add_artist, add_show, add_venue, artist_form, test_db, venue_form};
use encore_booking::catalog::{
    artist_detail, list_shows, list_venues, search_artists, search_shows, search_venues,
    venue_detail, venue_profile,
};
use encore_booking::{
    create_artist, create_show, create_venue, delete_artist, delete_venue, update_artist,
    update_venue, venue_schedule, ArtistUpdate, BookingError, EntityKind, ShowForm, VenueUpdate,
    WriteAction,
};
use encore_db::entities::{artist, show, venue};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

async fn show_count(db: &sea_orm::DatabaseConnection) -> u64 {
    show::Entity::find().count(db).await.unwrap()
}

// ─── Classification ─────────────────────────────────────────────────

#[tokio::test]
async fn test_venue_schedule_splits_past_and_upcoming() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let petals = add_artist(&db, "Guns N Petals").await;
    add_show(&db, hop, petals, now, Duration::days(-1)).await;
    add_show(&db, hop, petals, now, Duration::days(1)).await;

    let schedule = venue_schedule(&db, hop, now).await.unwrap();
    assert_eq!(schedule.past_shows_count, 1);
    assert_eq!(schedule.upcoming_shows_count, 1);
    assert_eq!(schedule.past_shows[0].artist_name, "Guns N Petals");
    assert_eq!(schedule.upcoming_shows[0].artist_id, petals);
}

#[tokio::test]
async fn test_artist_detail_lists_venues() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let pianos = add_venue(&db, "The Dueling Pianos Bar").await;
    let sax = add_artist(&db, "The Wild Sax Band").await;
    add_show(&db, hop, sax, now, Duration::days(2)).await;
    add_show(&db, pianos, sax, now, Duration::days(3)).await;

    let detail = artist_detail(&db, sax, now).await.unwrap();
    assert_eq!(detail.artist.name, "The Wild Sax Band");
    assert_eq!(detail.schedule.upcoming_shows_count, 2);
    assert_eq!(detail.schedule.past_shows_count, 0);
    let names: Vec<&str> = detail
        .schedule
        .upcoming_shows
        .iter()
        .map(|s| s.venue_name.as_str())
        .collect();
    assert_eq!(names, vec!["The Musical Hop", "The Dueling Pianos Bar"]);
}

#[tokio::test]
async fn test_venue_detail_not_found() {
    let db = test_db().await;
    let err = venue_detail(&db, 42, Utc::now()).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            kind: EntityKind::Venue,
            id: 42
        }
    ));
}

#[tokio::test]
async fn test_dangling_show_is_a_referential_fault() {
    let db = test_db().await;
    let hop = add_venue(&db, "The Musical Hop").await;
    db.execute_unprepared("PRAGMA foreign_keys = OFF").await.unwrap();
    db.execute_unprepared(&format!(
        "INSERT INTO show (venue_id, artist_id, start_time) VALUES ({hop}, 999, '2019-05-21T21:30:00+00:00')"
    ))
    .await
    .unwrap();

    let err = venue_schedule(&db, hop, Utc::now()).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::ReferentialFault {
            kind: EntityKind::Artist,
            id: 999,
            ..
        }
    ));
}

// ─── Creation ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_duplicate_venue_name_is_rejected() {
    let db = test_db().await;
    add_venue(&db, "The Musical Hop").await;
    let err = create_venue(&db, venue_form("The Musical Hop", "Oakland", "CA"))
        .await
        .unwrap_err();
    match err {
        BookingError::IntegrityFailed {
            kind,
            label,
            action,
            ..
        } => {
            assert_eq!(kind, EntityKind::Venue);
            assert_eq!(label, "The Musical Hop");
            assert_eq!(action, WriteAction::Create);
        }
        other => panic!("expected IntegrityFailed, got {other:?}"),
    }
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_artist_name_is_allowed() {
    let db = test_db().await;
    let first = create_artist(&db, artist_form("Matt Quevedo")).await.unwrap();
    let second = create_artist(&db, artist_form("Matt Quevedo")).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(artist::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_blank_optional_links_stored_as_null() {
    let db = test_db().await;
    let mut form = venue_form("Park Square Live Music & Coffee", "San Francisco", "CA");
    form.facebook_link = Some(String::new());
    form.website_link = Some("  ".into());
    let created = create_venue(&db, form).await.unwrap();

    let profile = venue_profile(&db, created.id).await.unwrap();
    assert_eq!(profile.facebook_link, None);
    assert_eq!(profile.website, None);
    assert_eq!(profile.genres, vec!["Jazz", "Folk"]);
}

#[tokio::test]
async fn test_invalid_venue_form_writes_nothing() {
    let db = test_db().await;
    let mut form = venue_form("The Musical Hop", "San Francisco", "CA");
    form.phone = String::new();
    let err = create_venue(&db, form).await.unwrap_err();
    assert!(matches!(err, BookingError::ValidationFailed(_)));
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_show_with_missing_venue_is_rejected() {
    let db = test_db().await;
    let petals = add_artist(&db, "Guns N Petals").await;
    let form = ShowForm {
        venue_id: Some(77),
        artist_id: Some(petals),
        start_time: Some("2035-04-01 20:00:00".into()),
    };
    let err = create_show(&db, form).await.unwrap_err();
    match err {
        BookingError::IntegrityFailed { kind, reason, .. } => {
            assert_eq!(kind, EntityKind::Show);
            assert!(reason.contains("venue 77"), "{reason}");
        }
        other => panic!("expected IntegrityFailed, got {other:?}"),
    }
    assert_eq!(show_count(&db).await, 0);
}

// ─── Editing ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_venue_keeps_link_when_blank() {
    let db = test_db().await;
    let hop = add_venue(&db, "The Musical Hop").await;
    let update = VenueUpdate {
        city: Some("Oakland".into()),
        facebook_link: Some(String::new()),
        ..Default::default()
    };
    let updated = update_venue(&db, hop, update).await.unwrap();
    assert_eq!(updated.city, "Oakland");
    assert_eq!(
        updated.facebook_link.as_deref(),
        Some("https://www.facebook.com/venue")
    );
}

#[tokio::test]
async fn test_update_artist_replaces_link() {
    let db = test_db().await;
    let id = add_artist(&db, "Guns N Petals").await;
    let update = ArtistUpdate {
        facebook_link: Some("https://www.facebook.com/GunsNPetals".into()),
        genres: Some(vec!["Rock n Roll".into(), "Blues".into()]),
        ..Default::default()
    };
    let updated = update_artist(&db, id, update).await.unwrap();
    assert_eq!(
        updated.facebook_link.as_deref(),
        Some("https://www.facebook.com/GunsNPetals")
    );
    assert_eq!(updated.genres.as_slice(), ["Rock n Roll", "Blues"]);
}

#[tokio::test]
async fn test_update_missing_artist_is_not_found() {
    let db = test_db().await;
    let err = update_artist(&db, 5, ArtistUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            kind: EntityKind::Artist,
            id: 5
        }
    ));
}

#[tokio::test]
async fn test_rename_venue_onto_existing_name_fails() {
    let db = test_db().await;
    add_venue(&db, "The Musical Hop").await;
    let pianos = add_venue(&db, "The Dueling Pianos Bar").await;
    let update = VenueUpdate {
        name: Some("The Musical Hop".into()),
        ..Default::default()
    };
    let err = update_venue(&db, pianos, update).await.unwrap_err();
    assert!(matches!(err, BookingError::IntegrityFailed { .. }));
    let profile = venue_profile(&db, pianos).await.unwrap();
    assert_eq!(profile.name, "The Dueling Pianos Bar");
}

#[tokio::test]
async fn test_rename_venue_onto_padded_existing_name_fails() {
    let db = test_db().await;
    add_venue(&db, "The Musical Hop").await;
    let pianos = add_venue(&db, "The Dueling Pianos Bar").await;
    let update = VenueUpdate {
        name: Some(" The Musical Hop ".into()),
        ..Default::default()
    };
    let err = update_venue(&db, pianos, update).await.unwrap_err();
    match err {
        BookingError::IntegrityFailed { label, action, .. } => {
            assert_eq!(label, "The Musical Hop");
            assert_eq!(action, WriteAction::Update);
        }
        other => panic!("expected IntegrityFailed, got {other:?}"),
    }
    let profile = venue_profile(&db, pianos).await.unwrap();
    assert_eq!(profile.name, "The Dueling Pianos Bar");
}

#[tokio::test]
async fn test_update_trims_overwritten_text() {
    let db = test_db().await;
    let id = add_artist(&db, "Guns N Petals").await;
    let update = ArtistUpdate {
        name: Some("  Guns N Roses ".into()),
        city: Some(" Oakland".into()),
        ..Default::default()
    };
    let updated = update_artist(&db, id, update).await.unwrap();
    assert_eq!(updated.name, "Guns N Roses");
    assert_eq!(updated.city, "Oakland");
}

// ─── Cascade delete ─────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_venue_removes_its_shows() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let pianos = add_venue(&db, "The Dueling Pianos Bar").await;
    let petals = add_artist(&db, "Guns N Petals").await;
    add_show(&db, hop, petals, now, Duration::days(-3)).await;
    add_show(&db, hop, petals, now, Duration::days(4)).await;
    add_show(&db, pianos, petals, now, Duration::days(5)).await;

    let removed = delete_venue(&db, hop).await.unwrap();
    assert_eq!(removed.name, "The Musical Hop");
    assert_eq!(removed.shows_removed, 2);
    assert_eq!(removed.rows_removed(), 3);
    assert_eq!(show_count(&db).await, 1);
    assert!(venue::Entity::find_by_id(hop).one(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_artist_twice_is_not_found() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let sax = add_artist(&db, "The Wild Sax Band").await;
    for days in [1, 2, 3] {
        add_show(&db, hop, sax, now, Duration::days(days)).await;
    }

    let removed = delete_artist(&db, sax).await.unwrap();
    assert_eq!(removed.shows_removed, 3);
    assert_eq!(show_count(&db).await, 0);

    let err = delete_artist(&db, sax).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            kind: EntityKind::Artist,
            ..
        }
    ));
}

#[tokio::test]
async fn test_failed_delete_rolls_back_shows() {
    let db = test_db().await;
    let now = Utc::now();
    let locked = add_venue(&db, "Locked Hall").await;
    let petals = add_artist(&db, "Guns N Petals").await;
    add_show(&db, locked, petals, now, Duration::days(1)).await;
    add_show(&db, locked, petals, now, Duration::days(2)).await;
    db.execute_unprepared(
        "CREATE TRIGGER venue_locked BEFORE DELETE ON venue \
         WHEN OLD.name = 'Locked Hall' \
         BEGIN SELECT RAISE(ABORT, 'venue is locked'); END;",
    )
    .await
    .unwrap();

    let err = delete_venue(&db, locked).await.unwrap_err();
    match err {
        BookingError::IntegrityFailed {
            kind,
            label,
            action,
            ..
        } => {
            assert_eq!(kind, EntityKind::Venue);
            assert_eq!(label, "Locked Hall");
            assert_eq!(action, WriteAction::Delete);
        }
        other => panic!("expected IntegrityFailed, got {other:?}"),
    }
    assert_eq!(show_count(&db).await, 2);
    assert!(venue::Entity::find_by_id(locked)
        .one(&db)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_failed_commit_surfaces_integrity_failure() {
    let db = test_db().await;
    // Deferred constraint: the insert succeeds, COMMIT is rejected.
    for sql in [
        "CREATE TABLE audit_parent (id INTEGER PRIMARY KEY)",
        "CREATE TABLE venue_audit (parent_id INTEGER REFERENCES audit_parent(id) DEFERRABLE INITIALLY DEFERRED)",
        "CREATE TRIGGER venue_audited AFTER INSERT ON venue \
         BEGIN INSERT INTO venue_audit (parent_id) VALUES (999); END;",
    ] {
        db.execute_unprepared(sql).await.unwrap();
    }

    let err = create_venue(&db, venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap_err();
    match err {
        BookingError::IntegrityFailed {
            kind,
            label,
            action,
            ..
        } => {
            assert_eq!(kind, EntityKind::Venue);
            assert_eq!(label, "The Musical Hop");
            assert_eq!(action, WriteAction::Create);
        }
        other => panic!("expected IntegrityFailed, got {other:?}"),
    }
    assert_eq!(venue::Entity::find().count(&db).await.unwrap(), 0);
}

// ─── Listings and search ────────────────────────────────────────────

#[tokio::test]
async fn test_list_venues_groups_by_area_with_own_counts() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = create_venue(&db, venue_form("The Musical Hop", "San Francisco", "CA"))
        .await
        .unwrap()
        .id;
    create_venue(&db, venue_form("The Dueling Pianos Bar", "New York", "NY"))
        .await
        .unwrap();
    let park = create_venue(&db, venue_form("Park Square", "San Francisco", "CA"))
        .await
        .unwrap()
        .id;
    let petals = add_artist(&db, "Guns N Petals").await;
    add_show(&db, hop, petals, now, Duration::days(1)).await;
    add_show(&db, hop, petals, now, Duration::days(2)).await;
    add_show(&db, park, petals, now, Duration::days(-2)).await;

    let areas = list_venues(&db, now).await.unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!((areas[0].state.as_str(), areas[0].city.as_str()), ("CA", "San Francisco"));
    assert_eq!((areas[1].state.as_str(), areas[1].city.as_str()), ("NY", "New York"));
    let counts: Vec<(&str, usize)> = areas[0]
        .venues
        .iter()
        .map(|v| (v.name.as_str(), v.num_upcoming_shows))
        .collect();
    assert_eq!(counts, vec![("The Musical Hop", 2), ("Park Square", 0)]);
}

#[tokio::test]
async fn test_list_shows_latest_first() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let petals = add_artist(&db, "Guns N Petals").await;
    let quevedo = add_artist(&db, "Matt Quevedo").await;
    add_show(&db, hop, petals, now, Duration::days(-10)).await;
    add_show(&db, hop, quevedo, now, Duration::days(10)).await;

    let shows = list_shows(&db).await.unwrap();
    let artists: Vec<&str> = shows.iter().map(|s| s.artist_name.as_str()).collect();
    assert_eq!(artists, vec!["Matt Quevedo", "Guns N Petals"]);
    assert_eq!(shows[0].venue_name, "The Musical Hop");
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let db = test_db().await;
    let now = Utc::now();
    add_venue(&db, "The Musical Hop").await;
    add_venue(&db, "Park Square Live Music & Coffee").await;
    add_venue(&db, "The Dueling Pianos Bar").await;
    add_artist(&db, "Guns N Petals").await;
    add_artist(&db, "The Wild Sax Band").await;

    let venues = search_venues(&db, "MUSIC", now).await.unwrap();
    assert_eq!(venues.count, 2);
    assert_eq!(venues.data.len(), 2);

    let artists = search_artists(&db, "SAX", now).await.unwrap();
    assert_eq!(artists.count, 1);
    assert_eq!(artists.data[0].name, "The Wild Sax Band");

    let none = search_venues(&db, "100%", now).await.unwrap();
    assert_eq!(none.count, 0);
}

#[tokio::test]
async fn test_search_shows_by_artist_name() {
    let db = test_db().await;
    let now = Utc::now();
    let hop = add_venue(&db, "The Musical Hop").await;
    let petals = add_artist(&db, "Guns N Petals").await;
    let sax = add_artist(&db, "The Wild Sax Band").await;
    add_show(&db, hop, petals, now, Duration::days(1)).await;
    add_show(&db, hop, sax, now, Duration::days(2)).await;
    add_show(&db, hop, sax, now, Duration::days(3)).await;

    let results = search_shows(&db, "sax").await.unwrap();
    assert_eq!(results.count, 2);
    assert!(results
        .data
        .iter()
        .all(|s| s.artist_name == "The Wild Sax Band"));
}
