//! Encore booking core
//!
//! Venues host shows, artists play them. This crate owns the rules around
//! that relationship: which shows are past or upcoming, how edits are merged
//! into stored profiles, and how deletes cascade through dependent shows
//! inside a single transaction.

pub mod catalog;
pub mod display;
pub mod error;
pub mod forms;
pub mod integrity;
pub mod merge;
pub mod schedule;

pub use catalog::{
    Area, ArtistDetail, ArtistListing, ArtistProfile, SearchResults, ShowListing, Summary,
    VenueDetail, VenueProfile,
};
pub use display::{format_datetime, parse_start_time, DateFormat};
pub use error::{BookingError, EntityKind, WriteAction};
pub use forms::{ArtistForm, ArtistUpdate, ShowForm, VenueForm, VenueUpdate};
pub use integrity::{
    create_artist, create_show, create_venue, delete_artist, delete_venue, update_artist,
    update_venue, Created, Removed,
};
pub use merge::{MergeRule, ProfileField, MERGE_POLICY};
pub use schedule::{artist_schedule, classify, venue_schedule, ArtistSlot, Schedule, Timing, VenueSlot};
