//! Submitted field values for creating and editing records.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::display::parse_start_time;
use crate::error::BookingError;

/// New venue submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<(), BookingError> {
        require_present(&[
            ("name", &self.name),
            ("city", &self.city),
            ("state", &self.state),
            ("address", &self.address),
            ("phone", &self.phone),
        ])
    }
}

/// New artist submission. Artists have no street address.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<(), BookingError> {
        require_present(&[
            ("name", &self.name),
            ("city", &self.city),
            ("state", &self.state),
            ("phone", &self.phone),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub venue_id: Option<i32>,
    pub artist_id: Option<i32>,
    pub start_time: Option<String>,
}

/// A show submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidShow {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<FixedOffset>,
}

impl ShowForm {
    pub fn validate(&self) -> Result<ValidShow, BookingError> {
        let mut missing = Vec::new();
        if self.venue_id.is_none() {
            missing.push("venue_id");
        }
        if self.artist_id.is_none() {
            missing.push("artist_id");
        }
        let start_time = self.start_time.as_deref().filter(|s| !s.trim().is_empty());
        if start_time.is_none() {
            missing.push("start_time");
        }

        match (self.venue_id, self.artist_id, start_time) {
            (Some(venue_id), Some(artist_id), Some(raw)) => Ok(ValidShow {
                venue_id,
                artist_id,
                start_time: parse_start_time(raw)?,
            }),
            _ => Err(missing_fields(&missing)),
        }
    }
}

/// Edit of an existing venue. `None` leaves a field untouched; see
/// [`crate::merge`] for how supplied values are folded in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

impl VenueUpdate {
    pub fn validate(&self) -> Result<(), BookingError> {
        reject_blank(&[
            ("name", self.name.as_deref()),
            ("city", self.city.as_deref()),
            ("state", self.state.as_deref()),
            ("address", self.address.as_deref()),
            ("phone", self.phone.as_deref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
}

impl ArtistUpdate {
    pub fn validate(&self) -> Result<(), BookingError> {
        reject_blank(&[
            ("name", self.name.as_deref()),
            ("city", self.city.as_deref()),
            ("state", self.state.as_deref()),
            ("phone", self.phone.as_deref()),
        ])
    }
}

/// Blank optional text is stored as `NULL`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing_fields(names: &[&str]) -> BookingError {
    BookingError::ValidationFailed(format!("missing required field(s): {}", names.join(", ")))
}

fn require_present(fields: &[(&str, &String)]) -> Result<(), BookingError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing_fields(&missing))
    }
}

fn reject_blank(fields: &[(&str, Option<&str>)]) -> Result<(), BookingError> {
    let blank: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if blank.is_empty() {
        Ok(())
    } else {
        Err(BookingError::ValidationFailed(format!(
            "required field(s) cannot be blank: {}",
            blank.join(", ")
        )))
    }
}
