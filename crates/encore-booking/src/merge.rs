//! How an edit is folded into a stored venue or artist.
//!
//! Every editable profile field has a [`MergeRule`] in [`MERGE_POLICY`].
//! Link fields and the seeking description follow keep-if-blank: an empty
//! submission means "leave it as it is", never "clear it".

use sea_orm::ActiveValue::Set;

use crate::forms::{ArtistUpdate, VenueUpdate};
use encore_db::entities::{artist, venue, Genres};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// A supplied value replaces the stored one.
    Overwrite,
    /// A supplied non-empty value replaces the stored one; an empty one is ignored.
    KeepIfBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    City,
    State,
    Address,
    Phone,
    Genres,
    Seeking,
    FacebookLink,
    ImageLink,
    WebsiteLink,
    SeekingDescription,
}

/// Shared by venues and artists; `Address` only exists on venues and
/// `Seeking` is `seeking_talent` or `seeking_venue`.
pub const MERGE_POLICY: &[(ProfileField, MergeRule)] = &[
    (ProfileField::Name, MergeRule::Overwrite),
    (ProfileField::City, MergeRule::Overwrite),
    (ProfileField::State, MergeRule::Overwrite),
    (ProfileField::Address, MergeRule::Overwrite),
    (ProfileField::Phone, MergeRule::Overwrite),
    (ProfileField::Genres, MergeRule::Overwrite),
    (ProfileField::Seeking, MergeRule::Overwrite),
    (ProfileField::FacebookLink, MergeRule::KeepIfBlank),
    (ProfileField::ImageLink, MergeRule::KeepIfBlank),
    (ProfileField::WebsiteLink, MergeRule::KeepIfBlank),
    (ProfileField::SeekingDescription, MergeRule::KeepIfBlank),
];

pub fn rule_for(field: ProfileField) -> MergeRule {
    MERGE_POLICY
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, rule)| *rule)
        .unwrap_or(MergeRule::Overwrite)
}

/// Merge a `NOT NULL` text column. Overwritten values are trimmed, the
/// same as on create.
pub fn merge_text(field: ProfileField, stored: String, incoming: Option<String>) -> String {
    match (rule_for(field), incoming) {
        (_, None) => stored,
        (MergeRule::KeepIfBlank, Some(value)) if value.is_empty() => stored,
        (MergeRule::Overwrite, Some(value)) => value.trim().to_string(),
        (MergeRule::KeepIfBlank, Some(value)) => value,
    }
}

/// Merge a nullable text column. Under `Overwrite` an empty value clears it.
pub fn merge_optional_text(
    field: ProfileField,
    stored: Option<String>,
    incoming: Option<String>,
) -> Option<String> {
    match (rule_for(field), incoming) {
        (_, None) => stored,
        (MergeRule::KeepIfBlank, Some(value)) if value.is_empty() => stored,
        (MergeRule::Overwrite, Some(value)) if value.is_empty() => None,
        (_, Some(value)) => Some(value),
    }
}

fn merge_genres(stored: Genres, incoming: Option<Vec<String>>) -> Genres {
    incoming.map(Genres::from).unwrap_or(stored)
}

pub fn merge_venue(stored: venue::Model, update: VenueUpdate) -> venue::ActiveModel {
    use ProfileField::*;

    let mut active: venue::ActiveModel = stored.clone().into();
    active.name = Set(merge_text(Name, stored.name, update.name));
    active.city = Set(merge_text(City, stored.city, update.city));
    active.state = Set(merge_text(State, stored.state, update.state));
    active.address = Set(merge_text(Address, stored.address, update.address));
    active.phone = Set(merge_text(Phone, stored.phone, update.phone));
    active.genres = Set(merge_genres(stored.genres, update.genres));
    active.facebook_link = Set(merge_optional_text(
        FacebookLink,
        stored.facebook_link,
        update.facebook_link,
    ));
    active.image_link = Set(merge_optional_text(
        ImageLink,
        stored.image_link,
        update.image_link,
    ));
    active.website_link = Set(merge_optional_text(
        WebsiteLink,
        stored.website_link,
        update.website_link,
    ));
    active.seeking_talent = Set(update.seeking_talent.unwrap_or(stored.seeking_talent));
    active.seeking_description = Set(merge_optional_text(
        SeekingDescription,
        stored.seeking_description,
        update.seeking_description,
    ));
    active
}

pub fn merge_artist(stored: artist::Model, update: ArtistUpdate) -> artist::ActiveModel {
    use ProfileField::*;

    let mut active: artist::ActiveModel = stored.clone().into();
    active.name = Set(merge_text(Name, stored.name, update.name));
    active.city = Set(merge_text(City, stored.city, update.city));
    active.state = Set(merge_text(State, stored.state, update.state));
    active.phone = Set(merge_text(Phone, stored.phone, update.phone));
    active.genres = Set(merge_genres(stored.genres, update.genres));
    active.facebook_link = Set(merge_optional_text(
        FacebookLink,
        stored.facebook_link,
        update.facebook_link,
    ));
    active.image_link = Set(merge_optional_text(
        ImageLink,
        stored.image_link,
        update.image_link,
    ));
    active.website_link = Set(merge_optional_text(
        WebsiteLink,
        stored.website_link,
        update.website_link,
    ));
    active.seeking_venue = Set(update.seeking_venue.unwrap_or(stored.seeking_venue));
    active.seeking_description = Set(merge_optional_text(
        SeekingDescription,
        stored.seeking_description,
        update.seeking_description,
    ));
    active
}
