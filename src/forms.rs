//! Form payloads for the venue, artist and show pages.
//!
//! Forms are read from raw `(name, value)` pairs so repeated `genres` entries
//! survive. Each form keeps the submitted text for re-rendering and exposes a
//! `validate` step that produces the typed input the services persist.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use sea_orm::Set;
use serde::Serialize;
use uuid::Uuid;

use crate::db::dao::{ArtistWithGenres, VenueWithGenres, search::search_key};
use crate::db::entities::{artist, venue};
use crate::error::{AppError, ValidationErrors};

pub type FormPairs = Vec<(String, String)>;

const REQUIRED: &str = "This field is required.";

pub const GENRE_CHOICES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

pub const STATE_CHOICES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

struct Fields<'a>(&'a [(String, String)]);

impl<'a> Fields<'a> {
    fn text(&self, name: &str) -> String {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    fn all(&self, name: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn flag(&self, name: &str) -> bool {
        self.0.iter().any(|(key, value)| {
            key == name
                && !matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "false" | "off" | "0"
                )
        })
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
    }
    trimmed.to_string()
}

fn check_state(errors: &mut ValidationErrors, state: &str) {
    if !state.is_empty() && !STATE_CHOICES.contains(&state) {
        errors.add("state", "Not a valid choice.");
    }
}

/// Drops blanks and repeats, keeping first occurrences in submitted order.
pub fn normalize_genres(raw: &[String]) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for genre in raw {
        let genre = genre.trim();
        if !genre.is_empty() && !genres.iter().any(|existing| existing == genre) {
            genres.push(genre.to_string());
        }
    }
    genres
}

fn check_genres(errors: &mut ValidationErrors, genres: &[String]) {
    if let Some(unknown) = genres
        .iter()
        .find(|genre| !GENRE_CHOICES.contains(&genre.as_str()))
    {
        errors.add("genres", format!("'{unknown}' is not a valid choice."));
    }
}

/// Raw venue form as submitted or as prefilled from a stored venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
}

/// Validated venue fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let fields = Fields(pairs);
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            address: fields.text("address"),
            phone: fields.text("phone"),
            image_link: fields.text("image_link"),
            facebook_link: fields.text("facebook_link"),
            website_link: fields.text("website_link"),
            genres: fields.all("genres"),
            seeking_talent: fields.flag("seeking_talent"),
            seeking_description: fields.text("seeking_description"),
        }
    }

    pub fn from_record(record: &VenueWithGenres) -> Self {
        let venue = &record.venue;
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website_link: venue.website_link.clone().unwrap_or_default(),
            genres: record.genres.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<VenueInput, AppError> {
        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = required(&mut errors, "state", &self.state);
        check_state(&mut errors, &state);
        let address = required(&mut errors, "address", &self.address);
        let genres = normalize_genres(&self.genres);
        check_genres(&mut errors, &genres);

        errors.into_result(VenueInput {
            name,
            city,
            state,
            address,
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            genres,
            seeking_talent: self.seeking_talent,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

impl VenueInput {
    /// Overwrites every column, so an edit is a full-record replacement.
    pub fn apply(&self, active: &mut venue::ActiveModel) {
        active.name = Set(self.name.clone());
        active.search_name = Set(search_key(&self.name));
        active.city = Set(self.city.clone());
        active.state = Set(self.state.clone());
        active.address = Set(self.address.clone());
        active.phone = Set(self.phone.clone());
        active.image_link = Set(self.image_link.clone());
        active.facebook_link = Set(self.facebook_link.clone());
        active.website_link = Set(self.website_link.clone());
        active.seeking_talent = Set(self.seeking_talent);
        active.seeking_description = Set(self.seeking_description.clone());
    }

    pub fn to_active_model(&self) -> venue::ActiveModel {
        let mut active = venue::ActiveModel::default();
        self.apply(&mut active);
        active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website_link: String,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInput {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let fields = Fields(pairs);
        Self {
            name: fields.text("name"),
            city: fields.text("city"),
            state: fields.text("state"),
            phone: fields.text("phone"),
            image_link: fields.text("image_link"),
            facebook_link: fields.text("facebook_link"),
            website_link: fields.text("website_link"),
            genres: fields.all("genres"),
            seeking_venue: fields.flag("seeking_venue"),
            seeking_description: fields.text("seeking_description"),
        }
    }

    pub fn from_record(record: &ArtistWithGenres) -> Self {
        let artist = &record.artist;
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website_link: artist.website_link.clone().unwrap_or_default(),
            genres: record.genres.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<ArtistInput, AppError> {
        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = required(&mut errors, "state", &self.state);
        check_state(&mut errors, &state);
        let genres = normalize_genres(&self.genres);
        check_genres(&mut errors, &genres);

        errors.into_result(ArtistInput {
            name,
            city,
            state,
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website_link: optional(&self.website_link),
            genres,
            seeking_venue: self.seeking_venue,
            seeking_description: optional(&self.seeking_description),
        })
    }
}

impl ArtistInput {
    pub fn apply(&self, active: &mut artist::ActiveModel) {
        active.name = Set(self.name.clone());
        active.search_name = Set(search_key(&self.name));
        active.city = Set(self.city.clone());
        active.state = Set(self.state.clone());
        active.phone = Set(self.phone.clone());
        active.image_link = Set(self.image_link.clone());
        active.facebook_link = Set(self.facebook_link.clone());
        active.website_link = Set(self.website_link.clone());
        active.seeking_venue = Set(self.seeking_venue);
        active.seeking_description = Set(self.seeking_description.clone());
    }

    pub fn to_active_model(&self) -> artist::ActiveModel {
        let mut active = artist::ActiveModel::default();
        self.apply(&mut active);
        active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowInput {
    pub artist_id: Uuid,
    pub venue_id: Uuid,
    pub start_time: DateTime<FixedOffset>,
}

impl ShowForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let fields = Fields(pairs);
        Self {
            artist_id: fields.text("artist_id"),
            venue_id: fields.text("venue_id"),
            start_time: fields.text("start_time"),
        }
    }

    /// Prefills the start time the way the create page suggests it.
    pub fn with_start_time(now: DateTime<FixedOffset>) -> Self {
        Self {
            start_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<ShowInput, AppError> {
        let mut errors = ValidationErrors::new();
        let artist_id = parse_id(&mut errors, "artist_id", &self.artist_id);
        let venue_id = parse_id(&mut errors, "venue_id", &self.venue_id);
        let start_time = match self.start_time.trim() {
            "" => {
                errors.add("start_time", REQUIRED);
                None
            }
            raw => {
                let parsed = parse_start_time(raw);
                if parsed.is_none() {
                    errors.add("start_time", "Not a valid datetime value.");
                }
                parsed
            }
        };

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => {
                Ok(ShowInput {
                    artist_id,
                    venue_id,
                    start_time,
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn parse_id(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "Not a valid id.");
            None
        }
    }
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DD HH:MM[:SS]` (space or `T`), the
/// latter read as UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    NAIVE_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use sea_orm::Set;

    use super::{
        ArtistForm, ShowForm, VenueForm, normalize_genres, parse_start_time,
    };
    use crate::error::AppError;

    fn pairs(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn field_errors(err: AppError) -> Vec<&'static str> {
        match err {
            AppError::Validation(errors) => errors.iter().map(|error| error.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn venue_form_reads_repeated_genres_and_trims_optionals() {
        let form = VenueForm::from_pairs(&pairs(&[
            ("name", "  The Musical Hop "),
            ("city", "San Francisco"),
            ("state", "CA"),
            ("address", "1015 Folsom Street"),
            ("phone", "   "),
            ("genres", "Jazz"),
            ("genres", "Reggae"),
            ("genres", "Jazz"),
            ("seeking_talent", "y"),
            ("seeking_description", "We are on the lookout for a local artist"),
        ]));

        let input = form.validate().expect("form should be valid");
        assert_eq!(input.name, "The Musical Hop");
        assert_eq!(input.phone, None);
        assert_eq!(input.genres, vec!["Jazz".to_string(), "Reggae".to_string()]);
        assert!(input.seeking_talent);
    }

    #[test]
    fn active_model_carries_case_folded_name() {
        let form = ArtistForm::from_pairs(&pairs(&[
            ("name", "Édith Piaf"),
            ("city", "Paris"),
            ("state", "NY"),
            ("genres", "Pop"),
        ]));

        let active = form
            .validate()
            .expect("form should be valid")
            .to_active_model();
        assert_eq!(active.name, Set("Édith Piaf".to_string()));
        assert_eq!(active.search_name, Set("édith piaf".to_string()));
    }

    #[test]
    fn venue_form_reports_every_missing_field() {
        let form = VenueForm::from_pairs(&pairs(&[("name", ""), ("state", "CA")]));

        let fields = field_errors(form.validate().expect_err("form should be rejected"));
        assert_eq!(fields, vec!["name", "city", "address"]);
    }

    #[test]
    fn rejects_unknown_state_and_genre() {
        let form = ArtistForm::from_pairs(&pairs(&[
            ("name", "Guns N Petals"),
            ("city", "San Francisco"),
            ("state", "ZZ"),
            ("genres", "Polka"),
        ]));

        let fields = field_errors(form.validate().expect_err("form should be rejected"));
        assert_eq!(fields, vec!["state", "genres"]);
    }

    #[test]
    fn checkbox_off_values_are_false() {
        for value in ["false", "off", "0"] {
            let form = ArtistForm::from_pairs(&pairs(&[("seeking_venue", value)]));
            assert!(!form.seeking_venue, "{value} should read as unchecked");
        }
        let absent = ArtistForm::from_pairs(&pairs(&[]));
        assert!(!absent.seeking_venue);
    }

    #[test]
    fn show_form_collects_all_errors() {
        let form = ShowForm::from_pairs(&pairs(&[
            ("artist_id", "42"),
            ("start_time", "next friday"),
        ]));

        let fields = field_errors(form.validate().expect_err("form should be rejected"));
        assert_eq!(fields, vec!["artist_id", "venue_id", "start_time"]);
    }

    #[test]
    fn show_form_accepts_valid_submission() {
        let artist_id = uuid::Uuid::new_v4();
        let venue_id = uuid::Uuid::new_v4();
        let form = ShowForm::from_pairs(&pairs(&[
            ("artist_id", &artist_id.to_string()),
            ("venue_id", &venue_id.to_string()),
            ("start_time", "2035-05-21 21:30:00"),
        ]));

        let input = form.validate().expect("form should be valid");
        assert_eq!(input.artist_id, artist_id);
        assert_eq!(input.venue_id, venue_id);
        assert_eq!(
            input.start_time,
            Utc.with_ymd_and_hms(2035, 5, 21, 21, 30, 0)
                .single()
                .expect("timestamp should be valid")
                .fixed_offset()
        );
    }

    #[test]
    fn parses_supported_start_time_formats() {
        let expected = Utc
            .with_ymd_and_hms(2035, 5, 21, 21, 30, 0)
            .single()
            .expect("timestamp should be valid");
        for raw in [
            "2035-05-21T21:30:00Z",
            "2035-05-21T23:30:00+02:00",
            "2035-05-21 21:30:00",
            "2035-05-21T21:30",
            "2035-05-21 21:30",
        ] {
            let parsed = parse_start_time(raw).expect("format should parse");
            assert_eq!(parsed, expected, "{raw}");
        }
        assert!(parse_start_time("21/05/2035").is_none());
    }

    #[test]
    fn normalize_genres_keeps_first_occurrence() {
        let raw = vec![
            "Rock n Roll".to_string(),
            " ".to_string(),
            "Jazz".to_string(),
            "Rock n Roll".to_string(),
        ];
        assert_eq!(
            normalize_genres(&raw),
            vec!["Rock n Roll".to_string(), "Jazz".to_string()]
        );
    }
}
