//! Read-side aggregation: grouping venues by area, partitioning shows against
//! an explicit `now`, and shaping search results.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use crate::db::entities::{show, venue};

/// Anything with a start time that can be split into past and upcoming.
pub trait Scheduled {
    fn start_time(&self) -> DateTime<FixedOffset>;
}

impl Scheduled for show::Model {
    fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }
}

pub fn is_upcoming(start_time: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    start_time > now
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowPartition<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> ShowPartition<T> {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Splits `shows` in one pass: `start_time <= now` is past, later is
/// upcoming. Input order is kept within each side.
pub fn partition_shows<T: Scheduled>(shows: Vec<T>, now: DateTime<FixedOffset>) -> ShowPartition<T> {
    let (upcoming, past) = shows
        .into_iter()
        .partition(|show| is_upcoming(show.start_time(), now));
    ShowPartition { past, upcoming }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaVenue {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: String,
    pub venues: Vec<AreaVenue>,
}

/// One group per distinct (city, state), sorted by city then state; venues
/// inside a group sorted by name then id.
pub fn group_venues_by_area(
    venues: Vec<venue::Model>,
    upcoming: &HashMap<Uuid, usize>,
) -> Vec<VenueArea> {
    let mut areas: BTreeMap<(String, String), Vec<AreaVenue>> = BTreeMap::new();
    for venue in venues {
        areas
            .entry((venue.city, venue.state))
            .or_default()
            .push(AreaVenue {
                id: venue.id,
                num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
                name: venue.name,
            });
    }

    areas
        .into_iter()
        .map(|((city, state), mut venues)| {
            venues.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            VenueArea {
                city,
                state,
                venues,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResults {
    pub fn from_matches<I>(matches: I, upcoming: &HashMap<Uuid, usize>) -> Self
    where
        I: IntoIterator<Item = (Uuid, String)>,
    {
        let data: Vec<SearchHit> = matches
            .into_iter()
            .map(|(id, name)| SearchHit {
                id,
                name,
                num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
            })
            .collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, Duration, FixedOffset, TimeZone};
    use uuid::Uuid;

    use super::{SearchResults, group_venues_by_area, partition_shows};
    use crate::db::entities::{show, venue};

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2030, 6, 1, 12, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn show_at(id: u128, venue_id: Uuid, start_time: DateTime<FixedOffset>) -> show::Model {
        show::Model {
            id: Uuid::from_u128(id),
            created_at: now(),
            updated_at: now(),
            artist_id: Uuid::from_u128(900),
            venue_id,
            start_time,
        }
    }

    fn venue(id: u128, name: &str, city: &str, state: &str) -> venue::Model {
        venue::Model {
            id: Uuid::from_u128(id),
            created_at: now(),
            updated_at: now(),
            name: name.to_string(),
            search_name: name.to_lowercase(),
            city: city.to_string(),
            state: state.to_string(),
            address: "1 Main Street".to_string(),
            phone: None,
            image_link: None,
            facebook_link: None,
            website_link: None,
            seeking_talent: false,
            seeking_description: None,
        }
    }

    #[test]
    fn partition_is_exhaustive_and_disjoint() {
        let venue_id = Uuid::from_u128(1);
        let shows = vec![
            show_at(1, venue_id, now() - Duration::days(3)),
            show_at(2, venue_id, now()),
            show_at(3, venue_id, now() + Duration::seconds(1)),
            show_at(4, venue_id, now() + Duration::days(30)),
        ];

        let partition = partition_shows(shows, now());

        let past: Vec<u128> = partition.past.iter().map(|show| show.id.as_u128()).collect();
        let upcoming: Vec<u128> = partition
            .upcoming
            .iter()
            .map(|show| show.id.as_u128())
            .collect();
        assert_eq!(past, vec![1, 2]);
        assert_eq!(upcoming, vec![3, 4]);
        assert_eq!(partition.past_count() + partition.upcoming_count(), 4);
    }

    #[test]
    fn partition_moves_with_now() {
        let venue_id = Uuid::from_u128(1);
        let start = now() + Duration::hours(1);
        let shows = vec![show_at(1, venue_id, start)];

        assert_eq!(partition_shows(shows.clone(), now()).upcoming_count(), 1);
        assert_eq!(partition_shows(shows, start).past_count(), 1);
    }

    #[test]
    fn groups_venues_by_city_and_state() {
        let venues = vec![
            venue(3, "C", "San Francisco", "CA"),
            venue(2, "B", "New York", "NY"),
            venue(1, "A", "New York", "NY"),
        ];
        let counts = HashMap::from([(Uuid::from_u128(2), 5)]);

        let areas = group_venues_by_area(venues, &counts);

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "New York");
        let names: Vec<&str> = areas[0].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(areas[0].venues[1].num_upcoming_shows, 5);
        assert_eq!(areas[1].state, "CA");
        assert_eq!(areas[1].venues.len(), 1);
    }

    #[test]
    fn same_city_in_two_states_stays_apart() {
        let venues = vec![
            venue(1, "A", "Portland", "OR"),
            venue(2, "B", "Portland", "ME"),
        ];

        let areas = group_venues_by_area(venues, &HashMap::new());
        let states: Vec<&str> = areas.iter().map(|area| area.state.as_str()).collect();
        assert_eq!(states, vec!["ME", "OR"]);
    }

    #[test]
    fn search_results_count_matches_data() {
        let id = Uuid::from_u128(7);
        let results = SearchResults::from_matches(
            vec![(id, "The Musical Hop".to_string())],
            &HashMap::from([(id, 1)]),
        );
        assert_eq!(results.count, 1);
        assert_eq!(results.data[0].num_upcoming_shows, 1);
    }
}
