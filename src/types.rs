use crate::constants::{DEFAULT_DISTANCE, DEFAULT_LIMIT, DEFAULT_VERSION};
use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat,lng` as the Graph API `center` parameter expects it
    pub fn to_center_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Parses a flat `lat,lng,lat,lng,...` list. A trailing unpaired element is
/// dropped; pairs with an unparsable number are skipped.
pub fn parse_coordinate_list(raw: &str) -> Vec<Coordinate> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    parts
        .chunks_exact(2)
        .filter_map(|pair| match (pair[0].parse::<f64>(), pair[1].parse::<f64>()) {
            (Ok(lat), Ok(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate::new(lat, lng))
            }
            _ => {
                warn!("Skipping invalid coordinate pair {:?}", pair);
                None
            }
        })
        .collect()
}

/// Splits a comma-separated id list, dropping blanks.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Time,
    Distance,
    Venue,
    Popularity,
}

impl SortKey {
    /// Case-insensitive lookup. Anything outside the allowed set means
    /// "unsorted" rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "time" => Some(SortKey::Time),
            "distance" => Some(SortKey::Distance),
            "venue" => Some(SortKey::Venue),
            "popularity" => Some(SortKey::Popularity),
            other => {
                debug!("Ignoring unknown sort key '{}'", other);
                None
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Time => "time",
            SortKey::Distance => "distance",
            SortKey::Venue => "venue",
            SortKey::Popularity => "popularity",
        }
    }
}

/// Raw options as they arrive from a query string or the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub lat_lan_array: Option<String>,
    pub distance: Option<f64>,
    pub limit: Option<f64>,
    pub query: Option<String>,
    pub sort: Option<String>,
    pub version: Option<String>,
    pub since: Option<i64>,
    pub until: Option<i64>,
    pub access_token: Option<String>,
}

/// Validated parameters of a location search.
///
/// Defaults: version `v2.8`, distance 100, limit 100, `since` = now,
/// `until` unbounded, unsorted.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub coordinates: Vec<Coordinate>,
    pub distance: u32,
    pub limit: u32,
    pub query: String,
    pub sort: Option<SortKey>,
    pub version: String,
    pub since: i64,
    pub until: Option<i64>,
    pub access_token: Option<String>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            coordinates: Vec::new(),
            distance: DEFAULT_DISTANCE,
            limit: DEFAULT_LIMIT,
            query: String::new(),
            sort: None,
            version: DEFAULT_VERSION.to_string(),
            since: chrono::Utc::now().timestamp(),
            until: None,
            access_token: None,
        }
    }
}

impl SearchParameters {
    /// Builds parameters from raw options. `default_token` is the
    /// process-wide token the caller read from its environment.
    ///
    /// `latLanArray` wins over `lat`/`lng`; the single pair is only a fallback.
    pub fn from_options(options: SearchOptions, default_token: Option<String>) -> Self {
        let coordinates = match options.lat_lan_array.as_deref() {
            Some(list) if !list.trim().is_empty() => parse_coordinate_list(list),
            _ => single_coordinate(options.lat, options.lng).into_iter().collect(),
        };
        let defaults = Self::default();

        Self {
            coordinates,
            distance: positive_or(options.distance, defaults.distance),
            limit: positive_or(options.limit, defaults.limit),
            query: options.query.unwrap_or_default(),
            sort: options.sort.as_deref().and_then(SortKey::parse),
            version: non_empty(options.version).unwrap_or(defaults.version),
            since: options.since.unwrap_or(defaults.since),
            until: options.until,
            access_token: non_empty(options.access_token).or(default_token),
        }
    }
}

/// Raw options for the ID-based search.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdSearchOptions {
    pub venue_id_array: Option<String>,
    pub event_id_array: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub sort: Option<String>,
    pub version: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdPair {
    pub venue_id: String,
    pub event_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdSearchParameters {
    pub pairs: Vec<IdPair>,
    /// Point distances are measured from; without one every distance is null
    pub origin: Option<Coordinate>,
    pub sort: Option<SortKey>,
    pub version: String,
    pub access_token: Option<String>,
}

impl IdSearchParameters {
    /// Zips the two id lists positionally. Lists of different length are
    /// rejected before any upstream call.
    pub fn from_id_lists(venue_ids: Vec<String>, event_ids: Vec<String>) -> Result<Self> {
        if venue_ids.is_empty() {
            return Err(SearchError::MissingVenueIds);
        }
        if venue_ids.len() != event_ids.len() {
            return Err(SearchError::MismatchedIds {
                venues: venue_ids.len(),
                events: event_ids.len(),
            });
        }
        let pairs = venue_ids
            .into_iter()
            .zip(event_ids)
            .map(|(venue_id, event_id)| IdPair { venue_id, event_id })
            .collect();

        Ok(Self {
            pairs,
            origin: None,
            sort: None,
            version: DEFAULT_VERSION.to_string(),
            access_token: None,
        })
    }

    /// Venue ids are checked first, then the token, then the list lengths.
    pub fn from_options(options: IdSearchOptions, default_token: Option<String>) -> Result<Self> {
        let venue_ids = options
            .venue_id_array
            .as_deref()
            .map(parse_id_list)
            .unwrap_or_default();
        if venue_ids.is_empty() {
            return Err(SearchError::MissingVenueIds);
        }
        let access_token = non_empty(options.access_token)
            .or(default_token)
            .ok_or(SearchError::MissingAccessToken)?;
        let event_ids = options
            .event_id_array
            .as_deref()
            .map(parse_id_list)
            .unwrap_or_default();

        let mut params = Self::from_id_lists(venue_ids, event_ids)?;
        params.origin = single_coordinate(options.lat, options.lng);
        params.sort = options.sort.as_deref().and_then(SortKey::parse);
        if let Some(version) = non_empty(options.version) {
            params.version = version;
        }
        params.access_token = Some(access_token);
        Ok(params)
    }
}

fn single_coordinate(lat: Option<f64>, lng: Option<f64>) -> Option<Coordinate> {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            Some(Coordinate::new(lat, lng))
        }
        _ => None,
    }
}

/// Positive values are rounded up to whole units; anything else falls back.
fn positive_or(value: Option<f64>, default: u32) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.ceil().min(u32::MAX as f64) as u32,
        _ => default,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Location object attached to a venue or an event's place
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Any other keys upstream sent (`region`, `located_in`, ...), passed through as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Location {
    pub fn coordinate(&self) -> Option<Coordinate> {
        single_coordinate(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStats {
    pub attending: u64,
    pub declined: u64,
    pub maybe: u64,
    pub noreply: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    pub id: String,
    pub name: String,
    pub about: Option<String>,
    pub emails: Option<Vec<String>>,
    pub cover_picture: Option<String>,
    pub profile_picture: Option<String>,
    pub location: Option<Location>,
}

/// One event of the response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub cover_picture: Option<String>,
    pub profile_picture: Option<String>,
    pub description: Option<String>,
    pub distance: Option<u64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub time_from_now: Option<i64>,
    pub category: Option<String>,
    pub stats: EventStats,
    pub venue: VenueSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<NormalizedEvent>,
}
