use crate::constants::DISTANCE_SCALE;
use crate::geo;
use crate::graph::{GraphEvent, GraphVenue};
use crate::types::{Coordinate, EventStats, Location, NormalizedEvent, VenueSummary};
use chrono::{DateTime, NaiveDate};

/// Scaled, rounded haversine distance between a location and the query
/// point. `None` when either side has no usable coordinates.
pub fn scaled_distance(location: Option<&Location>, origin: Option<Coordinate>) -> Option<u64> {
    let from = location.and_then(Location::coordinate)?;
    let to = origin?;
    let scaled = (geo::distance(from, to, false) * DISTANCE_SCALE).round();
    if scaled.is_finite() {
        Some(scaled as u64)
    } else {
        None
    }
}

/// Upstream start times come as `2017-03-04T20:00:00-0800`, as RFC 3339, or
/// as a bare date for all-day events (read as UTC midnight).
pub fn parse_start_millis(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Whole seconds from `now_secs` until the event starts, rounded away from
/// zero so that any start in the past is negative and any in the future
/// positive.
pub fn seconds_from_now(start_time: Option<&str>, now_secs: i64) -> Option<i64> {
    let diff_ms = parse_start_millis(start_time?)? - now_secs * 1000;
    Some(if diff_ms > 0 {
        (diff_ms + 999) / 1000
    } else {
        diff_ms.div_euclid(1000)
    })
}

/// Normalizes one nested event of a venue from the batched lookup.
/// Distance is measured from the venue's own location.
pub fn normalize_venue_event(
    venue_id: &str,
    venue: &GraphVenue,
    event: &GraphEvent,
    origin: Coordinate,
    now_secs: i64,
) -> NormalizedEvent {
    let summary = VenueSummary {
        id: venue_id.to_string(),
        name: venue.name.clone(),
        about: venue.about.clone(),
        emails: venue.emails.clone(),
        cover_picture: venue.cover_source(),
        profile_picture: venue.picture_url(),
        location: venue.location.clone(),
    };
    let distance = scaled_distance(venue.location.as_ref(), Some(origin));
    build_event(event, summary, distance, now_secs)
}

/// Normalizes an event fetched by id together with its separately fetched
/// venue. Location and distance come from the event's place, and the venue
/// endpoint's emails and picture are not requested.
pub fn normalize_event_with_venue(
    venue: &GraphVenue,
    event: &GraphEvent,
    origin: Option<Coordinate>,
    now_secs: i64,
) -> NormalizedEvent {
    let location = event.place_location().cloned();
    let summary = VenueSummary {
        id: venue.id.clone().unwrap_or_default(),
        name: venue.name.clone(),
        about: venue.about.clone(),
        emails: None,
        cover_picture: venue.cover_source(),
        profile_picture: None,
        location: location.clone(),
    };
    let distance = scaled_distance(location.as_ref(), origin);
    build_event(event, summary, distance, now_secs)
}

fn build_event(
    event: &GraphEvent,
    venue: VenueSummary,
    distance: Option<u64>,
    now_secs: i64,
) -> NormalizedEvent {
    NormalizedEvent {
        id: event.id.clone(),
        name: event.name.clone(),
        event_type: event.event_type.clone(),
        cover_picture: event.cover_source(),
        profile_picture: event.picture_url(),
        description: event.description.clone(),
        distance,
        start_time: event.start_time.clone(),
        end_time: event.end_time.clone(),
        time_from_now: seconds_from_now(event.start_time.as_deref(), now_secs),
        category: event.category.clone(),
        stats: EventStats {
            attending: event.attending_count,
            declined: event.declined_count,
            maybe: event.maybe_count,
            noreply: event.noreply_count,
        },
        venue,
    }
}
