//! Wire shapes of the Graph API responses this service consumes.

use crate::constants::{EVENT_FIELDS, VENUE_FIELDS};
use crate::types::{Coordinate, Location};
use serde::Deserialize;
use std::collections::HashMap;

/// `{data: [...]}` envelope used by list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceId {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverPhoto {
    pub id: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Picture {
    pub data: Option<PictureData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PictureData {
    pub url: Option<String>,
}

impl Picture {
    pub fn url(&self) -> Option<String> {
        self.data.as_ref().and_then(|d| d.url.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphVenue {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub about: Option<String>,
    pub emails: Option<Vec<String>>,
    pub cover: Option<CoverPhoto>,
    pub picture: Option<Picture>,
    pub location: Option<Location>,
    pub events: Option<Page<GraphEvent>>,
}

impl GraphVenue {
    pub fn cover_source(&self) -> Option<String> {
        self.cover.as_ref().and_then(|c| c.source.clone())
    }

    pub fn picture_url(&self) -> Option<String> {
        self.picture.as_ref().and_then(Picture::url)
    }

    pub fn event_list(&self) -> &[GraphEvent] {
        self.events.as_ref().map(|p| p.data.as_slice()).unwrap_or(&[])
    }
}

/// The `place` an event is attached to
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphPlace {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphEvent {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub cover: Option<CoverPhoto>,
    pub picture: Option<Picture>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub category: Option<String>,
    pub place: Option<GraphPlace>,
    #[serde(default)]
    pub attending_count: u64,
    #[serde(default)]
    pub declined_count: u64,
    #[serde(default)]
    pub maybe_count: u64,
    #[serde(default)]
    pub noreply_count: u64,
}

impl GraphEvent {
    pub fn cover_source(&self) -> Option<String> {
        self.cover.as_ref().and_then(|c| c.source.clone())
    }

    pub fn picture_url(&self) -> Option<String> {
        self.picture.as_ref().and_then(Picture::url)
    }

    pub fn place_location(&self) -> Option<&Location> {
        self.place.as_ref().and_then(|p| p.location.as_ref())
    }
}

/// `/?ids=` answers with an object keyed by venue id
pub type VenueBatch = HashMap<String, GraphVenue>;

/// Version and credential shared by every call of one request
#[derive(Debug, Clone, PartialEq)]
pub struct GraphContext {
    pub version: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub query: String,
    pub center: Coordinate,
    pub distance: u32,
    pub limit: u32,
}

/// Time window applied to the nested events of a batched venue lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub since: i64,
    pub until: Option<i64>,
}

/// `fields` value for the batched venue lookup, with the event window
/// modifiers chained onto the nested `events.fields(..)` edge.
pub fn batch_fields(window: &EventWindow) -> String {
    let mut fields = format!(
        "{},events.fields({}).since({})",
        VENUE_FIELDS.join(","),
        EVENT_FIELDS.join(","),
        window.since
    );
    if let Some(until) = window.until {
        fields.push_str(&format!(".until({until})"));
    }
    fields
}
