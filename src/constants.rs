/// Graph API defaults used when a request leaves an option unset

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_VERSION: &str = "v2.8";
pub const DEFAULT_DISTANCE: u32 = 100;
pub const DEFAULT_LIMIT: u32 = 100;

/// The Graph API accepts at most this many ids per `/?ids=` call
pub const BATCH_ID_LIMIT: usize = 50;

/// Scale applied to the haversine kilometres before rounding into the
/// `distance` field of an event.
pub const DISTANCE_SCALE: f64 = 100_000.0;

// Environment variables read once at startup
pub const ACCESS_TOKEN_ENV: &str = "FEBL_ACCESS_TOKEN";
pub const CORS_WHITELIST_ENV: &str = "FEBL_CORS_WHITELIST";
pub const GRAPH_URL_ENV: &str = "FEBL_GRAPH_URL";
pub const UPSTREAM_TIMEOUT_ENV: &str = "FEBL_UPSTREAM_TIMEOUT_SECS";
pub const REQUEST_DEADLINE_ENV: &str = "FEBL_REQUEST_DEADLINE_SECS";
pub const METRICS_PORT_ENV: &str = "FEBL_METRICS_PORT";

/// Fields requested for each nested event in the batched venue lookup
pub const EVENT_FIELDS: &[&str] = &[
    "id",
    "type",
    "name",
    "cover.fields(id,source)",
    "picture.type(large)",
    "description",
    "start_time",
    "end_time",
    "category",
    "place",
    "attending_count",
    "declined_count",
    "maybe_count",
    "noreply_count",
];

/// Venue fields requested in the batched lookup; `events.fields(..)` is appended
pub const VENUE_FIELDS: &[&str] = &[
    "id",
    "name",
    "about",
    "emails",
    "cover.fields(id,source)",
    "picture.type(large)",
    "location",
];

/// Fields for the single venue lookup of the ID-based search
pub const VENUE_DETAIL_FIELDS: &[&str] = &["id", "cover", "about", "name"];

/// Fields for the single event lookup of the ID-based search
pub const EVENT_DETAIL_FIELDS: &[&str] = &[
    "id",
    "type",
    "name",
    "cover.fields(id,source)",
    "picture.type(large)",
    "description",
    "start_time",
    "end_time",
    "category",
    "attending_count",
    "declined_count",
    "maybe_count",
    "noreply_count",
    "place",
];
