pub mod config;
pub mod constants;
pub mod error;
pub mod geo;
pub mod graph;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod schema;
pub mod server;
pub mod sort;
pub mod types;

// Use cases and the ports they depend on
pub mod app;
// Adapters implementing those ports
pub mod infra;

pub use app::{EventSearch, IdSearch};
pub use error::{Result, SearchError};
pub use types::{EventsResponse, NormalizedEvent, SearchParameters, SortKey};
