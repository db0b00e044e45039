use async_trait::async_trait;

use crate::error::Result;
use crate::graph::{EventWindow, GraphContext, GraphEvent, GraphVenue, PlaceQuery, VenueBatch};

/// The slice of the Graph API the searches depend on.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Ids of places matching the query around `query.center`, in upstream order.
    async fn search_places(&self, ctx: &GraphContext, query: &PlaceQuery) -> Result<Vec<String>>;

    /// Venue details plus nested events inside `window` for up to 50 ids.
    async fn venues_with_events(
        &self,
        ctx: &GraphContext,
        ids: &[String],
        window: &EventWindow,
    ) -> Result<VenueBatch>;

    /// `id,cover,about,name` of a single venue.
    async fn venue(&self, ctx: &GraphContext, venue_id: &str) -> Result<GraphVenue>;

    /// A single event including its place and location.
    async fn event(&self, ctx: &GraphContext, event_id: &str) -> Result<GraphEvent>;
}
