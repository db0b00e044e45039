use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, error, info, instrument};

use crate::app::ports::GraphApi;
use crate::constants::BATCH_ID_LIMIT;
use crate::error::{Result, SearchError};
use crate::graph::{EventWindow, GraphContext, PlaceQuery, VenueBatch};
use crate::normalize::normalize_venue_event;
use crate::sort::sort_events;
use crate::types::{Coordinate, EventsResponse, NormalizedEvent, SearchParameters};

/// Splits place ids into groups the `/?ids=` endpoint accepts.
pub fn batch_ids(ids: &[String], size: usize) -> Vec<Vec<String>> {
    ids.chunks(size.max(1)).map(<[String]>::to_vec).collect()
}

/// Location search: places around each point, their upcoming events,
/// normalized and merged into one list.
pub struct EventSearch {
    graph: Arc<dyn GraphApi>,
    params: SearchParameters,
    deadline: Option<Duration>,
}

impl EventSearch {
    pub fn new(graph: Arc<dyn GraphApi>, params: SearchParameters) -> Self {
        Self {
            graph,
            params,
            deadline: None,
        }
    }

    /// Bounds the whole search, every coordinate pair included.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn params(&self) -> &SearchParameters {
        &self.params
    }

    #[instrument(skip(self), fields(points = self.params.coordinates.len(), sort = ?self.params.sort))]
    pub async fn search(&self) -> Result<EventsResponse> {
        if self.params.coordinates.is_empty() {
            let err = SearchError::MissingCoordinates;
            error!("{}", err.to_body());
            crate::metrics::search::failed("location");
            return Err(err);
        }

        let now_secs = chrono::Utc::now().timestamp();
        let outcome = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.collect(now_secs))
                .await
                .unwrap_or_else(|_| Err(SearchError::Timeout(deadline))),
            None => self.collect(now_secs).await,
        };

        match outcome {
            Ok(events) => {
                info!("Search returned {} events", events.len());
                crate::metrics::search::completed("location", events.len());
                Ok(EventsResponse { events })
            }
            Err(e) => {
                error!("{}", e.to_body());
                crate::metrics::search::failed("location");
                Err(e)
            }
        }
    }

    async fn collect(&self, now_secs: i64) -> Result<Vec<NormalizedEvent>> {
        let per_point = try_join_all(
            self.params
                .coordinates
                .iter()
                .map(|point| self.search_point(*point, now_secs)),
        )
        .await?;

        let mut events: Vec<NormalizedEvent> = per_point.into_iter().flatten().collect();
        sort_events(&mut events, self.params.sort);
        Ok(events)
    }

    async fn search_point(&self, point: Coordinate, now_secs: i64) -> Result<Vec<NormalizedEvent>> {
        let ctx = GraphContext {
            version: self.params.version.clone(),
            access_token: self.params.access_token.clone(),
        };
        let query = PlaceQuery {
            query: self.params.query.clone(),
            center: point,
            distance: self.params.distance,
            limit: self.params.limit,
        };
        let window = EventWindow {
            since: self.params.since,
            until: self.params.until,
        };

        let place_ids = self.graph.search_places(&ctx, &query).await?;
        let batches = batch_ids(&place_ids, BATCH_ID_LIMIT);
        debug!(
            "{} places near {} in {} batches",
            place_ids.len(),
            point.to_center_param(),
            batches.len()
        );

        let results = try_join_all(
            batches
                .iter()
                .map(|batch| self.graph.venues_with_events(&ctx, batch, &window)),
        )
        .await?;

        let mut events = Vec::new();
        for (batch, venues) in batches.iter().zip(results.iter()) {
            flatten_batch(batch, venues, point, now_secs, &mut events);
        }
        Ok(events)
    }
}

/// Venues come out in the order they were requested; keys the upstream
/// answered with but we never asked for follow in sorted order.
fn flatten_batch(
    requested: &[String],
    venues: &VenueBatch,
    origin: Coordinate,
    now_secs: i64,
    out: &mut Vec<NormalizedEvent>,
) {
    let mut extra: Vec<&String> = venues.keys().filter(|k| !requested.contains(k)).collect();
    extra.sort();

    for venue_id in requested.iter().chain(extra) {
        let Some(venue) = venues.get(venue_id) else {
            continue;
        };
        for event in venue.event_list() {
            out.push(normalize_venue_event(venue_id, venue, event, origin, now_secs));
        }
    }
}
