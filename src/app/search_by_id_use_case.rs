use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, error, info, instrument};

use crate::app::ports::GraphApi;
use crate::error::{Result, SearchError};
use crate::graph::GraphContext;
use crate::normalize::normalize_event_with_venue;
use crate::sort::sort_events;
use crate::types::{EventsResponse, IdPair, IdSearchParameters, NormalizedEvent};

/// Fetches explicit venue/event pairs, skipping the place lookup.
pub struct IdSearch {
    graph: Arc<dyn GraphApi>,
    params: IdSearchParameters,
    deadline: Option<Duration>,
}

impl IdSearch {
    pub fn new(graph: Arc<dyn GraphApi>, params: IdSearchParameters) -> Self {
        Self {
            graph,
            params,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[instrument(skip(self), fields(pairs = self.params.pairs.len(), sort = ?self.params.sort))]
    pub async fn search_by_id(&self) -> Result<EventsResponse> {
        if self.params.pairs.is_empty() {
            let err = SearchError::MissingVenueIds;
            error!("{}", err.to_body());
            crate::metrics::search::failed("ids");
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
                info!("Id search returned {} events", events.len());
                crate::metrics::search::completed("ids", events.len());
                Ok(EventsResponse { events })
            }
            Err(e) => {
                error!("{}", e.to_body());
                crate::metrics::search::failed("ids");
                Err(e)
            }
        }
    }

    async fn collect(&self, now_secs: i64) -> Result<Vec<NormalizedEvent>> {
        let ctx = GraphContext {
            version: self.params.version.clone(),
            access_token: self.params.access_token.clone(),
        };
        let mut events = try_join_all(
            self.params
                .pairs
                .iter()
                .map(|pair| self.fetch_pair(&ctx, pair, now_secs)),
        )
        .await?;

        sort_events(&mut events, self.params.sort);
        Ok(events)
    }

    async fn fetch_pair(
        &self,
        ctx: &GraphContext,
        pair: &IdPair,
        now_secs: i64,
    ) -> Result<NormalizedEvent> {
        let mut venue = self.graph.venue(ctx, &pair.venue_id).await?;
        venue.id.get_or_insert_with(|| pair.venue_id.clone());
        let event = self.graph.event(ctx, &pair.event_id).await?;
        debug!("Fetched event {} at venue {}", event.id, pair.venue_id);
        Ok(normalize_event_with_venue(
            &venue,
            &event,
            self.params.origin,
            now_secs,
        ))
    }
}
