use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::app::ports::GraphApi;
use crate::constants::{EVENT_DETAIL_FIELDS, VENUE_DETAIL_FIELDS};
use crate::error::{Result, SearchError};
use crate::graph::{
    batch_fields, EventWindow, GraphContext, GraphEvent, GraphVenue, Page, PlaceId, PlaceQuery,
    VenueBatch,
};

/// `GraphApi` over HTTP with reqwest.
pub struct ReqwestGraph {
    client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestGraph {
    /// `timeout` bounds every single upstream call.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| SearchError::Config(format!("invalid Graph API url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::Config(format!(
                "Graph API url {base_url} cannot carry a path"
            )));
        }
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
        ctx: &GraphContext,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        if let Some(token) = &ctx.access_token {
            params.push(("access_token", token.clone()));
        }
        crate::metrics::upstream::request(endpoint);
        debug!("GET {} ({})", url, endpoint);

        let started = Instant::now();
        let result = self.fetch(&url, &params).await;
        crate::metrics::upstream::duration(endpoint, started.elapsed().as_secs_f64());

        if let Err(e) = &result {
            warn!("{} request failed: {}", endpoint, e);
            crate::metrics::upstream::error(endpoint);
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let payload: Option<Value> = serde_json::from_slice(&bytes).ok();
            let message = payload
                .as_ref()
                .and_then(|p| p["error"]["message"].as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("upstream responded with {status}"));
            return Err(SearchError::Upstream { message, payload });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// The request url carries the access token, so it never makes it into
    /// the error.
    fn transport_error(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else {
            SearchError::Http(e.without_url())
        }
    }

    /// `{base}/{version}/{tail}` with the version and tail each escaped as a
    /// single path segment.
    fn versioned(&self, ctx: &GraphContext, tail: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&ctx.version).push(tail);
        }
        url
    }
}

#[async_trait]
impl GraphApi for ReqwestGraph {
    async fn search_places(&self, ctx: &GraphContext, query: &PlaceQuery) -> Result<Vec<String>> {
        let params = vec![
            ("type", "place".to_string()),
            ("q", query.query.clone()),
            ("center", query.center.to_center_param()),
            ("distance", query.distance.to_string()),
            ("limit", query.limit.to_string()),
            ("fields", "id".to_string()),
        ];
        let page: Page<PlaceId> = self
            .get_json("places", self.versioned(ctx, "search"), ctx, params)
            .await?;
        Ok(page.data.into_iter().map(|p| p.id).collect())
    }

    async fn venues_with_events(
        &self,
        ctx: &GraphContext,
        ids: &[String],
        window: &EventWindow,
    ) -> Result<VenueBatch> {
        let params = vec![("ids", ids.join(",")), ("fields", batch_fields(window))];
        self.get_json("venues_with_events", self.versioned(ctx, ""), ctx, params)
            .await
    }

    async fn venue(&self, ctx: &GraphContext, venue_id: &str) -> Result<GraphVenue> {
        let params = vec![("fields", VENUE_DETAIL_FIELDS.join(","))];
        self.get_json("venue", self.versioned(ctx, venue_id), ctx, params)
            .await
    }

    async fn event(&self, ctx: &GraphContext, event_id: &str) -> Result<GraphEvent> {
        let params = vec![("fields", EVENT_DETAIL_FIELDS.join(","))];
        self.get_json("event", self.versioned(ctx, event_id), ctx, params)
            .await
    }
}
