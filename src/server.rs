use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::ports::GraphApi;
use crate::app::{EventSearch, IdSearch};
use crate::error::SearchError;
use crate::schema::events_response_schema;
use crate::types::{IdSearchOptions, IdSearchParameters, SearchOptions, SearchParameters};

/// Per-process state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<dyn GraphApi>,
    /// Read once from the environment at startup
    pub default_access_token: Option<String>,
    pub request_deadline: Duration,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_body())).into_response()
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn schema() -> Result<Json<serde_json::Value>, SearchError> {
    Ok(Json(events_response_schema()?))
}

async fn events(
    State(state): State<AppState>,
    Query(options): Query<SearchOptions>,
) -> Response {
    let params = SearchParameters::from_options(options, state.default_access_token.clone());
    let search = EventSearch::new(state.graph.clone(), params).with_deadline(state.request_deadline);
    match search.search().await {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn events_by_ids(
    State(state): State<AppState>,
    Query(options): Query<IdSearchOptions>,
) -> Response {
    let params = match IdSearchParameters::from_options(options, state.default_access_token.clone())
    {
        Ok(params) => params,
        Err(e) => return e.into_response(),
    };
    let search = IdSearch::new(state.graph.clone(), params).with_deadline(state.request_deadline);
    match search.search_by_id().await {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

fn cors_layer(whitelist: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET]).allow_headers(Any);
    if whitelist.is_empty() {
        return cors.allow_origin(Any);
    }
    info!("Using CORS whitelist of {:?}", whitelist);
    let origins: Vec<HeaderValue> = whitelist
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState, cors_whitelist: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/schema", get(schema))
        .route("/events", get(events))
        .route("/eventsbyids", get(events_by_ids))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_whitelist)),
        )
}

/// Start the HTTP server on the given address
pub async fn start_server(
    state: AppState,
    cors_whitelist: &[String],
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let app = create_server(state, cors_whitelist);

    info!("HTTP server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
