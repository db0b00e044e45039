use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use events_by_location::app::ports::GraphApi;
use events_by_location::config::AppConfig;
use events_by_location::infra::ReqwestGraph;
use events_by_location::server::{start_server, AppState};
use events_by_location::types::{IdSearchOptions, IdSearchParameters, SearchOptions, SearchParameters};
use events_by_location::{logging, metrics, EventSearch, EventsResponse, IdSearch};

#[derive(Parser)]
#[command(name = "events-by-location")]
#[command(about = "Upcoming events of venues near one or more locations")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Expose Prometheus metrics on FEBL_METRICS_PORT
        #[arg(long)]
        metrics: bool,
    },
    /// Run one location search and print the JSON result
    Search {
        /// Flat list of coordinates: lat,lng[,lat,lng...]
        #[arg(long, allow_hyphen_values = true)]
        lat_lng: String,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        distance: Option<f64>,
        #[arg(long)]
        limit: Option<f64>,
        /// time, distance, venue or popularity
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        since: Option<i64>,
        #[arg(long)]
        until: Option<i64>,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        access_token: Option<String>,
    },
    /// Fetch explicit venue/event pairs and print the JSON result
    SearchById {
        /// Comma-separated venue ids
        #[arg(long)]
        venue_ids: String,
        /// Comma-separated event ids, matched to venue ids by position
        #[arg(long)]
        event_ids: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<f64>,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        version: Option<String>,
        #[arg(long)]
        access_token: Option<String>,
    },
}

fn build_graph(config: &AppConfig) -> anyhow::Result<Arc<dyn GraphApi>> {
    let graph = ReqwestGraph::new(&config.graph.base_url, config.graph.upstream_timeout())
        .context("failed to build Graph API client")?;
    Ok(Arc::new(graph))
}

fn print_events(response: &EventsResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _log_guard = logging::init_logging("logs");

    let graph = build_graph(&config)?;
    let default_token = config.graph.access_token.clone();
    let deadline = config.graph.request_deadline();

    match cli.command {
        Commands::Serve {
            host,
            port,
            metrics: with_metrics,
        } => {
            if with_metrics {
                metrics::init_metrics(config.metrics.port);
            }
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid listen address {host}:{port}"))?;

            let state = AppState {
                graph,
                default_access_token: default_token,
                request_deadline: deadline,
            };
            info!("Starting server with Graph API at {}", config.graph.base_url);
            start_server(state, &config.cors.whitelist, addr).await?;
        }
        Commands::Search {
            lat_lng,
            query,
            distance,
            limit,
            sort,
            since,
            until,
            version,
            access_token,
        } => {
            let options = SearchOptions {
                lat_lan_array: Some(lat_lng),
                query,
                distance,
                limit,
                sort,
                since,
                until,
                version,
                access_token,
                ..Default::default()
            };
            let params = SearchParameters::from_options(options, default_token);
            let response = EventSearch::new(graph, params)
                .with_deadline(deadline)
                .search()
                .await?;
            print_events(&response)?;
        }
        Commands::SearchById {
            venue_ids,
            event_ids,
            lat,
            lng,
            sort,
            version,
            access_token,
        } => {
            let options = IdSearchOptions {
                venue_id_array: Some(venue_ids),
                event_id_array: Some(event_ids),
                lat,
                lng,
                sort,
                version,
                access_token,
            };
            let params = IdSearchParameters::from_options(options, default_token)?;
            let response = IdSearch::new(graph, params)
                .with_deadline(deadline)
                .search_by_id()
                .await?;
            print_events(&response)?;
        }
    }

    Ok(())
}
