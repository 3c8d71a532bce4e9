use axum::extract::{Extension, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use clap::Parser;
use peercache::{Group, GroupRegistry, HttpPool, PeerPicker, peer_router};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "peercache", about = "Distributed read-through cache node")]
struct Args {
    /// Base URL other nodes use to reach this node.
    #[arg(long, env = "PEERCACHE_ADDR", default_value = "http://127.0.0.1:8001")]
    addr: String,

    /// All peer base URLs, this node included.
    #[arg(long, env = "PEERCACHE_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// Name of the demo group.
    #[arg(long, env = "PEERCACHE_GROUP", default_value = "scores")]
    group: String,

    /// Byte budget of the group's local cache.
    #[arg(long, env = "PEERCACHE_CACHE_BYTES", default_value_t = 2 << 10)]
    cache_bytes: i64,

    /// Optional bind address for the client-facing API, e.g. 127.0.0.1:9999.
    #[arg(long, env = "PEERCACHE_API")]
    api: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiParams {
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Groups:
    let groups = GroupRegistry::new();
    let group = groups.new_group(&args.group, args.cache_bytes, slow_db());

    // 2. Peer pool:
    let pool = HttpPool::new(&args.addr);
    let peers = if args.peers.is_empty() {
        vec![args.addr.clone()]
    } else {
        args.peers.clone()
    };
    pool.set(&peers);
    group.register_peers(pool.clone() as Arc<dyn PeerPicker>)?;

    tracing::info!("Node {} serving group {:?}", pool.self_addr(), group.name());
    tracing::info!("Peers: {:?}", peers);

    // 3. Client-facing API:
    if let Some(api_addr) = args.api.clone() {
        let api = Router::new()
            .route("/api", get(handle_api))
            .layer(Extension(group.clone()));
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        tracing::info!("API server listening on {}", api_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, api).await {
                tracing::error!("API server stopped: {}", e);
            }
        });
    }

    // 4. Peer server:
    let url = reqwest::Url::parse(&args.addr)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("--addr has no host: {}", args.addr))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| anyhow::anyhow!("--addr has no port: {}", args.addr))?;
    let bind_addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Peer server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, peer_router(pool, groups)).await?;

    Ok(())
}

/// Stand-in for a slow backing store.
fn slow_db() -> peercache::GetterFn<impl Fn(String) -> std::future::Ready<anyhow::Result<Vec<u8>>>> {
    let db: Arc<HashMap<&'static str, &'static str>> = Arc::new(HashMap::from([
        ("Tom", "630"),
        ("Jack", "589"),
        ("Sam", "567"),
    ]));

    peercache::GetterFn(move |key: String| {
        tracing::info!("[SlowDB] search key {}", key);
        let result = match db.get(key.as_str()) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => Err(anyhow::anyhow!("{} not exist", key)),
        };
        std::future::ready(result)
    })
}

async fn handle_api(
    Extension(group): Extension<Arc<Group>>,
    Query(params): Query<ApiParams>,
) -> Response {
    match group.get(&params.key).await {
        Ok(view) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.byte_slice(),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
