mod cache;
mod config;
mod generator;
mod handlers;
mod metrics;
mod models;
mod service;
mod state;
mod validator;
mod worker;

use axum::{
    Router,
    routing::{delete, get, post},
};
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cache::CacheStore;
use crate::config::Args;
use crate::generator::OpenAiGenerator;
use crate::service::StoryService;
use crate::state::AppState;
use crate::worker::GenerationPool;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // exits here with a usage error when OPENAI_API_KEY is absent
    let args = Args::parse();

    let generator = Arc::new(OpenAiGenerator::new(
        args.api_url.clone(),
        args.api_key.clone(),
        args.model.clone(),
        Duration::from_secs(args.request_timeout),
    ));
    let pool = GenerationPool::spawn(
        generator,
        args.workers as usize,
        args.queue_capacity as usize,
    );
    let service = StoryService::new(CacheStore::new(args.cache_ttl), pool);

    let state = Arc::new(AppState {
        service,
        started_at: Instant::now(),
    });

    let app = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/generate", post(handlers::generate_handler))
        .route("/cache", delete(handlers::clear_cache_handler))
        .route("/cache/stats", get(handlers::cache_stats_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!(port = args.port, model = %args.model, upstream = %args.api_url, "plotpop gateway listening");
    info!(
        cache_ttl = args.cache_ttl,
        workers = args.workers,
        queue_capacity = args.queue_capacity,
        "cache and worker pool configured"
    );
    axum::serve(listener, app).await.unwrap();
}
