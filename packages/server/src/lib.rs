#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident map analysis service.
//!
//! Serves the REST API for loading incident records and running
//! asynchronous analysis jobs over them. Submissions are queued to an
//! in-process worker pool; clients poll the jobs and results endpoints
//! for status and the consolidated output.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_map_store::{JobStore, RecordStore, ResultStore, WorkQueue};
use incident_map_worker::{Dispatcher, WorkerPool};

/// Shared application state.
pub struct AppState {
    /// Incident records, read-only to the worker pool.
    pub records: Arc<RecordStore>,
    /// Canonical job descriptors.
    pub jobs: Arc<JobStore>,
    /// Published pipeline results.
    pub results: Arc<ResultStore>,
    /// Queue feeding the worker pool.
    pub queue: WorkQueue,
}

/// Starts the incident map API server.
///
/// Builds the stores and work queue, spawns the worker pool
/// (`WORKER_COUNT`, default 4), and serves the HTTP API on
/// `BIND_ADDR`:`PORT`. This is a regular async function — the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let records = Arc::new(RecordStore::new());
    let jobs = Arc::new(JobStore::new());
    let results = Arc::new(ResultStore::new());
    let queue = WorkQueue::new();

    let dispatcher = Dispatcher::new(
        Arc::clone(&records),
        Arc::clone(&jobs),
        Arc::clone(&results),
        queue.clone(),
    );

    let worker_count: usize = std::env::var("WORKER_COUNT")
        .ok()
        .and_then(|count| count.parse().ok())
        .unwrap_or(4);
    let _pool = WorkerPool::spawn(worker_count, &dispatcher);

    let state = web::Data::new(AppState {
        records,
        jobs,
        results,
        queue,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/data", web::post().to(handlers::import_data))
                    .route("/data", web::get().to(handlers::list_data))
                    .route("/data", web::delete().to(handlers::delete_data))
                    .route("/data/ids", web::get().to(handlers::list_ids))
                    .route("/data/ids/{id}", web::get().to(handlers::get_record))
                    .route("/jobs", web::post().to(handlers::submit_job))
                    .route("/jobs", web::get().to(handlers::list_jobs))
                    .route("/jobs/{id}", web::get().to(handlers::get_job))
                    .route("/results/{id}", web::get().to(handlers::get_result)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
