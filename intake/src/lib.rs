//! # intake: family submissions for the Thanksgiving drive
//!
//! `intake` serves a single form where a family registers for the drive: a name, two
//! headcounts, an address, a phone number and an email address. Every submission goes
//! through an admission workflow that caps the drive at a fixed number of families (500 by
//! default).
//!
//! ## Admission
//!
//! For each submission the workflow ([`admission::AdmissionWorkflow`]) asks the store for the
//! exact number of stored submissions. If the drive is full the family is turned away with a
//! fixed message and nothing is written; otherwise exactly one row is inserted. Every fault
//! (an unreachable store, a rejected row, even a panic inside a store call) is caught and
//! reported with a generic "try again" message. Nothing is retried.
//!
//! By default the count and the insert are separate calls, so two submissions racing from
//! different instances can overshoot the cap by a few rows. Stores that can do better
//! evaluate both in one critical section when `admission.mode` is `atomic`.
//!
//! ## Architecture
//!
//! - [`form`]: the eight fields, input hints, numeric coercion, and the per-form controller
//!   with its submission state machine
//! - [`admission`]: the check-count-then-insert workflow and its outcome taxonomy
//! - [`store`]: the [`store::SubmissionStore`] contract with memory, PostgreSQL and PostgREST
//!   backends
//! - [`db`]: PostgreSQL repository, row model and store error type
//! - [`api`]: the HTML form page (`/`) and the JSON API (`/api/v1/submissions`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use intake::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = intake::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     intake::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod admission;
pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod form;
mod openapi;
mod pages;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

use axum::{
    Json, Router,
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
use metrics_exporter_prometheus::PrometheusHandle;
use once_cell::sync::OnceCell;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, debug, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::admission::AdmissionWorkflow;
use crate::openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .config(config)
///     .workflow(workflow)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub workflow: AdmissionWorkflow,
}

/// Get the intake database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Install the process-wide rustls crypto provider. Safe to call more than once.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

static PROMETHEUS: OnceCell<(PrometheusMetricLayer<'static>, PrometheusHandle)> = OnceCell::new();

/// The HTTP metrics layer and the handle that renders every recorded metric.
///
/// The recorder is global, so it is installed once per process.
fn prometheus() -> &'static (PrometheusMetricLayer<'static>, PrometheusHandle) {
    PROMETHEUS.get_or_init(PrometheusMetricLayer::pair)
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let enable_metrics = state.config.enable_metrics;

    let api_routes = Router::new().route("/submissions", post(api::handlers::submissions::create_submission));

    let mut router = Router::new()
        .route(
            "/",
            get(api::handlers::form::show_form).post(api::handlers::form::submit_form),
        )
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()));

    if enable_metrics {
        let (prometheus_layer, metric_handle) = prometheus().clone();
        router = router
            .route("/internal/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// The HTTP server and the resources it owns.
///
/// 1. **Create**: [`Application::new`] connects the configured store (running migrations for
///    PostgreSQL) and builds the router
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests finish, the pool is
///    closed and pending spans are flushed
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting intake with configuration: {:#?}", config);

        let connected = store::connect(&config).await?;
        let workflow = AdmissionWorkflow::new(connected.store, config.admission.capacity).with_mode(config.admission.mode);
        info!(
            capacity = workflow.capacity(),
            mode = ?workflow.mode(),
            backend = workflow.store().backend(),
            "Admission workflow ready"
        );

        let mut app = Self::with_workflow(config, workflow);
        app.pool = connected.pool;
        Ok(app)
    }

    /// Create an application around an existing workflow, without connecting anything.
    pub fn with_workflow(config: Config, workflow: AdmissionWorkflow) -> Self {
        let state = AppState::builder().config(config.clone()).workflow(workflow).build();
        Self {
            router: build_router(state),
            config,
            pool: None,
        }
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Intake listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
