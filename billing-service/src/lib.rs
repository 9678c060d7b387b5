pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::middleware::from_fn;
use axum::{
    routing::{get, patch, post},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use secrecy::ExposeSecret;
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use config::Config;
use services::BillingRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub config: Config,
    pub repository: BillingRepository,
}

pub struct Application {
    port: u16,
    router: Router,
}

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let mut client_options = ClientOptions::parse(config.database.url.expose_secret()).await?;
        client_options.app_name = Some("billing-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database.db_name);

        let repository = BillingRepository::new(&db);

        // Indexes back the vendor-scoped queries and the attendance upsert.
        repository.init_indexes().await?;

        services::init_metrics();

        let state = AppState {
            db,
            config: config.clone(),
            repository,
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics))
            // Transaction records (driver actions)
            .route("/deliveries", post(handlers::records::create_delivery))
            .route("/deliveries/:id", patch(handlers::records::update_delivery))
            .route("/collections", post(handlers::records::create_collection))
            .route(
                "/collections/:id",
                patch(handlers::records::update_collection),
            )
            // Invoicing
            .route(
                "/invoices/generate-monthly",
                post(handlers::invoices::generate_invoice),
            )
            .route("/invoices/:id", get(handlers::invoices::get_invoice))
            .route("/invoices/:id/send", post(handlers::invoices::send_invoice))
            // Payments
            .route("/payments", post(handlers::payments::record_payment))
            // Outstanding / reconciliation
            .route(
                "/suppliers/:id/outstanding",
                get(handlers::outstanding::supplier_outstanding),
            )
            .route(
                "/societies/:id/outstanding",
                get(handlers::outstanding::society_outstanding),
            )
            // Attendance & salary
            .route(
                "/drivers/:id/attendance",
                post(handlers::drivers::mark_attendance),
            )
            .route("/drivers/:id/salary", get(handlers::drivers::get_salary))
            // Expenses
            .route("/expenses", post(handlers::expenses::create_expense))
            .route(
                "/expenses/:id/status",
                patch(handlers::expenses::update_expense_status),
            )
            .layer(from_fn(metrics_middleware))
            .layer(from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| http_request_span(request),
            ))
            .with_state(state);

        Ok(Self {
            port: config.server.port,
            router,
        })
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        tracing::info!("Listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Root span for a request. The tenant fields are declared empty here so the
/// `VendorContext` extractor can record them once the headers are read.
fn http_request_span<B>(request: &axum::http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        vendor_id = tracing::field::Empty,
        user_id = tracing::field::Empty,
    )
}
