//! Booking intake for a mobile catering business: the booking and contact
//! forms, where finished submissions go, and the HTTP API around them.

pub mod allergens;
pub mod booking;
pub mod config;
pub mod contact;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod sink;
pub mod submission;
pub mod validation;

pub use allergens::{Allergen, AllergenCatalog, AllergenEntry};
pub use booking::{BookingIntakeForm, BookingPayload, BookingRequest, EditError, GuestMinimums, Service};
pub use config::AppConfig;
pub use contact::{ContactForm, ContactMessage, ContactPayload};
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};
pub use middleware::rate_limit::RateLimiter;
pub use notify::{NotificationPresenter, RecordingPresenter, TracingPresenter};
pub use pricing::{PriceList, Quote};
pub use sink::{
    build_sinks, BookingStatus, HttpSink, MemorySink, SinkSet, SqliteSink, SubmissionSink,
    SubmissionStore,
};
pub use submission::{FormPhase, SubmitError};
pub use validation::{FieldError, ValidationErrorKind, ValidationResult, Validatable};

use axum::{middleware as axum_middleware, Router};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub sink: Arc<dyn SubmissionSink>,
    pub store: Option<Arc<dyn SubmissionStore>>,
    pub guest_minimums: GuestMinimums,
    pub price_list: Arc<PriceList>,
    pub allergens: Arc<AllergenCatalog>,
    pub rate_limiter: RateLimiter,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SinkSet::memory())
    }
}

impl AppState {
    pub fn new(sinks: SinkSet) -> Self {
        let config = AppConfig::default();

        Self {
            app_name: "Little Jonny's Catering".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            sink: sinks.sink,
            store: sinks.store,
            guest_minimums: config.booking.guest_minimums,
            price_list: Arc::new(config.pricing),
            allergens: Arc::new(AllergenCatalog::default()),
            rate_limiter: RateLimiter::from_config(&config.rate_limit),
        }
    }

    pub fn from_config(sinks: SinkSet, config: &AppConfig) -> Self {
        Self::new(sinks)
            .with_guest_minimums(config.booking.guest_minimums)
            .with_price_list(config.pricing.clone())
            .with_rate_limiter(RateLimiter::from_config(&config.rate_limit))
    }

    pub fn with_guest_minimums(mut self, guest_minimums: GuestMinimums) -> Self {
        self.guest_minimums = guest_minimums;
        self
    }

    pub fn with_price_list(mut self, price_list: PriceList) -> Self {
        self.price_list = Arc::new(price_list);
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    if config.rate_limit.enable {
        router = router.layer(axum_middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    router = router.layer(cors_layer_from_config(&config.cors));
    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
