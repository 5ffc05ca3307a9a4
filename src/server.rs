mod handlers;
mod responses;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::outbound::webhook::{
    DeliveryClient, DeliveryLog, InMemoryDeliveryLog, InMemorySubscriberRegistry,
    SubscriberRegistry, WebhookDispatcher,
};
use crate::server::handlers::deliveries::{get_delivery, list_deliveries};
use crate::server::handlers::endpoints::{
    activate_endpoint, deactivate_endpoint, list_endpoints, register_endpoint,
    rotate_endpoint_secret,
};
use crate::server::handlers::events::list_event_types;
use crate::server::handlers::health::health_check;
use crate::server::handlers::root::home;
use axum::http::Method;
use axum::{
    Router,
    routing::{get, post},
};
use color_eyre::eyre::{Context, Result};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// The global application state shared between all request handlers.
///
/// The dispatcher lives here so that record-mutation handlers and the
/// admin API observe the same registry and delivery log.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn SubscriberRegistry>,
    pub delivery_log: Arc<dyn DeliveryLog>,
    pub dispatcher: Arc<WebhookDispatcher>,
}

pub struct Server {
    router: Router,
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Creates a new HTTP server with freshly wired webhook state.
    pub async fn new(config: &Config) -> Result<Self> {
        let registry: Arc<dyn SubscriberRegistry> = Arc::new(InMemorySubscriberRegistry::new());
        let delivery_log: Arc<dyn DeliveryLog> = Arc::new(InMemoryDeliveryLog::new());

        let http_client = DeliveryClient::with_timeout(config.webhook.timeout())?;
        let dispatcher = Arc::new(WebhookDispatcher::with_client(
            registry.clone(),
            delivery_log.clone(),
            http_client,
        ));

        let state = AppState {
            registry,
            delivery_log,
            dispatcher,
        };

        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &'_ axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("request", method = %request.method(), uri)
            });

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ]);

        let router = Router::new()
            .route("/", get(home))
            .route("/health", get(health_check))
            .route(
                "/webhooks/endpoints",
                post(register_endpoint).get(list_endpoints),
            )
            .route("/webhooks/endpoints/{id}/activate", post(activate_endpoint))
            .route(
                "/webhooks/endpoints/{id}/deactivate",
                post(deactivate_endpoint),
            )
            .route(
                "/webhooks/endpoints/{id}/secret",
                post(rotate_endpoint_secret),
            )
            .route("/webhooks/event-types", get(list_event_types))
            .route("/webhooks/deliveries", get(list_deliveries))
            .route("/webhooks/deliveries/{id}", get(get_delivery))
            .layer(cors_layer)
            .layer(trace_layer)
            .with_state(state.clone());

        let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
            .await
            .wrap_err_with(|| format!("Failed to bind to port {}", config.server.port))?;

        Ok(Self {
            router,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.listener.local_addr().unwrap().port()
    }

    /// Handle onto the server's shared state, for wiring domain-event
    /// producers (and tests) to the same registry and delivery log.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Server listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }
}
