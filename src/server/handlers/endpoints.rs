use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outbound::webhook::{NewSubscriber, Subscriber};
use crate::server::AppState;
use crate::server::responses::ApiError;

/// Endpoint registration as exposed over the admin API.
///
/// The signing secret is never echoed back; `has_secret` only reports
/// whether deliveries to this endpoint carry a signature header.
#[derive(Debug, Serialize)]
pub struct EndpointResponse {
    pub id: Uuid,
    pub url: String,
    pub event_types: Vec<String>,
    pub is_active: bool,
    pub has_secret: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Subscriber> for EndpointResponse {
    fn from(subscriber: Subscriber) -> Self {
        let has_secret = subscriber.signing_secret().is_some();

        Self {
            id: subscriber.id,
            url: subscriber.url,
            event_types: subscriber.event_types,
            is_active: subscriber.is_active,
            has_secret,
            created_at: subscriber.created_at,
        }
    }
}

/// Body for `POST /webhooks/endpoints/{id}/secret`; an empty secret
/// turns signing off
#[derive(Debug, Deserialize)]
pub struct RotateSecretRequest {
    pub secret: String,
}

/// Register a webhook endpoint, or update it in place when the URL is
/// already registered.
pub async fn register_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<NewSubscriber>, JsonRejection>,
) -> Result<(StatusCode, Json<EndpointResponse>), ApiError> {
    let Json(registration) = payload?;
    let subscriber = state.registry.register(registration).await?;

    tracing::info!(id = %subscriber.id, url = %subscriber.url, "Webhook endpoint registered");
    Ok((StatusCode::CREATED, Json(subscriber.into())))
}

/// List every registered endpoint in registration order
pub async fn list_endpoints(
    State(state): State<AppState>,
) -> Result<Json<Vec<EndpointResponse>>, ApiError> {
    let subscribers = state.registry.list().await?;
    Ok(Json(subscribers.into_iter().map(Into::into).collect()))
}

/// Resume dispatch to an endpoint
pub async fn activate_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EndpointResponse>, ApiError> {
    let subscriber = state.registry.set_active(id, true).await?;
    Ok(Json(subscriber.into()))
}

/// Stop dispatch to an endpoint without losing its registration
pub async fn deactivate_endpoint(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EndpointResponse>, ApiError> {
    let subscriber = state.registry.set_active(id, false).await?;
    Ok(Json(subscriber.into()))
}

/// Replace the signing secret of an endpoint
pub async fn rotate_endpoint_secret(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RotateSecretRequest>, JsonRejection>,
) -> Result<Json<EndpointResponse>, ApiError> {
    let Json(request) = payload?;
    let subscriber = state.registry.rotate_secret(id, request.secret).await?;

    tracing::info!(id = %subscriber.id, "Webhook endpoint secret rotated");
    Ok(Json(subscriber.into()))
}
