use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::outbound::webhook::DeliveryAttempt;
use crate::server::AppState;
use crate::server::responses::ApiError;

const DEFAULT_LIMIT: usize = 50;

/// Query parameters for `GET /webhooks/deliveries`
#[derive(Debug, Deserialize)]
pub struct DeliveriesQuery {
    /// Restrict the listing to one endpoint
    pub endpoint: Option<Uuid>,

    /// Cap on returned rows, newest first
    pub limit: Option<usize>,
}

/// List recorded delivery attempts, newest first
pub async fn list_deliveries(
    State(state): State<AppState>,
    Query(query): Query<DeliveriesQuery>,
) -> Result<Json<Vec<DeliveryAttempt>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let attempts = match query.endpoint {
        Some(subscriber_id) => {
            let mut attempts = state.delivery_log.list_for_subscriber(subscriber_id).await?;
            attempts.reverse();
            attempts.truncate(limit);
            attempts
        }
        None => state.delivery_log.list_recent(limit).await?,
    };

    Ok(Json(attempts))
}

/// Fetch one delivery attempt by id, for drilling into a listed row
pub async fn get_delivery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryAttempt>, ApiError> {
    let attempt = state.delivery_log.get(id).await?;
    Ok(Json(attempt))
}
