use axum::Json;

use crate::domain::events::ALL_EVENT_TYPES;

/// List every event type an endpoint can subscribe to, in catalog order
pub async fn list_event_types() -> Json<&'static [&'static str]> {
    Json(ALL_EVENT_TYPES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_is_published() {
        let Json(event_types) = list_event_types().await;

        assert!(event_types.contains(&"member.created"));
        assert!(event_types.contains(&"payment.created"));
    }
}
