use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

use super::signer::format_signature_header;

/// Default bounded wait for a single delivery attempt
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for delivery transport failures.
///
/// A received HTTP response is never an error here, whatever its status:
/// the dispatcher classifies status codes as delivery outcomes. Errors are
/// reserved for attempts that produced no response at all.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Timeout(DEFAULT_TIMEOUT)
        } else if err.is_connect() {
            DeliveryError::Network(err.to_string())
        } else {
            DeliveryError::RequestFailed(err.to_string())
        }
    }
}

/// A received HTTP response, whatever its status code
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    pub status_code: u16,
    pub body: String,
}

/// HTTP client wrapper for webhook delivery
pub struct DeliveryClient {
    client: Client,
    timeout: Duration,
}

impl DeliveryClient {
    /// Create a new delivery client with the default timeout (30 seconds)
    pub fn new() -> Result<Self, DeliveryError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a new delivery client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("Chamahub/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::RequestFailed(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Perform exactly one POST of the pre-encoded body.
    ///
    /// `signature` is the hex HMAC digest computed over `body`; when present
    /// it is sent as `X-Webhook-Signature: sha256=<hex>`. No retry happens
    /// here under any circumstance.
    pub async fn deliver(
        &self,
        url: &str,
        event_type: &str,
        body: &str,
        signature: Option<&str>,
    ) -> Result<DeliveryResponse, DeliveryError> {
        debug!(url = %url, event_type = %event_type, "Sending webhook");

        let start = Instant::now();

        let mut request = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Event-Type", event_type);

        if let Some(signature) = signature {
            request = request.header("X-Webhook-Signature", format_signature_header(signature));
        }

        let response = request.body(body.to_string()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Webhook request failed");
            if e.is_timeout() {
                DeliveryError::Timeout(self.timeout)
            } else {
                DeliveryError::from(e)
            }
        })?;

        let elapsed = start.elapsed();
        let response_time_ms = elapsed.as_millis() as u64;
        let status_code = response.status().as_u16();

        debug!(
            url = %url,
            status = %status_code,
            response_time_ms = %response_time_ms,
            "Webhook response received"
        );

        let body = self.read_response_body(response).await?;

        Ok(DeliveryResponse { status_code, body })
    }

    /// Read response body with size limit
    async fn read_response_body(&self, response: Response) -> Result<String, DeliveryError> {
        // Limit response body size to 1MB
        const MAX_BODY_SIZE: usize = 1024 * 1024;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeliveryError::RequestFailed(format!("Failed to read response body: {e}")))?;

        if bytes.len() > MAX_BODY_SIZE {
            warn!(
                size = bytes.len(),
                max_size = MAX_BODY_SIZE,
                "Response body too large, truncating"
            );
        }

        let body = String::from_utf8_lossy(&bytes[..bytes.len().min(MAX_BODY_SIZE)]).to_string();
        Ok(body)
    }

    /// Get configured timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_client_creation() -> Result<(), DeliveryError> {
        let client = DeliveryClient::new()?;
        assert_eq!(client.timeout(), Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn test_delivery_client_with_custom_timeout() -> Result<(), DeliveryError> {
        let timeout = Duration::from_secs(10);
        let client = DeliveryClient::with_timeout(timeout)?;
        assert_eq!(client.timeout(), timeout);
        Ok(())
    }

    #[test]
    fn test_delivery_error_display() {
        let err = DeliveryError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timeout after 30s");

        let err = DeliveryError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = DeliveryError::RequestFailed("builder error".to_string());
        assert_eq!(err.to_string(), "HTTP request failed: builder error");
    }

    #[tokio::test]
    async fn test_deliver_to_unreachable_endpoint_is_network_error() -> Result<(), DeliveryError> {
        let client = DeliveryClient::with_timeout(Duration::from_secs(2))?;

        // Port 1 on loopback refuses connections
        let result = client
            .deliver("http://127.0.0.1:1/hook", "member.created", "{}", None)
            .await;

        assert!(matches!(
            result,
            Err(DeliveryError::Network(_)) | Err(DeliveryError::RequestFailed(_))
        ));
        Ok(())
    }
}
