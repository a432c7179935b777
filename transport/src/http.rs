//! HTTP outbound transport.
//!
//! Delivers messages as fire-and-forget POSTs: body = payload bytes (or the
//! serialized structured value), `Content-Type` negotiated from the payload
//! kind. No custom headers, no authentication, no compression.

use std::time::Duration;

use async_trait::async_trait;
use courier_types::OutboundMessage;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::Mutex;

use crate::error::TransportError;
use crate::OutboundTransport;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 32;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Outbound transport for `http` and `https` destinations.
///
/// Holds one pooled [`reqwest::Client`], acquired at [`activate`] and
/// dropped at [`deactivate`]. The client slot sits behind a mutex so the
/// lifecycle calls need only `&self`; `handle_message` clones the client out
/// and releases the lock before any network await.
///
/// [`activate`]: OutboundTransport::activate
/// [`deactivate`]: OutboundTransport::deactivate
pub struct HttpTransport {
    client: Mutex<Option<reqwest::Client>>,
}

const HTTP_SCHEMES: &[&str] = &["http", "https"];

impl HttpTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Mutex::new(None),
        }
    }

    fn build_client() -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
            .redirect(reqwest::redirect::Policy::none())
            .build()
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboundTransport for HttpTransport {
    fn schemes(&self) -> &[&str] {
        HTTP_SCHEMES
    }

    async fn activate(&self) -> Result<(), TransportError> {
        let client =
            Self::build_client().map_err(|e| TransportError::Activation(e.to_string()))?;
        *self.client.lock().await = Some(client);
        Ok(())
    }

    async fn handle_message(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let client = self
            .client
            .lock()
            .await
            .clone()
            .ok_or(TransportError::Inactive)?;

        let body = message
            .payload()
            .to_body()
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        let response = client
            .post(message.destination().clone())
            .header(CONTENT_TYPE, message.payload().content_type())
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                destination = %message.destination(),
                status = %status,
                "delivered outbound message"
            );
            Ok(())
        } else {
            Err(TransportError::Delivery(format!(
                "unexpected response status {status}"
            )))
        }
    }

    async fn deactivate(&self) {
        // Dropping the client releases its connection pool. No-op when the
        // transport was never activated.
        if self.client.lock().await.take().is_some() {
            tracing::debug!("http transport deactivated");
        }
    }
}
