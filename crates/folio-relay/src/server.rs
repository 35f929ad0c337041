// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail relay HTTP server built on axum.
//!
//! Sets up routes, CORS, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use folio_core::FolioError;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::mailer::MailTransport;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct RelayState {
    /// Outbound mail transport.
    pub mailer: Arc<dyn MailTransport>,
}

/// Relay server configuration (mirrors RelayConfig from folio-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the relay router. Exposed separately from [`start_server`] so
/// tests can serve it on an ephemeral port.
pub fn build_router(state: RelayState) -> Router {
    Router::new()
        .route("/contact", post(handlers::post_contact))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the mail relay HTTP server.
pub async fn start_server(config: &ServerConfig, state: RelayState) -> Result<(), FolioError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FolioError::Relay {
            message: format!("failed to bind relay to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("mail relay listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| FolioError::Relay {
            message: format!("relay server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::OutboundMail;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Records sent mail instead of talking SMTP; optionally fails.
    pub(crate) struct RecordingMailer {
        pub sent: Arc<Mutex<Vec<OutboundMail>>>,
        pub fail: bool,
    }

    #[async_trait]
    impl MailTransport for RecordingMailer {
        async fn send(&self, mail: OutboundMail) -> Result<(), FolioError> {
            if self.fail {
                return Err(FolioError::Relay {
                    message: "SMTP send failed: connection refused".into(),
                    source: None,
                });
            }
            self.sent.lock().await.push(mail);
            Ok(())
        }
    }

    fn state(fail: bool) -> (RelayState, Arc<Mutex<Vec<OutboundMail>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mailer = RecordingMailer {
            sent: sent.clone(),
            fail,
        };
        (
            RelayState {
                mailer: Arc::new(mailer),
            },
            sent,
        )
    }

    async fn serve_once(state: RelayState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn submission() -> serde_json::Value {
        serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "subject": "Hi",
            "message": "Hello!",
        })
    }

    #[tokio::test]
    async fn contact_submission_forwarded_with_reply_to() {
        let (state, sent) = state(false);
        let base = serve_once(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/contact"))
            .json(&submission())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("successfully"));

        let sent = sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "ada@example.com");
        assert_eq!(sent[0].subject, "New contact form submission: Hi");
        assert!(sent[0].body.contains("Name: Ada"));
    }

    #[tokio::test]
    async fn invalid_submission_rejected_without_send() {
        let (state, sent) = state(false);
        let base = serve_once(state).await;

        let mut body = submission();
        body["name"] = serde_json::json!("");
        let response = reqwest::Client::new()
            .post(format!("{base}/contact"))
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert!(sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_maps_to_500() {
        let (state, _) = state(true);
        let base = serve_once(state).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/contact"))
            .json(&submission())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        assert!(response.text().await.unwrap().contains("Failed"));
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let (state, _) = state(false);
        let base = serve_once(state).await;

        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("\"ok\""));
    }
}
