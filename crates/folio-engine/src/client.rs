// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the local OpenAI-compatible inference runtime.
//!
//! Handles request construction, streaming responses, health pings, and
//! transient error retry.

use std::time::Duration;

use folio_core::{DeltaStream, EngineStatus, FolioError};
use tracing::{debug, warn};

use crate::sse;
use crate::types::{ApiErrorResponse, CompletionRequest};

/// HTTP client for local runtime communication.
///
/// Manages connection pooling and retry logic for transient errors
/// (429, 500, 503).
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    max_retries: u32,
}

impl RuntimeClient {
    /// Creates a new runtime client.
    pub fn new(base_url: String, request_timeout: Duration) -> Result<Self, FolioError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| FolioError::Engine {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            max_retries: 1,
        })
    }

    /// Sends a streaming chat completion request and returns the delta stream.
    ///
    /// On transient errors (429, 500, 503), retries once after a 1-second delay.
    pub async fn stream_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<DeltaStream, FolioError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying streaming request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        FolioError::Timeout {
                            duration: self.request_timeout,
                        }
                    } else {
                        FolioError::Engine {
                            message: format!("HTTP request failed: {e}"),
                            source: Some(Box::new(e)),
                        }
                    }
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "streaming response received");

            if status.is_success() {
                return Ok(sse::parse_delta_stream(response));
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(FolioError::engine(format!(
                    "runtime returned {status}: {body}"
                )));
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "runtime error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("runtime returned {status}: {body}")
            };
            return Err(FolioError::engine(message));
        }

        Err(last_error
            .unwrap_or_else(|| FolioError::engine("streaming request failed after retries")))
    }

    /// Pings the runtime's health endpoint.
    pub async fn health(&self) -> Result<EngineStatus, FolioError> {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(EngineStatus::Healthy),
            Ok(response) => Ok(EngineStatus::Degraded(format!(
                "health endpoint returned {}",
                response.status()
            ))),
            Err(e) => Ok(EngineStatus::Unhealthy(format!("runtime unreachable: {e}"))),
        }
    }
}

/// Whether an HTTP status warrants a single retry.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ChatMessage, Role};
    use futures::StreamExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "tiny".into(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: "hi".into(),
            }],
            max_tokens: 64,
            stream: true,
        }
    }

    async fn client_for(server: &MockServer) -> RuntimeClient {
        RuntimeClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn successful_stream_yields_fragments() {
        let server = MockServer::start().await;
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"},\"finish_reason\":null}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut stream = client.stream_completion(&request()).await.unwrap();
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.content.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn transient_error_retried_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string("data: [DONE]\n\n"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut stream = client.stream_completion(&request()).await.unwrap();
        let last = stream.next().await.unwrap().unwrap();
        assert!(last.done);
    }

    #[tokio::test]
    async fn non_transient_error_fails_with_api_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string(
                r#"{"error":{"type":"model_not_found","message":"no such model"}}"#,
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = match client.stream_completion(&request()).await {
            Ok(_) => panic!("expected stream_completion to fail"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("model_not_found"));
    }

    #[tokio::test]
    async fn health_reports_unreachable_runtime() {
        // Bind-then-drop leaves a port nothing is listening on. A pooled
        // wiremock server keeps its listener alive after drop, so use a
        // plain TcpListener instead.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = RuntimeClient::new(uri, Duration::from_secs(1)).unwrap();
        let status = client.health().await.unwrap();
        assert!(matches!(status, EngineStatus::Unhealthy(_)));
    }

    #[tokio::test]
    async fn health_ok_when_endpoint_responds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.health().await.unwrap(), EngineStatus::Healthy);
    }
}
