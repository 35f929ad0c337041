// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for OpenAI-compatible streaming chat completions.
//!
//! Converts a reqwest response byte stream into [`StreamDelta`]s using the
//! `eventsource-stream` crate for SSE protocol compliance. The stream ends
//! at the `[DONE]` sentinel or a chunk carrying a `finish_reason`.

use eventsource_stream::Eventsource;
use folio_core::{DeltaStream, FolioError, StreamDelta};
use futures::stream::StreamExt;

use crate::types::CompletionChunk;

/// Parses a reqwest streaming response into a stream of [`StreamDelta`]s.
///
/// Each SSE `data:` payload is either the literal `[DONE]` sentinel or a
/// JSON completion chunk whose first choice's `delta.content` becomes the
/// fragment text. Keep-alive comments are handled by the SSE layer.
pub fn parse_delta_stream(response: reqwest::Response) -> DeltaStream {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                if event.data.trim() == "[DONE]" {
                    return Some(Ok(StreamDelta {
                        content: None,
                        done: true,
                    }));
                }
                match serde_json::from_str::<CompletionChunk>(&event.data) {
                    Ok(chunk) => {
                        let choice = chunk.choices.into_iter().next();
                        let (content, finished) = match choice {
                            Some(c) => (c.delta.content, c.finish_reason.is_some()),
                            None => (None, false),
                        };
                        Some(Ok(StreamDelta {
                            content,
                            done: finished,
                        }))
                    }
                    Err(e) => Some(Err(FolioError::Engine {
                        message: format!("failed to parse completion chunk: {e}"),
                        source: Some(Box::new(e)),
                    })),
                }
            }
            Err(e) => Some(Err(FolioError::Engine {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: serve raw SSE text through wiremock to get a real
    /// reqwest::Response with a streamable body. The server is returned
    /// too so it stays alive while the body is read.
    async fn mock_sse_response(sse_text: &str) -> (wiremock::MockServer, reqwest::Response) {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;

        let response = reqwest::get(&server.uri()).await.unwrap();
        (server, response)
    }

    #[tokio::test]
    async fn content_fragments_in_order_then_done() {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
            "data: [DONE]\n\n",
        );
        let (_server, response) = mock_sse_response(sse).await;
        let mut stream = parse_delta_stream(response);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.content.as_deref(), Some("Hel"));
        assert!(!first.done);

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.content.as_deref(), Some("lo"));

        let last = stream.next().await.unwrap().unwrap();
        assert!(last.done);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn finish_reason_marks_done() {
        let sse = "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n";
        let (_server, response) = mock_sse_response(sse).await;
        let mut stream = parse_delta_stream(response);

        let delta = stream.next().await.unwrap().unwrap();
        assert!(delta.done);
        assert!(delta.content.is_none());
    }

    #[tokio::test]
    async fn malformed_json_yields_engine_error() {
        let sse = "data: {not json}\n\n";
        let (_server, response) = mock_sse_response(sse).await;
        let mut stream = parse_delta_stream(response);

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, FolioError::Engine { .. }));
    }

    #[tokio::test]
    async fn empty_choices_is_a_noop_fragment() {
        let sse = "data: {\"choices\":[]}\n\ndata: [DONE]\n\n";
        let (_server, response) = mock_sse_response(sse).await;
        let mut stream = parse_delta_stream(response);

        let delta = stream.next().await.unwrap().unwrap();
        assert!(delta.content.is_none());
        assert!(!delta.done);
    }
}
