// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the mail relay.
//!
//! Handles POST /contact and GET /health.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::mailer::OutboundMail;
use crate::server::RelayState;

/// Request body for POST /contact.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: String,
    pub message: String,
}

/// Response body for POST /contact and error responses.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// POST /contact
///
/// Validates the submission, forwards it as an outbound email with the
/// submitter's address as reply-to, and reports success or failure.
pub async fn post_contact(
    State(state): State<RelayState>,
    Json(body): Json<ContactRequest>,
) -> impl IntoResponse {
    if let Err(reason) = validate(&body) {
        warn!(reason, "rejected contact submission");
        return (
            StatusCode::BAD_REQUEST,
            Json(ContactResponse {
                message: reason.to_string(),
            }),
        );
    }

    let mail = OutboundMail {
        from_name: body.name.trim().to_string(),
        reply_to: body.email.trim().to_string(),
        subject: format!("New contact form submission: {}", body.subject.trim()),
        body: format!(
            "Name: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n",
            body.name.trim(),
            body.email.trim(),
            body.subject.trim(),
            body.message.trim(),
        ),
    };

    match state.mailer.send(mail).await {
        Ok(()) => {
            info!("contact submission forwarded");
            (
                StatusCode::OK,
                Json(ContactResponse {
                    message: "Email sent successfully!".to_string(),
                }),
            )
        }
        Err(e) => {
            warn!(error = %e, "failed to forward contact submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse {
                    message: "Failed to send email.".to_string(),
                }),
            )
        }
    }
}

/// GET /health
pub async fn get_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Rejects blank required fields and obviously malformed addresses.
fn validate(body: &ContactRequest) -> Result<(), &'static str> {
    if body.name.trim().is_empty() {
        return Err("name must not be empty");
    }
    if body.message.trim().is_empty() {
        return Err("message must not be empty");
    }
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err("email address is invalid");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            subject: "Hello".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(validate(&request("Ada", "ada@example.com", "hi there")).is_ok());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate(&request("  ", "ada@example.com", "hi")).is_err());
    }

    #[test]
    fn blank_message_rejected() {
        assert!(validate(&request("Ada", "ada@example.com", "\t")).is_err());
    }

    #[test]
    fn malformed_email_rejected() {
        for bad in ["", "no-at-sign", "@leading", "trailing@"] {
            assert!(validate(&request("Ada", bad, "hi")).is_err(), "{bad:?}");
        }
    }
}
