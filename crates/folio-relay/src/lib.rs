// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail relay for the portfolio contact form.
//!
//! A small axum service that accepts contact-form submissions over
//! HTTP and forwards them to the site owner's inbox over SMTP. The
//! visitor's address goes into the Reply-To header so the owner can
//! answer directly.

pub mod handlers;
pub mod mailer;
pub mod server;

pub use mailer::{MailTransport, OutboundMail, SmtpMailer};
pub use server::{RelayState, ServerConfig, build_router, start_server};
