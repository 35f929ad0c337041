// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `folio serve` command implementation.
//!
//! Runs the contact-form mail relay: an HTTP server that forwards
//! submissions to the site owner's inbox over SMTP.

use std::sync::Arc;

use folio_config::FolioConfig;
use folio_core::FolioError;
use folio_relay::{RelayState, ServerConfig, SmtpMailer, start_server};
use tracing::info;

/// Runs the `folio serve` command.
pub async fn run_serve(config: FolioConfig) -> Result<(), FolioError> {
    info!("starting folio mail relay");

    let mailer = SmtpMailer::from_config(&config.relay)?;
    let state = RelayState {
        mailer: Arc::new(mailer),
    };
    let server = ServerConfig {
        host: config.relay.host.clone(),
        port: config.relay.port,
    };

    start_server(&server, state).await
}
