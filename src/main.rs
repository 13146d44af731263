// src/main.rs

//! # Birthday Claim Service - Main Entry Point
//!
//! This module serves as the main entry point for the birthday token claim
//! page. It loads the deployment configuration, starts the page loop and
//! serves the page over HTTP.
//!
//! ## Architecture Overview
//! 1. **Models**: Addresses, session configuration, outcomes and claim state
//! 2. **Services**: Address intake, session controller, result presenter,
//!    verification widget, page loop and API endpoints
//! 3. **Utilities**: Keccak-256 / EIP-55 checksums and payload serialization
//!
//! ## Environment Variables (all optional)
//! - `CLAIM_LISTEN_ADDR`: Bind address (default: 127.0.0.1:3000)
//! - `CLAIM_ENDPOINT`: Claim contract address passed to the verifier
//! - `CLAIM_ENDPOINT_TYPE`: `celo`, `staging_celo`, `https` or `staging_https`
//! - `CLAIM_EXPLORER_HOST`: Block explorer host for claim links
//! - `CLAIM_EXPLORER_NAME`: Explorer name on the transaction link (default: CELOSCAN)
//! - `CLAIM_CLEAR_ON_INVALID`: Drop the held address on invalid input
//! - `RUST_LOG`: Log filter (default: info)

use crate::settings::AppConfig;
use crate::services::api_server::ApiServer;
use crate::services::claim_page::ClaimPage;
use crate::services::page_loop::spawn_page;
use crate::services::widget::QrChallengeWidget;
use anyhow::Context;
use dotenv::dotenv;
use log::info;

// Module declarations (organized by functional domain)
mod settings;  // Deployment configuration
mod error;     // Service error type
mod models;    // Data structures
mod services;  // Claim page logic and API
mod utils;     // Helper functions

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment configuration
/// 2. Validate deployment settings
/// 3. Start the page loop
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppConfig::load()
        .context("failed to read configuration")?
        .into_settings()
        .context("invalid configuration")?;

    info!(
        "Claim page for {} ({}), endpoint {} on {:?}",
        settings.deployment.app_name,
        settings.deployment.scope,
        settings.deployment.endpoint,
        settings.deployment.endpoint_type
    );

    let page = ClaimPage::new(&settings, QrChallengeWidget::new());
    let (page_handle, _page_task) = spawn_page(page);

    let api_server = ApiServer::new(page_handle);
    info!("Available endpoints:");
    info!("- POST /input");
    info!("- GET  /claim");
    info!("- GET  /session");
    info!("- POST /verification-callback");

    api_server
        .run(settings.listen_addr)
        .await
        .context("API server stopped")?;
    Ok(())
}
