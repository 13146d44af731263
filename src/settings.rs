// src/settings.rs
//! Deployment configuration for the claim service.
//!
//! Every constant that identifies a deployment variant (application name,
//! scope, destination contract, verifier network, explorer) lives here. The
//! configuration is loaded once at startup and handed to the components that
//! need it; nothing reads it from global state afterwards.
//!
//! ## Sources (later wins)
//! 1. Built-in defaults matching the staging birthday deployment
//! 2. Environment variables prefixed `CLAIM_` (e.g. `CLAIM_EXPLORER_HOST`),
//!    which `main` may have populated from a `.env` file

use crate::error::{ClaimError, Result};
use crate::models::address::AddressPolicy;
use crate::models::session::{DisclosureSet, EndpointKind, UserIdKind};
use crate::services::intake::IntakePolicy;
use config::{Config, Environment};
use serde::Deserialize;
use std::net::SocketAddr;

/// Raw settings as read from the configuration sources.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// Claim contract address, passed to the verifier as the endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_endpoint_type")]
    pub endpoint_type: EndpointKind,
    #[serde(default = "default_user_id_type")]
    pub user_id_type: UserIdKind,
    #[serde(default = "default_true")]
    pub dev_mode: bool,
    #[serde(default)]
    pub logo_base64: String,
    #[serde(default = "default_explorer_host")]
    pub explorer_host: String,
    /// Explorer name shown on the transaction link
    #[serde(default = "default_explorer_name")]
    pub explorer_name: String,
    #[serde(default = "default_reward_label")]
    pub reward_label: String,
    /// Comma separated disclosure names
    #[serde(default = "default_disclosures")]
    pub disclosures: String,
    #[serde(default = "default_true")]
    pub verify_checksum: bool,
    #[serde(default)]
    pub clear_on_invalid: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_app_name() -> String {
    "Self Birthday".to_string()
}

fn default_scope() -> String {
    "Self-Birthday-Example".to_string()
}

fn default_endpoint() -> String {
    "0x97d01A133c9Bfd77D6b7147d36bAA005b48735aa".to_string()
}

fn default_endpoint_type() -> EndpointKind {
    EndpointKind::StagingCelo
}

fn default_user_id_type() -> UserIdKind {
    UserIdKind::Hex
}

fn default_explorer_host() -> String {
    "alfajores.celoscan.io".to_string()
}

fn default_explorer_name() -> String {
    "CELOSCAN".to_string()
}

fn default_reward_label() -> String {
    "1,000 RACE TOKENS".to_string()
}

fn default_disclosures() -> String {
    "date_of_birth".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            app_name: default_app_name(),
            scope: default_scope(),
            endpoint: default_endpoint(),
            endpoint_type: default_endpoint_type(),
            user_id_type: default_user_id_type(),
            dev_mode: true,
            logo_base64: String::new(),
            explorer_host: default_explorer_host(),
            explorer_name: default_explorer_name(),
            reward_label: default_reward_label(),
            disclosures: default_disclosures(),
            verify_checksum: true,
            clear_on_invalid: false,
        }
    }
}

/// Fixed session fields for one deployment variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub app_name: String,
    pub scope: String,
    pub endpoint: String,
    pub endpoint_type: EndpointKind,
    pub user_id_type: UserIdKind,
    pub logo_base64: String,
    pub dev_mode: bool,
    pub disclosures: DisclosureSet,
}

/// Explorer and copy used when presenting the claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationConfig {
    pub explorer_host: String,
    pub explorer_name: String,
    pub reward_label: String,
}

/// Validated configuration, ready to be injected into the page.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_addr: SocketAddr,
    pub deployment: DeploymentConfig,
    pub presentation: PresentationConfig,
    pub address_policy: AddressPolicy,
    pub intake_policy: IntakePolicy,
}

impl AppConfig {
    /// Loads configuration from the `CLAIM_` environment on top of defaults.
    pub fn load() -> Result<Self> {
        Self::from_environment(Environment::with_prefix("CLAIM").try_parsing(true))
    }

    /// Loads configuration from an explicit environment source.
    ///
    /// Tests pass a `source` map here instead of mutating process variables.
    pub fn from_environment(environment: Environment) -> Result<Self> {
        let config = Config::builder().add_source(environment).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Checks the raw values and converts them to typed [`Settings`].
    ///
    /// # Errors
    /// - listen address does not parse
    /// - endpoint is not a valid contract address
    /// - disclosure list names an unknown attribute
    /// - explorer host is empty
    pub fn into_settings(self) -> Result<Settings> {
        let listen_addr = self
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ClaimError::InvalidSetting {
                key: "listen_addr",
                reason: e.to_string(),
            })?;

        let address_policy = AddressPolicy {
            verify_checksum: self.verify_checksum,
        };
        if !address_policy.validate(&self.endpoint) {
            return Err(ClaimError::InvalidSetting {
                key: "endpoint",
                reason: format!("`{}` is not a valid contract address", self.endpoint),
            });
        }

        let disclosures = DisclosureSet::parse_list(&self.disclosures)
            .map_err(|reason| ClaimError::InvalidSetting { key: "disclosures", reason })?;

        let explorer_host = self.explorer_host.trim().trim_end_matches('/').to_string();
        if explorer_host.is_empty() {
            return Err(ClaimError::InvalidSetting {
                key: "explorer_host",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Settings {
            listen_addr,
            deployment: DeploymentConfig {
                app_name: self.app_name,
                scope: self.scope,
                endpoint: self.endpoint,
                endpoint_type: self.endpoint_type,
                user_id_type: self.user_id_type,
                logo_base64: self.logo_base64,
                dev_mode: self.dev_mode,
                disclosures,
            },
            presentation: PresentationConfig {
                explorer_host,
                explorer_name: self.explorer_name,
                reward_label: self.reward_label,
            },
            address_policy,
            intake_policy: IntakePolicy {
                clear_on_invalid: self.clear_on_invalid,
            },
        })
    }
}
