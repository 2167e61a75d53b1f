//! Configuration surface consumed by the relay constructors
//!
//! Credential and file loading belong to the startup collaborator; this
//! module only defines the shapes it hands over.

use serde::{Deserialize, Serialize};

use crate::identity::IdentityArns;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Active sending backend
    pub backend: BackendConfig,

    /// Opaque tag applied to all outbound sends, used by the provider for
    /// delivery-event tracking
    #[serde(default)]
    pub configuration_set_name: Option<String>,

    /// Envelope senders must match this pattern when present
    #[serde(default)]
    pub allow_from_pattern: Option<String>,

    /// Recipients matching this pattern are dropped from the transaction
    #[serde(default)]
    pub deny_to_pattern: Option<String>,

    /// Delegated-sending identity ARNs
    #[serde(default)]
    pub identities: IdentityArns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    Ses(AwsClientConfig),
    SesV2(AwsClientConfig),
    Pinpoint(AwsClientConfig),
}

/// Overrides applied on top of the ambient AWS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsClientConfig {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}
