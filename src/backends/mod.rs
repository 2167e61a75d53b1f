//! Cloud email-sending backends behind one dispatch contract

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};

use crate::config::AwsClientConfig;
use crate::error::RelayResult;

pub mod pinpoint;
pub mod ses;
pub mod sesv2;

pub use pinpoint::PinpointBackend;
pub use ses::SesBackend;
pub use sesv2::SesV2Backend;

/// One cloud email-sending API integration.
///
/// Implementations receive an already-filtered transaction: the recipient
/// list contains only addresses the policy allowed, and `data` is the
/// complete raw message, forwarded byte-for-byte. Each call issues exactly
/// one network request; nothing is retried or queued at this layer.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stable backend identifier used in startup and audit output.
    fn name(&self) -> &'static str;

    /// Send raw message bytes to the allowed recipients.
    async fn dispatch(&self, from: &str, recipients: &[String], data: &[u8]) -> RelayResult<()>;
}

/// Load the ambient AWS configuration with the configured overrides applied.
pub(crate) async fn load_sdk_config(config: &AwsClientConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.clone());
    }
    loader.load().await
}
