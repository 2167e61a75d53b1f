//! Classic email API backend (raw email send)
//!
//! Sets the envelope sender explicitly and carries all three delegated
//! identity ARNs as independent request fields.

use async_trait::async_trait;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client;

use crate::backends::{load_sdk_config, Backend};
use crate::config::AwsClientConfig;
use crate::error::{RelayError, RelayResult};
use crate::identity::IdentityArns;

/// Fields of one raw-email send on the classic API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEmailRequest {
    pub configuration_set_name: Option<String>,
    pub source: String,
    pub destinations: Vec<String>,
    pub data: Vec<u8>,
    pub source_arn: Option<String>,
    pub from_arn: Option<String>,
    pub return_path_arn: Option<String>,
}

/// Seam over the SES client so request construction stays testable.
#[async_trait]
pub trait SesApi: Send + Sync {
    async fn send(&self, request: RawEmailRequest) -> RelayResult<()>;
}

#[async_trait]
impl SesApi for Client {
    async fn send(&self, request: RawEmailRequest) -> RelayResult<()> {
        let raw_message = RawMessage::builder()
            .data(Blob::new(request.data))
            .build()
            .map_err(|e| RelayError::InvalidRequest(e.to_string()))?;

        self.send_raw_email()
            .set_configuration_set_name(request.configuration_set_name)
            .source(request.source)
            .set_destinations(Some(request.destinations))
            .raw_message(raw_message)
            .set_source_arn(request.source_arn)
            .set_from_arn(request.from_arn)
            .set_return_path_arn(request.return_path_arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Backend(format!("SES send failed: {e}")))
    }
}

/// Relay backend for the classic email API.
pub struct SesBackend<C = Client> {
    api: C,
    configuration_set_name: Option<String>,
    identities: IdentityArns,
}

impl SesBackend<Client> {
    /// Construct a backend from the ambient AWS configuration.
    pub async fn new(
        config: &AwsClientConfig,
        configuration_set_name: Option<String>,
        identities: IdentityArns,
    ) -> RelayResult<Self> {
        let sdk_config = load_sdk_config(config).await;
        Ok(Self::with_api(
            Client::new(&sdk_config),
            configuration_set_name,
            identities,
        ))
    }
}

impl<C> SesBackend<C> {
    pub fn with_api(
        api: C,
        configuration_set_name: Option<String>,
        identities: IdentityArns,
    ) -> Self {
        Self {
            api,
            configuration_set_name,
            identities,
        }
    }

    fn build_request(&self, from: &str, recipients: &[String], data: &[u8]) -> RawEmailRequest {
        RawEmailRequest {
            configuration_set_name: self.configuration_set_name.clone(),
            source: from.to_string(),
            destinations: recipients.to_vec(),
            data: data.to_vec(),
            source_arn: self.identities.source_arn.clone(),
            from_arn: self.identities.from_arn.clone(),
            return_path_arn: self.identities.return_path_arn.clone(),
        }
    }
}

#[async_trait]
impl<C: SesApi> Backend for SesBackend<C> {
    fn name(&self) -> &'static str {
        "ses"
    }

    async fn dispatch(&self, from: &str, recipients: &[String], data: &[u8]) -> RelayResult<()> {
        self.api
            .send(self.build_request(from, recipients, data))
            .await
    }
}
