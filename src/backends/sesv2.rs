//! Next-generation email API backend
//!
//! This API generation collapsed the three independent identity ARNs into a
//! single signing-identity slot (from identity, falling back to the source
//! identity) plus a feedback forwarding identity. The sender address is
//! deliberately left unset on outbound requests: the service derives it from
//! the raw message headers, preserving any display name already present.

use async_trait::async_trait;
use aws_sdk_sesv2::primitives::Blob;
use aws_sdk_sesv2::types::{Destination, EmailContent, RawMessage};
use aws_sdk_sesv2::Client;

use crate::backends::{load_sdk_config, Backend};
use crate::config::AwsClientConfig;
use crate::error::{RelayError, RelayResult};
use crate::identity::IdentityArns;

/// Fields of one send on the next-generation API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmailRequest {
    pub configuration_set_name: Option<String>,
    pub from_email_address: Option<String>,
    pub from_email_address_identity_arn: Option<String>,
    pub feedback_forwarding_email_address_identity_arn: Option<String>,
    pub destinations: Vec<String>,
    pub data: Vec<u8>,
}

/// Seam over the SESv2 client so request construction stays testable.
#[async_trait]
pub trait SesV2Api: Send + Sync {
    async fn send(&self, request: OutboundEmailRequest) -> RelayResult<()>;
}

#[async_trait]
impl SesV2Api for Client {
    async fn send(&self, request: OutboundEmailRequest) -> RelayResult<()> {
        let raw_message = RawMessage::builder()
            .data(Blob::new(request.data))
            .build()
            .map_err(|e| RelayError::InvalidRequest(e.to_string()))?;
        let destination = Destination::builder()
            .set_to_addresses(Some(request.destinations))
            .build();
        let content = EmailContent::builder().raw(raw_message).build();

        self.send_email()
            .set_configuration_set_name(request.configuration_set_name)
            .set_from_email_address(request.from_email_address)
            .set_from_email_address_identity_arn(request.from_email_address_identity_arn)
            .set_feedback_forwarding_email_address_identity_arn(
                request.feedback_forwarding_email_address_identity_arn,
            )
            .destination(destination)
            .content(content)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Backend(format!("SESv2 send failed: {e}")))
    }
}

/// Relay backend for the next-generation email API.
pub struct SesV2Backend<C = Client> {
    api: C,
    configuration_set_name: Option<String>,
    identities: IdentityArns,
}

impl SesV2Backend<Client> {
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

impl<C> SesV2Backend<C> {
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

    fn build_request(&self, recipients: &[String], data: &[u8]) -> OutboundEmailRequest {
        OutboundEmailRequest {
            configuration_set_name: self.configuration_set_name.clone(),
            // Derived from the raw message headers by the service.
            from_email_address: None,
            from_email_address_identity_arn: self
                .identities
                .signing_identity()
                .map(str::to_string),
            feedback_forwarding_email_address_identity_arn: self
                .identities
                .forwarding_identity()
                .map(str::to_string),
            destinations: recipients.to_vec(),
            data: data.to_vec(),
        }
    }
}

#[async_trait]
impl<C: SesV2Api> Backend for SesV2Backend<C> {
    fn name(&self) -> &'static str {
        "sesv2"
    }

    async fn dispatch(&self, _from: &str, recipients: &[String], data: &[u8]) -> RelayResult<()> {
        self.api.send(self.build_request(recipients, data)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockApi {
        requests: Mutex<Vec<OutboundEmailRequest>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl SesV2Api for MockApi {
        async fn send(&self, request: OutboundEmailRequest) -> RelayResult<()> {
            self.requests.lock().unwrap().push(request);
            match &self.fail_with {
                Some(message) => Err(RelayError::Backend(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn arns(source: Option<&str>, from: Option<&str>, return_path: Option<&str>) -> IdentityArns {
        IdentityArns {
            source_arn: source.map(str::to_string),
            from_arn: from.map(str::to_string),
            return_path_arn: return_path.map(str::to_string),
        }
    }

    async fn request_for(identities: IdentityArns) -> OutboundEmailRequest {
        let backend = SesV2Backend::with_api(MockApi::default(), None, identities);
        backend
            .dispatch("a@x.com", &["b@y.com".to_string()], b"data")
            .await
            .unwrap();
        let requests = backend.api.requests.lock().unwrap();
        requests[0].clone()
    }

    #[tokio::test]
    async fn from_identity_wins_over_source_identity() {
        let request = request_for(arns(Some("arn:source"), Some("arn:from"), None)).await;

        assert_eq!(
            request.from_email_address_identity_arn.as_deref(),
            Some("arn:from")
        );
    }

    #[tokio::test]
    async fn source_identity_is_used_when_from_identity_is_absent() {
        let request = request_for(arns(Some("arn:source"), None, None)).await;

        assert_eq!(
            request.from_email_address_identity_arn.as_deref(),
            Some("arn:source")
        );
    }

    #[tokio::test]
    async fn signing_identity_is_unset_when_both_are_absent() {
        let request = request_for(IdentityArns::default()).await;

        assert!(request.from_email_address_identity_arn.is_none());
    }

    #[tokio::test]
    async fn return_path_identity_maps_to_the_forwarding_field() {
        let request = request_for(arns(None, None, Some("arn:return"))).await;

        assert_eq!(
            request
                .feedback_forwarding_email_address_identity_arn
                .as_deref(),
            Some("arn:return")
        );
    }

    #[tokio::test]
    async fn sender_is_never_set_explicitly() {
        // The service derives the sender from the raw message headers, so a
        // display name in the submitted message survives the relay.
        let request = request_for(arns(Some("arn:source"), Some("arn:from"), None)).await;

        assert!(request.from_email_address.is_none());
    }

    #[tokio::test]
    async fn recipients_raw_bytes_and_set_name_pass_through() {
        let backend = SesV2Backend::with_api(
            MockApi::default(),
            Some("relay-events".to_string()),
            IdentityArns::default(),
        );
        let to = vec!["b@y.com".to_string(), "c@y.com".to_string()];
        let data = b"From: Display Name <a@x.com>\r\n\r\nbody".to_vec();

        backend.dispatch("a@x.com", &to, &data).await.unwrap();

        let requests = backend.api.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.destinations, to);
        assert_eq!(request.data, data);
        assert_eq!(request.configuration_set_name.as_deref(), Some("relay-events"));
    }

    #[tokio::test]
    async fn provider_error_propagates_to_the_caller() {
        let backend = SesV2Backend::with_api(
            MockApi {
                requests: Mutex::new(Vec::new()),
                fail_with: Some("MessageRejected".to_string()),
            },
            None,
            IdentityArns::default(),
        );

        let result = backend
            .dispatch("a@x.com", &["b@y.com".to_string()], b"data")
            .await;

        assert!(matches!(result, Err(RelayError::Backend(ref m)) if m == "MessageRejected"));
    }
}
