//! Pinpoint email API backend
//!
//! The one variant without a delegated identity set: no ARN mapping occurs
//! here, and the sender address is set explicitly on every request.

use async_trait::async_trait;
use aws_sdk_pinpointemail::primitives::Blob;
use aws_sdk_pinpointemail::types::{Destination, EmailContent, RawMessage};
use aws_sdk_pinpointemail::Client;

use crate::backends::{load_sdk_config, Backend};
use crate::config::AwsClientConfig;
use crate::error::{RelayError, RelayResult};

/// Fields of one send on the Pinpoint email API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinpointEmailRequest {
    pub configuration_set_name: Option<String>,
    pub from_email_address: String,
    pub destinations: Vec<String>,
    pub data: Vec<u8>,
}

/// Seam over the Pinpoint client so request construction stays testable.
#[async_trait]
pub trait PinpointApi: Send + Sync {
    async fn send(&self, request: PinpointEmailRequest) -> RelayResult<()>;
}

#[async_trait]
impl PinpointApi for Client {
    async fn send(&self, request: PinpointEmailRequest) -> RelayResult<()> {
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
            .from_email_address(request.from_email_address)
            .destination(destination)
            .content(content)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| RelayError::Backend(format!("Pinpoint send failed: {e}")))
    }
}

/// Relay backend for the Pinpoint email API.
pub struct PinpointBackend<C = Client> {
    api: C,
    configuration_set_name: Option<String>,
}

impl PinpointBackend<Client> {
    /// Construct a backend from the ambient AWS configuration.
    pub async fn new(
        config: &AwsClientConfig,
        configuration_set_name: Option<String>,
    ) -> RelayResult<Self> {
        let sdk_config = load_sdk_config(config).await;
        Ok(Self::with_api(Client::new(&sdk_config), configuration_set_name))
    }
}

impl<C> PinpointBackend<C> {
    pub fn with_api(api: C, configuration_set_name: Option<String>) -> Self {
        Self {
            api,
            configuration_set_name,
        }
    }

    fn build_request(&self, from: &str, recipients: &[String], data: &[u8]) -> PinpointEmailRequest {
        PinpointEmailRequest {
            configuration_set_name: self.configuration_set_name.clone(),
            from_email_address: from.to_string(),
            destinations: recipients.to_vec(),
            data: data.to_vec(),
        }
    }
}

#[async_trait]
impl<C: PinpointApi> Backend for PinpointBackend<C> {
    fn name(&self) -> &'static str {
        "pinpoint"
    }

    async fn dispatch(&self, from: &str, recipients: &[String], data: &[u8]) -> RelayResult<()> {
        self.api
            .send(self.build_request(from, recipients, data))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockApi {
        requests: Mutex<Vec<PinpointEmailRequest>>,
        fail_with: Option<String>,
    }

    #[async_trait]
    impl PinpointApi for MockApi {
        async fn send(&self, request: PinpointEmailRequest) -> RelayResult<()> {
            self.requests.lock().unwrap().push(request);
            match &self.fail_with {
                Some(message) => Err(RelayError::Backend(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn sender_is_set_explicitly_and_payload_passes_through() {
        let backend = PinpointBackend::with_api(
            MockApi::default(),
            Some("relay-events".to_string()),
        );
        let to = vec!["b@y.com".to_string(), "c@y.com".to_string()];
        let data = b"Subject: hello\r\n\r\nbody".to_vec();

        backend.dispatch("a@x.com", &to, &data).await.unwrap();

        let requests = backend.api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.from_email_address, "a@x.com");
        assert_eq!(request.destinations, to);
        assert_eq!(request.data, data);
        assert_eq!(request.configuration_set_name.as_deref(), Some("relay-events"));
    }

    #[tokio::test]
    async fn provider_error_propagates_to_the_caller() {
        let backend = PinpointBackend::with_api(
            MockApi {
                requests: Mutex::new(Vec::new()),
                fail_with: Some("AccountSuspendedException".to_string()),
            },
            None,
        );

        let result = backend
            .dispatch("a@x.com", &["b@y.com".to_string()], b"data")
            .await;

        assert!(
            matches!(result, Err(RelayError::Backend(ref m)) if m == "AccountSuspendedException")
        );
    }
}
