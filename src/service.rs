//! Shared send pipeline over the configured backend

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::audit::{TracingAudit, TransactionAudit};
use crate::backends::{Backend, PinpointBackend, SesBackend, SesV2Backend};
use crate::config::{BackendConfig, RelayConfig};
use crate::error::RelayResult;
use crate::policy::AddressPolicy;

/// Entry point handed to the SMTP front-end.
///
/// Holds only immutable configuration and a long-lived provider client, so
/// one instance is safe to share across concurrent send calls.
pub struct RelayService {
    backend: Arc<dyn Backend>,
    policy: AddressPolicy,
    audit: Arc<dyn TransactionAudit>,
}

impl RelayService {
    pub fn new(backend: Arc<dyn Backend>, policy: AddressPolicy) -> Self {
        Self::with_audit(backend, policy, Arc::new(TracingAudit))
    }

    pub fn with_audit(
        backend: Arc<dyn Backend>,
        policy: AddressPolicy,
        audit: Arc<dyn TransactionAudit>,
    ) -> Self {
        Self {
            backend,
            policy,
            audit,
        }
    }

    /// Compile the address policy and construct the configured backend.
    ///
    /// All failures surface as configuration errors; the startup collaborator
    /// decides whether to abort the process.
    pub async fn from_config(config: RelayConfig) -> RelayResult<Self> {
        let policy = AddressPolicy::from_patterns(
            config.allow_from_pattern.as_deref(),
            config.deny_to_pattern.as_deref(),
        )?;

        let backend: Arc<dyn Backend> = match &config.backend {
            BackendConfig::Ses(aws) => Arc::new(
                SesBackend::new(
                    aws,
                    config.configuration_set_name.clone(),
                    config.identities.clone(),
                )
                .await?,
            ),
            BackendConfig::SesV2(aws) => Arc::new(
                SesV2Backend::new(
                    aws,
                    config.configuration_set_name.clone(),
                    config.identities.clone(),
                )
                .await?,
            ),
            BackendConfig::Pinpoint(aws) => Arc::new(
                PinpointBackend::new(aws, config.configuration_set_name.clone()).await?,
            ),
        };
        info!(backend = backend.name(), "relay backend initialized");

        Ok(Self::new(backend, policy))
    }

    /// Relay one SMTP transaction to the cloud backend.
    ///
    /// Recipients are filtered by the address policy first. If none remain,
    /// no network call is made and the policy error (if any) is returned.
    /// Otherwise exactly one send attempt is made and its outcome returned
    /// verbatim; the attempted recipient set is audit-logged with that
    /// outcome, and a denied set is audit-logged whenever the sender failed
    /// the allow check.
    pub async fn send(
        &self,
        origin: SocketAddr,
        from: &str,
        to: &[String],
        data: &[u8],
    ) -> RelayResult<()> {
        let filtered = self.policy.filter(from, to);
        if filtered.error.is_some() {
            self.audit
                .record(origin, from, &filtered.denied, filtered.error.as_ref());
        }
        if filtered.allowed.is_empty() {
            return match filtered.error {
                Some(err) => Err(err),
                None => Ok(()),
            };
        }

        let outcome = self.backend.dispatch(from, &filtered.allowed, data).await;
        self.audit
            .record(origin, from, &filtered.allowed, outcome.as_ref().err());
        outcome
    }
}
