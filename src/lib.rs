//! Outbound half of an SMTP-to-cloud relay: takes an already-parsed SMTP
//! transaction (origin, sender, recipients, raw message bytes) and forwards
//! it to a configured AWS email-sending backend, subject to an allow/deny
//! address policy, with an audit record per attempt.

// Core modules
pub mod audit;
pub mod backends;
pub mod config;
pub mod error;
pub mod identity;
pub mod policy;
pub mod service;

// Re-exports
pub use audit::{TracingAudit, TransactionAudit};
pub use backends::{Backend, PinpointBackend, SesBackend, SesV2Backend};
pub use config::{AwsClientConfig, BackendConfig, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use identity::IdentityArns;
pub use policy::{AddressPolicy, Filtered};
pub use service::RelayService;
