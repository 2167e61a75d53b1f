//! Transaction audit logging

use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::RelayError;

/// Sink receiving one audit record per recipient set of a send attempt.
///
/// Implementations must never fail and must not block the caller
/// meaningfully; records are for audit trails, not control flow.
pub trait TransactionAudit: Send + Sync {
    fn record(
        &self,
        origin: SocketAddr,
        from: &str,
        recipients: &[String],
        error: Option<&RelayError>,
    );
}

/// Default sink: structured `tracing` events.
#[derive(Debug, Default)]
pub struct TracingAudit;

impl TransactionAudit for TracingAudit {
    fn record(
        &self,
        origin: SocketAddr,
        from: &str,
        recipients: &[String],
        error: Option<&RelayError>,
    ) {
        record(origin, from, recipients, error);
    }
}

/// One audit entry per recipient set of a send attempt.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord<'a> {
    pub time: DateTime<Utc>,
    pub origin: SocketAddr,
    pub from: &'a str,
    pub recipients: &'a [String],
    pub error: Option<String>,
}

/// Record the outcome of a send attempt for one recipient set.
///
/// Fire and forget: never fails and never blocks the caller beyond the
/// subscriber's own event handling. Used for audit trails, not control flow.
pub fn record(origin: SocketAddr, from: &str, recipients: &[String], error: Option<&RelayError>) {
    let entry = TransactionRecord {
        time: Utc::now(),
        origin,
        from,
        recipients,
        error: error.map(ToString::to_string),
    };
    // Serialization of the entry cannot realistically fail; an empty record
    // field is preferable to failing the send path.
    let record = serde_json::to_string(&entry).unwrap_or_default();

    match &entry.error {
        Some(err) => warn!(
            origin = %entry.origin,
            from = entry.from,
            recipients = ?entry.recipients,
            error = %err,
            record = %record,
            "mail transaction not relayed cleanly"
        ),
        None => info!(
            origin = %entry.origin,
            from = entry.from,
            recipients = ?entry.recipients,
            record = %record,
            "mail transaction relayed"
        ),
    }
}
