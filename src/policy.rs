//! Allow/deny address filtering

use regex::Regex;

use crate::error::{RelayError, RelayResult};

/// Immutable allow/deny policy shared across all send calls on a backend.
///
/// The allow pattern gates the envelope sender; the deny pattern gates each
/// recipient individually. Both are optional.
#[derive(Debug, Clone, Default)]
pub struct AddressPolicy {
    allow_from: Option<Regex>,
    deny_to: Option<Regex>,
}

/// Partition of a recipient list after policy evaluation.
///
/// `allowed` and `denied` are disjoint, keep the input order, and together
/// contain every input recipient exactly once. `error` is set only when the
/// sender failed the allow check — individual recipient denials are silent.
#[derive(Debug)]
pub struct Filtered {
    pub allowed: Vec<String>,
    pub denied: Vec<String>,
    pub error: Option<RelayError>,
}

impl AddressPolicy {
    pub fn new(allow_from: Option<Regex>, deny_to: Option<Regex>) -> Self {
        Self { allow_from, deny_to }
    }

    /// Compile a policy from configuration pattern strings.
    pub fn from_patterns(allow_from: Option<&str>, deny_to: Option<&str>) -> RelayResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                RelayError::Configuration(format!("Invalid policy pattern {pattern:?}: {e}"))
            })
        };
        Ok(Self {
            allow_from: allow_from.map(compile).transpose()?,
            deny_to: deny_to.map(compile).transpose()?,
        })
    }

    /// Split `to` into allowed and denied recipients.
    ///
    /// A sender that does not match the allow pattern blocks the whole
    /// transaction: every recipient is denied and a policy error is reported,
    /// regardless of the deny pattern. Otherwise recipients matching the deny
    /// pattern are moved to `denied` without raising an error.
    pub fn filter(&self, from: &str, to: &[String]) -> Filtered {
        if let Some(allow) = &self.allow_from {
            if !allow.is_match(from) {
                return Filtered {
                    allowed: Vec::new(),
                    denied: to.to_vec(),
                    error: Some(RelayError::SenderDenied(from.to_string())),
                };
            }
        }

        let mut allowed = Vec::new();
        let mut denied = Vec::new();
        for recipient in to {
            match &self.deny_to {
                Some(deny) if deny.is_match(recipient) => denied.push(recipient.clone()),
                _ => allowed.push(recipient.clone()),
            }
        }

        Filtered {
            allowed,
            denied,
            error: None,
        }
    }
}
