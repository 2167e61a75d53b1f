//! Delegated-sending identity ARNs

use serde::{Deserialize, Serialize};

/// Up to three optional identity references establishing which verified
/// identity is authorized to send on behalf of the envelope sender.
///
/// The classic email API takes all three independently; the next-generation
/// API collapses them into a single signing-identity slot plus a feedback
/// forwarding identity (see [`signing_identity`](Self::signing_identity)).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityArns {
    #[serde(default)]
    pub source_arn: Option<String>,
    #[serde(default)]
    pub from_arn: Option<String>,
    #[serde(default)]
    pub return_path_arn: Option<String>,
}

impl IdentityArns {
    /// Identity used to sign outbound mail on the next-generation API.
    ///
    /// The from identity takes precedence over the source identity; the two
    /// are mutually exclusive at the wire level there.
    pub fn signing_identity(&self) -> Option<&str> {
        self.from_arn.as_deref().or(self.source_arn.as_deref())
    }

    /// Identity receiving bounce and complaint feedback on the
    /// next-generation API.
    pub fn forwarding_identity(&self) -> Option<&str> {
        self.return_path_arn.as_deref()
    }
}
