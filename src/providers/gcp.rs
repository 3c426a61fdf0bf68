//! `google.cloud` namespace. No inverters yet: every type resolves to this
//! provider and is reported as unknown rather than silently passing through.
use super::Provider;
use crate::policy::CredentialPolicy;

pub const PREFIX: &str = "google.cloud";

pub fn provider() -> Provider {
    Provider::new("gcp", PREFIX, CredentialPolicy::none())
}
