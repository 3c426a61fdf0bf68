//! Credential propagation into inverse actions.
//!
//! Only argument names on a provider's whitelist are copied from the original
//! step into its undo task. Everything else stays behind.
use serde_json::Value;

use crate::types::Args;

/// Fixed list of authentication-related argument names for one provider.
#[derive(Clone, Copy, Debug)]
pub struct CredentialPolicy {
    keys: &'static [&'static str],
}

impl CredentialPolicy {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    /// Policy that forwards nothing.
    pub const fn none() -> Self {
        Self { keys: &[] }
    }

    /// Copy whitelisted, non-empty arguments from `original` into `target`.
    /// Existing keys in `target` are overwritten by the original value.
    pub fn propagate(&self, original: &Args, target: &mut Args) {
        for key in self.keys {
            if let Some(v) = original.get(*key).filter(|v| is_set(v)) {
                target.insert((*key).to_string(), v.clone());
            }
        }
    }
}

fn is_set(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEYS: &[&str] = &["access_key", "region"];

    fn args(v: Value) -> Args {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn copies_only_whitelisted_keys() {
        let original = args(json!({
            "access_key": "X",
            "region": "r1",
            "password": "secret",
            "state": "present"
        }));
        let mut target = args(json!({"state": "absent"}));
        CredentialPolicy::new(KEYS).propagate(&original, &mut target);
        assert_eq!(target, args(json!({"state": "absent", "access_key": "X", "region": "r1"})));
    }

    #[test]
    fn skips_empty_values() {
        let original = args(json!({"access_key": "", "region": null}));
        let mut target = Args::new();
        CredentialPolicy::new(KEYS).propagate(&original, &mut target);
        assert!(target.is_empty());
    }

    #[test]
    fn none_policy_forwards_nothing() {
        let original = args(json!({"access_key": "X"}));
        let mut target = Args::new();
        CredentialPolicy::none().propagate(&original, &mut target);
        assert!(target.is_empty());
    }
}
