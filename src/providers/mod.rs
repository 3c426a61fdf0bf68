//! Providers own the per-namespace dispatch tables that map a resource short
//! name to its inverter.
//!
//! A `Provider` is plain data: a namespace prefix, a credential whitelist and
//! a table built once at startup. Resolution across providers lives in
//! `registry`, the per-type guard and call in `dispatch`.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::policy::CredentialPolicy;
use crate::types::{InverseAction, OperationResult};

pub mod aws;
pub mod dispatch;
pub mod gcp;
pub mod registry;

pub use dispatch::{invert, Outcome};
pub use registry::ProviderRegistry;

/// Computes the undo operations for one resource type.
///
/// Receives the fully-qualified type id of the original step and the step itself.
pub type InvertFn = fn(&str, &OperationResult) -> Result<Inversion, InvertError>;

/// How a resource type signals that it created something.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Creation {
    /// Creation only when the `state` argument is `present`.
    Declared,
    /// Any changed run creates (e.g. instance launch, object upload).
    Implicit,
}

/// Dispatch table entry.
#[derive(Clone, Copy, Debug)]
pub enum Entry {
    Invert { creation: Creation, invert: InvertFn },
    /// Recognized but never inverted.
    Unsupported,
}

/// Zero or more inverse operations, in execution order, plus advisory notes
/// about parts that could not be derived.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inversion {
    pub actions: Vec<InverseAction>,
    pub notes: Vec<String>,
}

impl Inversion {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn one(action: InverseAction) -> Self {
        Self { actions: vec![action], notes: Vec::new() }
    }

    pub fn push(&mut self, action: InverseAction) {
        self.actions.push(action);
    }

    pub fn note(&mut self, msg: impl Into<String>) {
        self.notes.push(msg.into());
    }

    #[must_use]
    pub fn with_note(mut self, msg: impl Into<String>) -> Self {
        self.note(msg);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvertError {
    #[error("missing output field `{0}`")]
    MissingField(String),
    #[error("missing argument `{0}`")]
    MissingArgument(String),
}

/// Named handler for one resource namespace.
#[derive(Clone, Debug)]
pub struct Provider {
    name: &'static str,
    prefix: &'static str,
    credentials: CredentialPolicy,
    table: BTreeMap<&'static str, Entry>,
}

impl Provider {
    pub fn new(name: &'static str, prefix: &'static str, credentials: CredentialPolicy) -> Self {
        Self { name, prefix, credentials, table: BTreeMap::new() }
    }

    #[must_use]
    pub fn inverter(mut self, short: &'static str, creation: Creation, invert: InvertFn) -> Self {
        self.table.insert(short, Entry::Invert { creation, invert });
        self
    }

    #[must_use]
    pub fn unsupported(mut self, short: &'static str) -> Self {
        self.table.insert(short, Entry::Unsupported);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn credentials(&self) -> &CredentialPolicy {
        &self.credentials
    }

    pub fn entry(&self, short: &str) -> Option<&Entry> {
        self.table.get(short)
    }

    pub fn short_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }

    /// Short resource name of `type_id` when it lies inside this namespace.
    /// Matching is on whole dotted segments.
    pub fn short_name<'t>(&self, type_id: &'t str) -> Option<&'t str> {
        type_id
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|short| !short.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &str, _: &OperationResult) -> Result<Inversion, InvertError> {
        Ok(Inversion::none())
    }

    #[test]
    fn short_name_is_segment_aligned() {
        let p = Provider::new("t", "amazon.aws", CredentialPolicy::none());
        assert_eq!(p.short_name("amazon.aws.ec2_vol"), Some("ec2_vol"));
        assert_eq!(p.short_name("amazon.awsx.ec2_vol"), None);
        assert_eq!(p.short_name("amazon.aws"), None);
        assert_eq!(p.short_name("amazon.aws."), None);
    }

    #[test]
    fn table_keeps_entries() {
        let p = Provider::new("t", "ns.x", CredentialPolicy::none())
            .inverter("a", Creation::Declared, noop)
            .unsupported("b");
        assert!(matches!(p.entry("a"), Some(Entry::Invert { creation: Creation::Declared, .. })));
        assert!(matches!(p.entry("b"), Some(Entry::Unsupported)));
        assert!(p.entry("c").is_none());
        assert_eq!(p.short_names().collect::<Vec<_>>(), ["a", "b"]);
    }
}
