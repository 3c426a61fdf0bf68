use log::Level;

use super::{Creation, Entry, InvertError, Inversion, Provider};
use crate::constants::STATE_PRESENT;
use crate::types::OperationResult;

/// Result of routing one changed step through a provider's table.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Inverted(Inversion),
    /// Declared intent was not `present`; nothing was created.
    NotCreated,
    /// Recognized type that is deliberately never inverted.
    Unsupported,
    /// No table entry for the short name.
    Unknown,
    Failed(InvertError),
}

impl Outcome {
    /// Advisory line for the operator, if the outcome deserves one.
    pub fn diagnostic(&self, type_id: &str) -> Option<(Level, String)> {
        match self {
            Outcome::Inverted(_) => None,
            Outcome::NotCreated => {
                Some((Level::Debug, format!("{type_id} does not create any new resource")))
            }
            Outcome::Unsupported => Some((
                Level::Warn,
                format!("{type_id} is recognized but its rollback is not supported"),
            )),
            Outcome::Unknown => {
                Some((Level::Warn, format!("{type_id} is not supported: no inverter registered")))
            }
            Outcome::Failed(e) => {
                Some((Level::Warn, format!("{type_id} cannot be rolled back: {e}")))
            }
        }
    }

    pub fn error_id(&self) -> Option<crate::api::errors::ErrorId> {
        use crate::api::errors::ErrorId;
        match self {
            Outcome::Inverted(_) | Outcome::NotCreated => None,
            Outcome::Unsupported => Some(ErrorId::E_UNSUPPORTED),
            Outcome::Unknown => Some(ErrorId::E_UNKNOWN_TYPE),
            Outcome::Failed(InvertError::MissingField(_)) => Some(ErrorId::E_MISSING_FIELD),
            Outcome::Failed(InvertError::MissingArgument(_)) => Some(ErrorId::E_MISSING_ARGUMENT),
        }
    }
}

/// Strip the namespace, look up the inverter, apply the creation guard and call it.
pub fn invert(provider: &Provider, op: &OperationResult) -> Outcome {
    let Some(short) = provider.short_name(&op.type_id) else {
        return Outcome::Unknown;
    };
    match provider.entry(short) {
        None => Outcome::Unknown,
        Some(Entry::Unsupported) => Outcome::Unsupported,
        Some(Entry::Invert { creation, invert: f }) => {
            if *creation == Creation::Declared && op.intent() != Some(STATE_PRESENT) {
                return Outcome::NotCreated;
            }
            match f(&op.type_id, op) {
                Ok(inv) => Outcome::Inverted(inv),
                Err(e) => Outcome::Failed(e),
            }
        }
    }
}
