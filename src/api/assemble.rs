//! Turns inverse operations into labelled undo tasks.

use crate::constants::{UNDO_LABEL_PREFIX, UNLABELED_PLACEHOLDER};
use crate::policy::CredentialPolicy;
use crate::types::{InverseAction, OperationResult, RollbackAction};

/// `(UNDO) <label>` for named steps, a fixed placeholder otherwise.
pub(crate) fn undo_label(op: &OperationResult) -> String {
    match op.label.as_deref().filter(|l| !l.is_empty()) {
        Some(label) => format!("{UNDO_LABEL_PREFIX}{label}"),
        None => UNLABELED_PLACEHOLDER.to_string(),
    }
}

/// Label each inverse operation and forward whitelisted credentials from the
/// original step. Order of `inverses` is kept.
pub(crate) fn assemble(
    inverses: Vec<InverseAction>,
    op: &OperationResult,
    credentials: &CredentialPolicy,
) -> Vec<RollbackAction> {
    let label = undo_label(op);
    inverses
        .into_iter()
        .map(|mut inv| {
            credentials.propagate(&op.arguments, &mut inv.arguments);
            RollbackAction::new(label.clone(), inv)
        })
        .collect()
}
