//! Per-unit record of undo tasks.
//!
//! A `UnitLedger` belongs to exactly one execution unit. It is created when
//! the unit starts and consumed into a `RollbackPlan` when the unit ends, so
//! nothing recorded for one unit can leak into the next.
use std::collections::VecDeque;

use log::Level;
use serde_json::json;

use super::assemble::assemble;
use super::errors::id_str;
use crate::logging::{AuditSink, StageLogger};
use crate::providers::{invert, Outcome, ProviderRegistry};
use crate::types::{ExecutionContext, OperationResult, RollbackAction, RollbackPlan};

#[derive(Debug)]
pub struct UnitLedger {
    context: ExecutionContext,
    ordinal: usize,
    unit_id: String,
    actions: VecDeque<RollbackAction>,
}

/// Shared collaborators for recording one step.
pub(crate) struct RecordCtx<'a> {
    pub registry: &'a ProviderRegistry,
    pub audit: &'a dyn AuditSink,
    pub slog: &'a StageLogger<'a>,
}

impl UnitLedger {
    pub(crate) fn new(context: ExecutionContext, ordinal: usize, unit_id: String) -> Self {
        Self { context, ordinal, unit_id, actions: VecDeque::new() }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Undo tasks recorded so far, most recent first.
    pub fn actions(&self) -> impl Iterator<Item = &RollbackAction> {
        self.actions.iter()
    }

    /// Record a non-item step. The aggregate result of a looped step is
    /// ignored; its items arrive through `record_item`.
    pub(crate) fn record(&mut self, op: &OperationResult, ctx: &RecordCtx<'_>) -> usize {
        if op.is_loop_aggregate() {
            ctx.slog.record().type_id(&op.type_id).field("reason", json!("loop_aggregate")).emit_skip();
            return 0;
        }
        self.record_changed(op, ctx)
    }

    /// Record one item of a looped step.
    pub(crate) fn record_item(&mut self, op: &OperationResult, ctx: &RecordCtx<'_>) -> usize {
        self.record_changed(op, ctx)
    }

    fn record_changed(&mut self, op: &OperationResult, ctx: &RecordCtx<'_>) -> usize {
        if !op.changed {
            return 0;
        }
        // Foreign namespaces are not ours to undo.
        let Some(provider) = ctx.registry.resolve(&op.type_id) else {
            ctx.slog.record().type_id(&op.type_id).field("reason", json!("foreign_namespace")).emit_skip();
            return 0;
        };

        let outcome = invert(provider, op);
        if let Some((level, msg)) = outcome.diagnostic(&op.type_id) {
            ctx.audit.log(level, &msg);
        }
        let inversion = match outcome {
            Outcome::Inverted(inv) => inv,
            Outcome::NotCreated => {
                ctx.slog.invert().type_id(&op.type_id).field("reason", json!("not_created")).emit_skip();
                return 0;
            }
            other => {
                let mut ev = ctx.slog.invert().type_id(&op.type_id);
                if let Some(id) = other.error_id() {
                    ev = ev.field("error_id", json!(id_str(id)));
                }
                ev.emit_warn();
                return 0;
            }
        };

        for note in &inversion.notes {
            ctx.audit.log(Level::Warn, &format!("{}: {note}", op.type_id));
        }
        let batch = assemble(inversion.actions, op, provider.credentials());
        let count = batch.len();
        let ev = ctx
            .slog
            .invert()
            .type_id(&op.type_id)
            .field("provider", json!(provider.name()))
            .field("actions", json!(batch))
            .field("notes", json!(inversion.notes));
        if inversion.notes.is_empty() {
            ev.emit_success();
        } else {
            ev.emit_warn();
        }
        for act in &batch {
            ctx.audit.log(Level::Debug, &format!("recorded undo for {}: {}", op.type_id, act.type_id()));
        }
        self.prepend(batch);
        count
    }

    /// Put a batch in front of everything recorded so far, keeping the
    /// batch's own order.
    pub(crate) fn prepend(&mut self, batch: Vec<RollbackAction>) {
        for act in batch.into_iter().rev() {
            self.actions.push_front(act);
        }
    }

    /// Finished plan for this unit; `None` when nothing was recorded.
    pub fn into_plan(self) -> Option<RollbackPlan> {
        RollbackPlan::from_actions(self.context, self.actions.into())
    }
}
