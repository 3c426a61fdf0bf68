// Facade for API module; delegates to submodules under src/api/

use std::path::PathBuf;

use log::Level;
use serde_json::json;

use crate::constants::{DEFAULT_SOURCE_NAME, LOCAL_HOST};
use crate::logging::audit::AuditCtx;
use crate::logging::{ts_for, AuditSink, FactsEmitter, StageLogger};
use crate::policy::Settings;
use crate::providers::ProviderRegistry;
use crate::types::ids::{new_run_id, unit_id};
use crate::types::{ExecutionContext, OperationResult};

mod assemble;
pub mod emit;
pub mod errors;
mod ledger;

pub use ledger::UnitLedger;

use errors::{id_str, ApiError};
use ledger::RecordCtx;

/// Observes a run and writes, per execution unit, the playbook that undoes
/// every resource the unit created.
///
/// Every notification method is infallible: problems are reported through
/// the `AuditSink` and never reach the host run.
pub struct Rollbook<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    settings: Settings,
    registry: ProviderRegistry,
    disabled: bool,
    run_id: String,
    source: String,
    units_opened: usize,
    current: Option<UnitLedger>,
    written: Vec<PathBuf>,
}

impl<E: FactsEmitter, A: AuditSink> Rollbook<E, A> {
    /// Build an engine with the built-in providers. An unusable output
    /// directory disables it for the whole run with a single warning.
    pub fn new(facts: E, audit: A, settings: Settings) -> Self {
        let mut rb = Self {
            facts,
            audit,
            settings,
            registry: ProviderRegistry::with_defaults(),
            disabled: false,
            run_id: new_run_id(),
            source: DEFAULT_SOURCE_NAME.to_string(),
            units_opened: 0,
            current: None,
            written: Vec::new(),
        };
        rb.check_output_dir();
        rb
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ledger of the unit in progress, if any.
    pub fn current_unit(&self) -> Option<&UnitLedger> {
        self.current.as_ref()
    }

    /// Documents written so far in this run.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn check_output_dir(&mut self) {
        let dir = self.settings.output_dir.display().to_string();
        let tctx = AuditCtx::new(&self.facts, &self.run_id, None, ts_for(self.settings.deterministic_facts));
        let slog = StageLogger::new(&tctx);
        if self.settings.output_dir_usable() {
            slog.configure().field("output_dir", json!(dir)).emit_success();
            return;
        }
        let err = ApiError::OutputUnavailable(format!("{dir} is not a directory"));
        self.audit.log(Level::Warn, &format!("{err}; no rollback plan will be generated"));
        slog.configure()
            .field("output_dir", json!(dir))
            .field("error_id", json!(id_str(err.id())))
            .emit_failure();
        self.disabled = true;
    }

    /// The host started a run from `source` (e.g. a playbook path).
    ///
    /// A unit left open by an unfinished previous run is written under that
    /// run's source and reported by the next `run_finished`.
    pub fn run_started(&mut self, source: &str) {
        if self.disabled {
            return;
        }
        self.written.clear();
        self.flush();
        self.run_id = new_run_id();
        self.source = source.to_string();
        self.units_opened = 0;
    }

    /// A new execution unit starts; the previous one is flushed first.
    pub fn unit_started(&mut self, context: ExecutionContext) {
        if self.disabled {
            return;
        }
        self.flush();
        self.open_unit(context);
    }

    fn open_unit(&mut self, context: ExecutionContext) {
        let ordinal = self.units_opened;
        self.units_opened += 1;
        let id = unit_id(&self.source, &context.name, ordinal).to_string();
        self.audit.log(Level::Debug, &format!("unit {} started ({id})", context.name));
        self.current = Some(UnitLedger::new(context, ordinal, id));
    }

    /// A step finished. Aggregate results of looped steps are ignored.
    pub fn step_ok(&mut self, op: &OperationResult) {
        if op.looped {
            return;
        }
        self.record(op);
    }

    /// One item of a looped step finished.
    pub fn item_ok(&mut self, op: &OperationResult) {
        self.record_with(op, true);
    }

    /// Record a completed step, routing on its own loop flags. Returns the
    /// number of undo tasks added.
    pub fn record(&mut self, op: &OperationResult) -> usize {
        self.record_with(op, op.is_loop_item)
    }

    fn record_with(&mut self, op: &OperationResult, as_item: bool) -> usize {
        if self.disabled || !op.changed {
            return 0;
        }
        if self.current.is_none() {
            self.audit.log(
                Level::Info,
                &format!("{} reported outside any unit; undoing it on {LOCAL_HOST}", op.type_id),
            );
            self.open_unit(ExecutionContext::local(self.source.clone()));
        }
        let Some(ledger) = self.current.as_mut() else {
            return 0;
        };
        let tctx = AuditCtx::new(
            &self.facts,
            &self.run_id,
            Some(ledger.unit_id().to_string()),
            ts_for(self.settings.deterministic_facts),
        );
        let slog = StageLogger::new(&tctx);
        let ctx = RecordCtx { registry: &self.registry, audit: &self.audit, slog: &slog };
        if as_item {
            ledger.record_item(op, &ctx)
        } else {
            ledger.record(op, &ctx)
        }
    }

    /// Close the open unit and write its plan. Returns the written path.
    pub fn flush(&mut self) -> Option<PathBuf> {
        let ledger = self.current.take()?;
        if self.disabled {
            return None;
        }
        let name = emit::file_name(&self.source, ledger.ordinal());
        let uid = ledger.unit_id().to_string();
        let tctx = AuditCtx::new(&self.facts, &self.run_id, Some(uid), ts_for(self.settings.deterministic_facts));
        let slog = StageLogger::new(&tctx);

        let Some(plan) = ledger.into_plan() else {
            slog.emit().field("reason", json!("empty")).emit_skip();
            return None;
        };
        let count = plan.actions.len();
        match emit::write(&plan, &self.settings.output_dir, &name) {
            Ok(path) => {
                self.audit.log(
                    Level::Info,
                    &format!("rollback plan with {count} task(s) written to {}", path.display()),
                );
                slog.emit()
                    .field("path", json!(path.display().to_string()))
                    .field("tasks", json!(count))
                    .emit_success();
                self.written.push(path.clone());
                Some(path)
            }
            Err(e) => {
                let err = ApiError::from(e);
                self.audit.log(Level::Warn, &err.to_string());
                slog.emit()
                    .field("file", json!(name))
                    .field("error", json!(err.to_string()))
                    .field("error_id", json!(id_str(err.id())))
                    .emit_failure();
                None
            }
        }
    }

    /// Final notification: flush the open unit. Returns every document
    /// written during the run.
    pub fn run_finished(&mut self) -> Vec<PathBuf> {
        self.flush();
        self.written.clone()
    }
}
