// Audit helpers that emit facts across Rollbook stages.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `configure`, `record`, `invert` and `emit`.
// - Ensures a minimal envelope on every fact: `schema_version`, `ts`, `run_id`, `unit_id`.
// - Masks secret-bearing argument values before anything leaves the process.
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};

pub(crate) const SCHEMA_VERSION: i64 = 1;

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub run_id: &'a str,
    pub unit_id: Option<String>,
    pub ts: String,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        run_id: &'a str,
        unit_id: Option<String>,
        ts: String,
    ) -> Self {
        Self { facts, run_id, unit_id, ts }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Configure,
    Record,
    Invert,
    Emit,
}

impl Stage {
    fn as_event(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Record => "record",
            Stage::Invert => "invert",
            Stage::Emit => "emit",
        }
    }
}

/// Decision recorded on a fact.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Skip,
    Warn,
    Failure,
}

impl Decision {
    fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Skip => "skip",
            Decision::Warn => "warn",
            Decision::Failure => "failure",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self { Self { ctx } }

    pub fn configure(&self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Configure) }
    pub fn record(&self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Record) }
    pub fn invert(&self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Invert) }
    pub fn emit(&self) -> EventBuilder<'a> { EventBuilder::new(self.ctx, Stage::Emit) }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn type_id(mut self, type_id: impl Into<String>) -> Self {
        self.fields.insert("type_id".into(), json!(type_id.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
            obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
            obj.entry("ts").or_insert(json!(self.ctx.ts));
            obj.entry("run_id").or_insert(json!(self.ctx.run_id));
            obj.entry("unit_id").or_insert(json!(self.ctx.unit_id));
        }
        let out = redact_event(fields);
        self.ctx.facts.emit("rollbook", self.stage.as_event(), decision.as_str(), out);
    }

    pub fn emit_success(self) { self.emit(Decision::Success) }
    pub fn emit_skip(self) { self.emit(Decision::Skip) }
    pub fn emit_warn(self) { self.emit(Decision::Warn) }
    pub fn emit_failure(self) { self.emit(Decision::Failure) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Capture(RefCell<Vec<(String, String, Value)>>);

    impl FactsEmitter for Capture {
        fn emit(&self, _subsystem: &str, event: &str, decision: &str, fields: Value) {
            self.0.borrow_mut().push((event.into(), decision.into(), fields));
        }
    }

    #[test]
    fn envelope_is_filled_and_secrets_masked() {
        let cap = Capture::default();
        let ctx = AuditCtx::new(&cap, "run-1", Some("unit-1".into()), "T".into());
        StageLogger::new(&ctx)
            .invert()
            .type_id("amazon.aws.ec2_vol")
            .field("arguments", json!({"secret_key": "x"}))
            .emit_success();
        let events = cap.0.borrow();
        let (event, decision, fields) = &events[0];
        assert_eq!(event, "invert");
        assert_eq!(decision, "success");
        assert_eq!(fields["schema_version"], json!(1));
        assert_eq!(fields["run_id"], json!("run-1"));
        assert_eq!(fields["unit_id"], json!("unit-1"));
        assert_eq!(fields["type_id"], json!("amazon.aws.ec2_vol"));
        assert_eq!(fields["arguments"]["secret_key"], json!("***"));
    }
}
