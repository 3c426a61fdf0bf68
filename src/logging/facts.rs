use log::Level;
use serde_json::Value;

use crate::constants::LOG_PREFIX;

/// Receives structured facts, one per stage decision.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives the advisory lines shown to the operator.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// Silent sink; drops everything.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}

/// Forwards facts and advisory lines to the `log` facade.
#[derive(Default, Clone, Copy)]
pub struct LogSink;

impl FactsEmitter for LogSink {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        log::debug!(target: "rollbook::facts", "{subsystem} {event} {decision} {fields}");
    }
}

impl AuditSink for LogSink {
    fn log(&self, level: Level, msg: &str) {
        log::log!(target: "rollbook", level, "{LOG_PREFIX} {msg}");
    }
}
