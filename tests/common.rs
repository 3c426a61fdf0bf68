//! Shared test helpers for the rollbook crate integration tests.
#![allow(dead_code)]

use log::Level;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use rollbook::logging::{AuditSink, FactsEmitter};
use rollbook::types::{ExecutionContext, OperationResult};

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    /// `(decision, fields)` of every fact emitted for `event`.
    pub fn stage(&self, event: &str) -> Vec<(String, Value)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e, _, _)| e == event)
            .map(|(_, _, d, f)| (d.clone(), f.clone()))
            .collect()
    }
}

/// Audit sink that keeps every advisory line.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

impl TestAudit {
    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == Level::Warn)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

/// Create a temporary directory to receive rollback documents.
pub fn with_temp_out() -> tempfile::TempDir {
    tempfile::tempdir().expect("tempdir")
}

pub fn unit(name: &str) -> ExecutionContext {
    ExecutionContext::new(name, &["localhost"], "local")
}

/// A changed `ec2_vol` creation reporting `volume.id == id`.
pub fn volume(label: &str, id: &str) -> OperationResult {
    OperationResult::new("amazon.aws.ec2_vol")
        .with_label(label)
        .with_arguments(json!({"state": "present", "volume_size": 8}))
        .with_payload(json!({"volume": {"id": id}}))
        .changed(true)
}

/// Parse a written rollback document.
pub fn read_plan(path: &std::path::Path) -> serde_yaml::Value {
    let body = std::fs::read_to_string(path).expect("read plan");
    serde_yaml::from_str(&body).expect("parse plan")
}

/// Task list of the single play in a parsed document.
pub fn tasks(doc: &serde_yaml::Value) -> Vec<serde_yaml::Value> {
    doc[0]["tasks"].as_sequence().cloned().unwrap_or_default()
}
