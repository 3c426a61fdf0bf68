//! Inputs delivered by the host engine: completed steps and unit boundaries.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{INTENT_ARG, LOCAL_CONNECTION, LOCAL_HOST};

/// Ordered mapping of parameter or output names to values.
pub type Args = Map<String, Value>;

/// One completed step of the original run.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OperationResult {
    /// Fully-qualified resource type, e.g. `amazon.aws.ec2_vol`.
    pub type_id: String,
    /// Arguments as declared by the operator.
    pub arguments: Args,
    /// Output produced by executing the step.
    pub payload: Args,
    pub changed: bool,
    pub label: Option<String>,
    /// The step declares a loop; its aggregate result is never inverted.
    pub looped: bool,
    /// This result is one item of a looped step.
    pub is_loop_item: bool,
}

impl OperationResult {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self { type_id: type_id.into(), ..Self::default() }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = into_args(arguments);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = into_args(payload);
        self
    }

    pub fn changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }

    pub fn loop_item(mut self) -> Self {
        self.looped = true;
        self.is_loop_item = true;
        self
    }

    pub fn loop_aggregate(mut self) -> Self {
        self.looped = true;
        self.is_loop_item = false;
        self
    }

    /// Aggregate result of a looped step; only its items count.
    #[must_use]
    pub fn is_loop_aggregate(&self) -> bool {
        self.looped && !self.is_loop_item
    }

    /// Declared idempotency intent (`state`), when given as text.
    #[must_use]
    pub fn intent(&self) -> Option<&str> {
        self.arguments.get(INTENT_ARG).and_then(Value::as_str)
    }

    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key).filter(|v| !v.is_null())
    }

    /// Walk a dotted path through the payload, e.g. `volume.id`.
    pub fn output(&self, path: &str) -> Option<&Value> {
        lookup(&self.payload, path)
    }
}

/// Resolve a dotted path inside an object map.
pub(crate) fn lookup<'a>(map: &'a Args, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut cur = map.get(first)?;
    for p in parts {
        cur = cur.as_object()?.get(p)?;
    }
    if cur.is_null() {
        None
    } else {
        Some(cur)
    }
}

/// Read a value as an identifier string. Strings pass through; numbers and
/// booleans use their display form; containers are not identifiers.
pub fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn into_args(v: Value) -> Args {
    match v {
        Value::Object(map) => map,
        _ => Args::new(),
    }
}

/// Top-level metadata of an execution unit, copied into its rollback plan.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionContext {
    pub name: String,
    pub hosts: Vec<String>,
    pub connection: String,
    pub gather_facts: bool,
}

impl ExecutionContext {
    pub fn new(name: impl Into<String>, hosts: &[&str], connection: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: hosts.iter().map(|h| (*h).to_string()).collect(),
            connection: connection.into(),
            gather_facts: false,
        }
    }

    /// Unit targeting the control node over a local connection.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(name, &[LOCAL_HOST], LOCAL_CONNECTION)
    }

    pub fn gather_facts(mut self, on: bool) -> Self {
        self.gather_facts = on;
        self
    }
}
