use serde::Serialize;
use serde_json::Value;

use super::action::RollbackAction;
use super::operation::ExecutionContext;

/// Ordered undo tasks of one execution unit, most recent creation first.
#[derive(Clone, Debug, PartialEq)]
pub struct RollbackPlan {
    pub context: ExecutionContext,
    pub actions: Vec<RollbackAction>,
}

impl RollbackPlan {
    /// Wrap the finished sequence; `None` when nothing was created.
    pub fn from_actions(context: ExecutionContext, actions: Vec<RollbackAction>) -> Option<Self> {
        if actions.is_empty() {
            return None;
        }
        Some(Self { context, actions })
    }

    /// Document body: a single play holding every undo task.
    pub fn document(&self) -> Vec<PlayDocument<'_>> {
        let hosts = match self.context.hosts.as_slice() {
            [one] => Value::String(one.clone()),
            many => Value::from(many.to_vec()),
        };
        vec![PlayDocument {
            name: &self.context.name,
            hosts,
            connection: &self.context.connection,
            gather_facts: self.context.gather_facts,
            tasks: &self.actions,
        }]
    }
}

/// Field order here is the key order of the written document.
#[derive(Debug, Serialize)]
pub struct PlayDocument<'a> {
    pub name: &'a str,
    pub hosts: Value,
    pub connection: &'a str,
    pub gather_facts: bool,
    pub tasks: &'a [RollbackAction],
}
