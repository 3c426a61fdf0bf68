use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::operation::Args;

/// Output of an inverter: the operation that undoes one created resource.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseAction {
    pub type_id: String,
    pub arguments: Args,
}

impl InverseAction {
    pub fn new(type_id: impl Into<String>) -> Self {
        Self { type_id: type_id.into(), arguments: Args::new() }
    }

    /// Append an argument, keeping insertion order.
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }
}

/// Finalized undo task: a label plus the inverse operation.
#[derive(Clone, Debug, PartialEq)]
pub struct RollbackAction {
    label: String,
    type_id: String,
    arguments: Args,
}

impl RollbackAction {
    pub(crate) fn new(label: String, inverse: InverseAction) -> Self {
        Self { label, type_id: inverse.type_id, arguments: inverse.arguments }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn arguments(&self) -> &Args {
        &self.arguments
    }
}

/// Serialized as `{name: <label>, <type_id>: {arguments}}`, label first.
impl Serialize for RollbackAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("name", &self.label)?;
        map.serialize_entry(&self.type_id, &self.arguments)?;
        map.end()
    }
}
