//! Identifiers for runs and execution units.
//!
//! Unit IDs are UUIDv5 values derived from a stable tag (`NS_TAG`), so the
//! same run source, unit name and position always map to the same ID.
use uuid::Uuid;

use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Deterministic ID for the `ordinal`-th unit of a run.
#[must_use]
pub fn unit_id(source: &str, unit_name: &str, ordinal: usize) -> Uuid {
    let key = format!("{source}\n{unit_name}\n#{ordinal}");
    Uuid::new_v5(&namespace(), key.as_bytes())
}

/// Fresh random ID correlating every fact emitted during one run.
#[must_use]
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
