use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::constants::{REDACTED, SECRET_KEYS};

pub const TS_ZERO: &str = "1970-01-01T00:00:00Z";

pub fn now_iso() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| TS_ZERO.to_string())
}

/// Timestamp for a fact: constant when deterministic output is requested.
pub fn ts_for(deterministic: bool) -> String {
    if deterministic {
        TS_ZERO.to_string()
    } else {
        now_iso()
    }
}

/// Mask secret-bearing values at any depth of a fact.
/// Keys listed in `SECRET_KEYS` keep their presence but lose their value.
pub fn redact_event(mut v: Value) -> Value {
    mask_secrets(&mut v);
    v
}

fn mask_secrets(v: &mut Value) {
    match v {
        Value::Object(obj) => {
            for (k, inner) in obj.iter_mut() {
                if SECRET_KEYS.contains(&k.as_str()) && !inner.is_null() {
                    *inner = Value::String(REDACTED.into());
                } else {
                    mask_secrets(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(mask_secrets),
        _ => {}
    }
}
