//! A host can plug its own namespace into the engine.

mod common;

use common::*;
use rollbook::policy::{CredentialPolicy, Settings};
use rollbook::providers::{Creation, InvertError, Inversion, Provider, ProviderRegistry};
use rollbook::types::{InverseAction, OperationResult};
use rollbook::Rollbook;
use serde_json::json;
use serde_yaml::Value as Y;

fn zone(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let name = op
        .output("zone.name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| InvertError::MissingField("zone.name".into()))?;
    Ok(Inversion::one(InverseAction::new(type_id).arg("state", "absent").arg("name", name)))
}

fn registry() -> ProviderRegistry {
    let mut reg = ProviderRegistry::with_defaults();
    reg.register(
        Provider::new("dns", "example.dns", CredentialPolicy::new(&["api_token"]))
            .inverter("zone", Creation::Declared, zone),
    )
    .unwrap();
    reg
}

#[test]
fn registered_provider_inverts_through_the_facade() {
    let out = with_temp_out();
    let mut rb = Rollbook::new(TestEmitter::default(), TestAudit::default(), Settings::default().with_output_dir(out.path()))
        .with_registry(registry());
    rb.unit_started(unit("Dns"));
    rb.step_ok(&volume("disk", "vol-1"));
    rb.step_ok(
        &OperationResult::new("example.dns.zone")
            .with_label("zone")
            .with_arguments(json!({"state": "present", "api_token": "t0k", "ttl": 60}))
            .with_payload(json!({"zone": {"name": "example.org"}}))
            .changed(true),
    );
    let written = rb.run_finished();

    let t = tasks(&read_plan(&written[0]));
    assert_eq!(t.len(), 2);
    assert_eq!(t[0]["name"], Y::from("(UNDO) zone"));
    let zone = &t[0]["example.dns.zone"];
    assert_eq!(zone["name"], Y::from("example.org"));
    assert_eq!(zone["api_token"], Y::from("t0k"));
    assert!(zone.get("ttl").is_none());
    assert_eq!(t[1]["amazon.aws.ec2_vol"]["id"], Y::from("vol-1"));
}

#[test]
fn overlapping_namespace_is_refused() {
    let mut reg = ProviderRegistry::with_defaults();
    let err = reg
        .register(Provider::new("aws-extra", "amazon.aws.extra", CredentialPolicy::none()))
        .unwrap_err();
    assert_eq!(rollbook::errors::id_str(err.id()), "E_CONFIG");
}
