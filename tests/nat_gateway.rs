//! A NAT gateway that allocated its own addresses is undone by releasing
//! the addresses first, then removing the gateway.

mod common;

use common::*;
use rollbook::policy::Settings;
use rollbook::types::OperationResult;
use rollbook::Rollbook;
use serde_json::{json, Value};
use serde_yaml::Value as Y;

fn gateway(addresses: Value) -> OperationResult {
    OperationResult::new("amazon.aws.ec2_vpc_nat_gateway")
        .with_label("nat")
        .with_arguments(json!({"state": "present", "subnet_id": "subnet-1", "region": "us-east-1"}))
        .with_payload(json!({"nat_gateway_id": "nat-1", "nat_gateway_addresses": addresses}))
        .changed(true)
}

#[test]
fn addresses_are_released_before_gateway_removal() {
    let out = with_temp_out();
    let mut rb = Rollbook::new(TestEmitter::default(), TestAudit::default(), Settings::default().with_output_dir(out.path()));
    rb.unit_started(unit("Network"));
    rb.step_ok(&volume("disk", "vol-1"));
    rb.step_ok(&gateway(json!([{"allocation_id": "eipalloc-1", "public_ip": "5.6.7.8"}])));
    let written = rb.run_finished();

    let t = tasks(&read_plan(&written[0]));
    assert_eq!(t.len(), 3);
    assert_eq!(t[0]["name"], Y::from("(UNDO) nat"));
    assert_eq!(t[0]["amazon.aws.ec2_eip"]["public_ip"], Y::from("5.6.7.8"));
    assert_eq!(t[0]["amazon.aws.ec2_eip"]["release_on_disassociation"], Y::from(true));
    assert_eq!(t[0]["amazon.aws.ec2_eip"]["region"], Y::from("us-east-1"));
    assert_eq!(t[1]["name"], Y::from("(UNDO) nat"));
    assert_eq!(t[1]["amazon.aws.ec2_vpc_nat_gateway"]["nat_gateway_id"], Y::from("nat-1"));
    assert_eq!(t[1]["amazon.aws.ec2_vpc_nat_gateway"]["region"], Y::from("us-east-1"));
    assert_eq!(t[2]["amazon.aws.ec2_vol"]["id"], Y::from("vol-1"));
}

#[test]
fn missing_public_ip_degrades_with_a_warning() {
    let out = with_temp_out();
    let audit = TestAudit::default();
    let mut rb = Rollbook::new(TestEmitter::default(), audit.clone(), Settings::default().with_output_dir(out.path()));
    rb.unit_started(unit("Network"));
    assert_eq!(rb.record(&gateway(json!([{"allocation_id": "eipalloc-7"}]))), 1);
    let written = rb.run_finished();

    let t = tasks(&read_plan(&written[0]));
    assert_eq!(t.len(), 1);
    assert!(t[0].get("amazon.aws.ec2_vpc_nat_gateway").is_some());
    let warnings = audit.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("eipalloc-7"), "{warnings:?}");
}
