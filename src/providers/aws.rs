//! Inverters for the `amazon.aws` collection.
//!
//! Every inverter reads the identifiers the module reported and builds the
//! matching `state: absent` call. Field paths follow the module return
//! values (e.g. `ec2_vol` returns `volume.id`).
use serde_json::{Map, Value};

use super::{Creation, InvertError, Inversion, Provider};
use crate::constants::{STATE_ABSENT, STATE_TERMINATED};
use crate::policy::CredentialPolicy;
use crate::types::{as_text, InverseAction, OperationResult};

pub const PREFIX: &str = "amazon.aws";

/// Arguments copied from the original step into every undo task.
pub const CREDENTIAL_KEYS: &[&str] = &["access_key", "secret_key", "region", "aws_config", "profile"];

const EIP_TYPE: &str = "amazon.aws.ec2_eip";
const S3_BUCKET_TYPE: &str = "amazon.aws.s3_bucket";

/// Types recognized but deliberately left out of rollback plans.
pub const UNSUPPORTED: &[&str] = &[
    "ec2_transit_gateway",
    "ec2_transit_gateway_vpc_attachment",
    "ec2_vpc_egress_igw",
    "ec2_vpc_peering",
    "ec2_vpc_vgw",
    "ec2_vpc_vpn",
    "elb_application_lb",
    "elb_classic_lb",
    "iam_access_key",
    "iam_group",
    "iam_instance_profile",
    "iam_managed_policy",
    "iam_password_policy",
    "iam_policy",
    "iam_role",
    "iam_user",
    "kms_key",
    "lambda",
    "lambda_alias",
    "lambda_event",
    "lambda_execute",
    "lambda_layer",
    "lambda_policy",
    "rds_cluster",
    "rds_cluster_param_group",
    "rds_cluster_snapshot",
    "rds_instance",
    "rds_instance_param_group",
    "rds_instance_snapshot",
    "rds_option_group",
    "route53",
    "route53_key_signing_key",
    "route53_zone",
];

pub fn provider() -> Provider {
    use Creation::{Declared, Implicit};
    let p = Provider::new("aws", PREFIX, CredentialPolicy::new(CREDENTIAL_KEYS))
        .inverter("ec2_ami", Declared, ec2_ami)
        .inverter("ec2_eip", Declared, ec2_eip)
        .inverter("ec2_eni", Declared, ec2_eni)
        .inverter("ec2_key", Declared, ec2_key)
        .inverter("ec2_instance", Implicit, ec2_instance)
        .inverter("ec2_launch_template", Declared, ec2_launch_template)
        .inverter("ec2_placement_group", Declared, ec2_placement_group)
        .inverter("ec2_security_group", Declared, ec2_security_group)
        .inverter("ec2_snapshot", Declared, ec2_snapshot)
        .inverter("ec2_spot_instance", Declared, ec2_spot_instance)
        .inverter("ec2_tag", Declared, ec2_tag)
        .inverter("ec2_vol", Declared, ec2_vol)
        .inverter("ec2_vpc_dhcp_option", Declared, ec2_vpc_dhcp_option)
        .inverter("ec2_vpc_endpoint", Declared, ec2_vpc_endpoint)
        .inverter("ec2_vpc_igw", Declared, ec2_vpc_igw)
        .inverter("ec2_vpc_nacl", Declared, ec2_vpc_nacl)
        .inverter("ec2_vpc_nat_gateway", Declared, ec2_vpc_nat_gateway)
        .inverter("ec2_vpc_net", Declared, ec2_vpc_net)
        .inverter("ec2_vpc_route_table", Declared, ec2_vpc_route_table)
        .inverter("ec2_vpc_subnet", Declared, ec2_vpc_subnet)
        .inverter("s3_bucket", Declared, s3_bucket)
        .inverter("s3_object", Implicit, s3_object);
    UNSUPPORTED.iter().fold(p, |p, short| p.unsupported(*short))
}

fn output_text(op: &OperationResult, path: &str) -> Result<String, InvertError> {
    op.output(path).and_then(as_text).ok_or_else(|| InvertError::MissingField(path.to_string()))
}

fn argument_text(op: &OperationResult, key: &str) -> Result<String, InvertError> {
    op.argument(key).and_then(as_text).ok_or_else(|| InvertError::MissingArgument(key.to_string()))
}

fn absent(type_id: &str) -> InverseAction {
    InverseAction::new(type_id).arg("state", STATE_ABSENT)
}

/// Destroy call identified by a single payload field.
fn by_output(
    type_id: &str,
    op: &OperationResult,
    path: &str,
    key: &str,
) -> Result<Inversion, InvertError> {
    let id = output_text(op, path)?;
    Ok(Inversion::one(absent(type_id).arg(key, id)))
}

fn release_eip(public_ip: String, in_vpc: Value) -> InverseAction {
    absent(EIP_TYPE)
        .arg("public_ip", public_ip)
        .arg("in_vpc", in_vpc)
        .arg("release_on_disassociation", true)
}

fn ec2_ami(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "image_id", "image_id")
}

fn ec2_eip(_type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let public_ip = output_text(op, "public_ip")?;
    let in_vpc = op.argument("in_vpc").cloned().unwrap_or(Value::Bool(false));
    Ok(Inversion::one(release_eip(public_ip, in_vpc)))
}

fn ec2_eni(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "interface.id", "eni_id")
}

fn ec2_key(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "key.name", "name")
}

fn ec2_instance(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let ids = op
        .output("changed_ids")
        .or_else(|| op.output("instance_ids"))
        .and_then(Value::as_array)
        .ok_or_else(|| InvertError::MissingField("instance_ids".into()))?;
    let ids: Vec<String> = ids.iter().filter_map(as_text).collect();
    if ids.is_empty() {
        return Ok(Inversion::none().with_note("no instance ids reported; nothing to terminate"));
    }
    Ok(Inversion::one(
        InverseAction::new(type_id).arg("state", STATE_TERMINATED).arg("instance_ids", ids),
    ))
}

fn ec2_launch_template(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "template.launch_template_name", "template_name")
}

fn ec2_placement_group(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "placement_group.name", "name")
}

fn ec2_security_group(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "group_id", "group_id")
}

fn ec2_snapshot(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "snapshot_id", "snapshot_id")
}

fn ec2_spot_instance(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let id = output_text(op, "spot_request.spot_instance_request_id")?;
    Ok(Inversion::one(absent(type_id).arg("spot_instance_request_ids", vec![id])))
}

fn ec2_tag(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let resource = argument_text(op, "resource")?;
    let tags = op
        .argument("tags")
        .and_then(Value::as_object)
        .ok_or_else(|| InvertError::MissingArgument("tags".into()))?;
    let tags: Map<String, Value> = tags
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(as_text(v).unwrap_or_else(|| v.to_string()))))
        .collect();
    Ok(Inversion::one(absent(type_id).arg("resource", resource).arg("tags", tags)))
}

fn ec2_vol(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "volume.id", "id")
}

fn ec2_vpc_dhcp_option(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "dhcp_options_id", "dhcp_options_id")
}

fn ec2_vpc_endpoint(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "result.vpc_endpoint_id", "vpc_endpoint_id")
}

// The igw module looks gateways up by their VPC.
fn ec2_vpc_igw(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "vpc_id", "vpc_id")
}

fn ec2_vpc_nacl(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "nacl_id", "nacl_id")
}

/// Gateway removal, preceded by the release of every address the module
/// allocated on its own (only when the operator gave no `allocation_id`).
fn ec2_vpc_nat_gateway(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let gateway_id = output_text(op, "nat_gateway_id")?;
    let mut inv = Inversion::none();

    let operator_allocated = op.argument("allocation_id").and_then(as_text).is_some_and(|s| !s.is_empty());
    if !operator_allocated {
        let addresses = op.output("nat_gateway_addresses").and_then(Value::as_array);
        for addr in addresses.into_iter().flatten() {
            match addr.get("public_ip").and_then(as_text) {
                Some(ip) => inv.push(release_eip(ip, Value::Bool(true))),
                None => {
                    let allocation = addr.get("allocation_id").and_then(as_text);
                    inv.note(format!(
                        "public_ip missing for allocation {}: this EIP will not be released",
                        allocation.as_deref().unwrap_or("<unknown>")
                    ));
                }
            }
        }
    }

    inv.push(absent(type_id).arg("nat_gateway_id", gateway_id));
    Ok(inv)
}

fn ec2_vpc_net(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "vpc.id", "vpc_id")
}

fn ec2_vpc_route_table(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let id = output_text(op, "route_table.route_table_id")?;
    Ok(Inversion::one(absent(type_id).arg("route_table_id", id).arg("lookup", "id")))
}

fn ec2_vpc_subnet(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let vpc_id = output_text(op, "subnet.vpc_id")?;
    let cidr = output_text(op, "subnet.cidr_block")?;
    Ok(Inversion::one(absent(type_id).arg("vpc_id", vpc_id).arg("cidr", cidr)))
}

fn s3_bucket(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    by_output(type_id, op, "name", "name")
}

/// `put` and `copy` upload an object; `create` makes a directory key or,
/// without `object`, the bucket itself. Other modes create nothing.
fn s3_object(type_id: &str, op: &OperationResult) -> Result<Inversion, InvertError> {
    let mode = op.argument("mode").and_then(Value::as_str).unwrap_or_default();
    if !matches!(mode, "put" | "copy" | "create") {
        return Ok(Inversion::none());
    }
    let bucket = argument_text(op, "bucket")?;
    match op.argument("object").and_then(as_text).filter(|o| !o.is_empty()) {
        Some(object) => Ok(Inversion::one(
            InverseAction::new(type_id)
                .arg("mode", "delobj")
                .arg("object", object)
                .arg("bucket", bucket),
        )),
        None if mode == "create" => Ok(Inversion::one(absent(S3_BUCKET_TYPE).arg("name", bucket))),
        None => Err(InvertError::MissingArgument("object".into())),
    }
}
