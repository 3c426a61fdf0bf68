//! Shared crate-wide constants for Rollbook.
//!
//! Centralizes magic values and default labels used across modules.
//! Adjusting these here will propagate through the crate.

/// Prefix prepended to the label of the step an undo task reverses.
pub const UNDO_LABEL_PREFIX: &str = "(UNDO) ";

/// Label used for undo tasks whose original step carried no name.
pub const UNLABELED_PLACEHOLDER: &str = "empty";

/// Suffix appended to the run source name when naming a rollback document.
/// Example: `site.yml` produces `site.yml.rollback`.
pub const ROLLBACK_SUFFIX: &str = "rollback";

/// Temporary filename suffix used while a rollback document is staged
/// next to its final name, e.g. `.site.yml.rollback.<pid>.<n>.rollbook.tmp`.
pub const TMP_SUFFIX: &str = ".rollbook.tmp";

/// Source name used when the host never announced the run.
pub const DEFAULT_SOURCE_NAME: &str = "rollbook";

/// Host and connection of a unit opened for steps reported outside any unit.
/// Cloud modules run on the control node.
pub const LOCAL_HOST: &str = "localhost";
pub const LOCAL_CONNECTION: &str = "local";

/// Default output directory for rollback documents.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_PATH: &str = "ROLLBOOK_OUTPUT_PATH";

/// Argument carrying the operator's idempotency intent.
pub const INTENT_ARG: &str = "state";
/// Intent value meaning "make sure the resource exists".
pub const STATE_PRESENT: &str = "present";
/// Intent value written into inverse actions to destroy a resource.
pub const STATE_ABSENT: &str = "absent";
/// Destroy value for instance-like resources.
pub const STATE_TERMINATED: &str = "terminated";

/// Prefix attached to every advisory line sent to an `AuditSink`.
pub const LOG_PREFIX: &str = "[rollbook]";

/// UUIDv5 namespace tag for deterministic unit IDs.
pub const NS_TAG: &str = "https://rollbook.dev/units";

/// Mask written over secret-bearing values in emitted facts.
pub const REDACTED: &str = "***";

/// Argument names whose values never appear in facts in clear text.
pub const SECRET_KEYS: &[&str] = &[
    "secret_key",
    "access_key",
    "aws_secret_key",
    "aws_access_key",
    "session_token",
    "security_token",
    "password",
];
