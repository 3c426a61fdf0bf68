#![forbid(unsafe_code)]
//! Rollbook: rollback playbooks for declarative cloud runs.
//!
//! The host engine reports every completed step. Steps that created a
//! resource are inverted into the operation that destroys it, and the undo
//! tasks of an execution unit are written newest first as one playbook.
//!
//! Highlights:
//! - Inverters are plain functions in per-namespace dispatch tables (`providers`).
//! - Only whitelisted credential arguments are carried into undo tasks (`policy`).
//! - Nothing is ever raised to the host; problems become advisory log lines.

pub mod api;
pub mod constants;
pub mod logging;
pub mod policy;
pub mod providers;
pub mod types;

pub use api::*;
