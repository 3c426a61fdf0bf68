//! Rollback document rendering and writing.
//!
//! The document is staged under a temporary name in the output directory and
//! renamed into place, so readers never observe a half-written plan.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::{ROLLBACK_SUFFIX, TMP_SUFFIX};
use crate::types::errors::Result;
use crate::types::RollbackPlan;

/// Deterministic file name for the `ordinal`-th unit of a run.
/// Only the basename of `source` is used.
pub fn file_name(source: &str, ordinal: usize) -> String {
    let base = Path::new(source)
        .file_name()
        .map_or_else(|| source.to_string(), |n| n.to_string_lossy().into_owned());
    if ordinal == 0 {
        format!("{base}.{ROLLBACK_SUFFIX}")
    } else {
        format!("{base}.{ordinal}.{ROLLBACK_SUFFIX}")
    }
}

/// Serialize a plan as YAML. Key and task order are preserved.
pub fn render(plan: &RollbackPlan) -> Result<String> {
    Ok(serde_yaml::to_string(&plan.document())?)
}

// Unique staging names within a process.
static NEXT_TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write `plan` into `dir`, replacing any previous document of the same name.
///
/// The staged file is synced before the rename and the directory after it.
/// On any failure the staged file is removed, so `dir` never holds a partial plan.
pub fn write(plan: &RollbackPlan, dir: &Path, name: &str) -> Result<PathBuf> {
    let body = render(plan)?;
    let target = dir.join(name);
    let ctr = NEXT_TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".{name}.{}.{ctr}{TMP_SUFFIX}", std::process::id()));
    if let Err(e) = stage_and_rename(&tmp, &target, body.as_bytes()) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    fsync_parent_dir(&target)?;
    Ok(target)
}

fn stage_and_rename(tmp: &Path, target: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut f = fs::File::create(tmp)?;
    f.write_all(body)?;
    f.sync_all()?;
    drop(f);
    fs::rename(tmp, target)
}

/// Fsync the parent directory of `path` so the rename is durable.
fn fsync_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::File::open(parent)?.sync_all()?;
    }
    Ok(())
}
