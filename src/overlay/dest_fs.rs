use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Erase and recreate the destination root. The overlay is always rebuilt
/// from scratch, never updated in place.
pub(super) fn reset_dest_root(root: &Path) -> Result<()> {
    if root.exists() {
        fs::remove_dir_all(root).with_context(|| format!("remove dir {}", root.display()))?;
    }
    fs::create_dir_all(root).with_context(|| format!("create dir {}", root.display()))?;
    Ok(())
}

pub(super) fn write_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(dest, bytes).with_context(|| format!("write file {}", dest.display()))?;
    Ok(())
}
