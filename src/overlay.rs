use std::path::Path;

use anyhow::Result;

use crate::model::{Changelist, OverlayConfig, OverlayManifest};
use crate::p4::Perforce;

pub mod depot_map;
pub mod local_files;
pub mod materialize;
pub mod translate;

mod dest_fs;

pub use self::local_files::LocalOpenedFile;
pub use self::materialize::MaterializeOptions;

/// Resolve a batch of changelists and rebuild the overlay folder.
///
/// `workspace` may be empty, which skips local-file resolution entirely and
/// sources everything from the depot.
pub fn build_overlay(
    p4: &Perforce,
    config: &OverlayConfig,
    workspace: &str,
    changes: &[Changelist],
    dest_root: &Path,
    options: &MaterializeOptions,
) -> Result<OverlayManifest> {
    let scripts = config.script_matcher()?;
    let depot = depot_map::build(p4, &scripts, changes);
    let locals = local_files::resolve(p4, &scripts, workspace, changes);
    materialize::materialize(p4, config, dest_root, depot, locals, options)
}
