use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::{
    Changelist, CopiedEntry, DepotPath, DownloadedEntry, OverlayConfig, OverlayManifest,
};
use crate::p4::Perforce;

use super::dest_fs;
use super::local_files::LocalOpenedFile;
use super::translate;

pub struct MaterializeOptions {
    pub archive: bool,
    pub reveal: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        MaterializeOptions {
            archive: true,
            reveal: true,
        }
    }
}

/// Rebuild the destination tree from the resolved maps.
///
/// The destination root is erased first; a depot path present in both maps is
/// sourced exclusively from the local file. Per-file failures (unresolvable
/// path, unreadable source, empty print output, write errors) are logged and
/// skipped; the run always completes with whatever subset succeeded. Only a
/// destination root that cannot be recreated is an error.
pub fn materialize(
    p4: &Perforce,
    config: &OverlayConfig,
    dest_root: &Path,
    mut depot: BTreeMap<DepotPath, Changelist>,
    locals: BTreeMap<DepotPath, LocalOpenedFile>,
    options: &MaterializeOptions,
) -> Result<OverlayManifest> {
    dest_fs::reset_dest_root(dest_root)?;
    let mut manifest = OverlayManifest::new(now_rfc3339());

    // Local entries supersede the depot map up front, even when the copy
    // below later fails; a superseded path is never depot-fetched.
    for path in locals.keys() {
        if depot.remove(path).is_some() {
            tracing::debug!(depot = %path, "local copy supersedes depot version");
        }
    }

    for (path, local) in &locals {
        let Some(rel_dir) = translate::overlay_relative(path, &config.anchor, false) else {
            tracing::warn!(depot = %path, anchor = %config.anchor, "anchor not in path, skipping");
            continue;
        };
        let Some(name) = path.file_name() else {
            tracing::warn!(depot = %path, "depot path has no file name, skipping");
            continue;
        };
        let data = match fs::read(&local.local_path) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(
                    source = %local.local_path.display(),
                    %err,
                    "cannot read local file, skipping"
                );
                continue;
            }
        };
        let rel = rel_dir.join(name);
        let dest = dest_root.join(&rel);
        if let Err(err) = dest_fs::write_file(&dest, &data) {
            tracing::warn!(depot = %path, %err, "copy failed, skipping");
            continue;
        }
        tracing::debug!(depot = %path, dest = %dest.display(), "copied local file");
        manifest.copied.push(CopiedEntry {
            depot_path: path.clone(),
            change: local.change,
            source: local.local_path.display().to_string(),
            dest: rel_display(&rel),
            size: data.len() as u64,
            digest: blake3::hash(&data).to_hex().to_string(),
        });
    }

    for (path, change) in &depot {
        let text = p4.print_at(path, *change);
        if text.is_empty() {
            tracing::warn!(depot = %path, %change, "print returned no output, skipping");
            continue;
        }
        let content = strip_banner(&text);
        let Some(rel) = translate::overlay_relative(path, &config.anchor, true) else {
            tracing::warn!(depot = %path, anchor = %config.anchor, "anchor not in path, skipping");
            continue;
        };
        let dest = dest_root.join(&rel);
        if let Err(err) = dest_fs::write_file(&dest, content.as_bytes()) {
            tracing::warn!(depot = %path, %err, "write failed, skipping");
            continue;
        }
        tracing::debug!(depot = %path, %change, dest = %dest.display(), "downloaded depot file");
        manifest.downloaded.push(DownloadedEntry {
            depot_path: path.clone(),
            change: *change,
            dest: rel_display(&rel),
            size: content.len() as u64,
            digest: blake3::hash(content.as_bytes()).to_hex().to_string(),
        });
    }

    if manifest.is_empty() {
        tracing::info!("overlay is empty, nothing to archive");
        return Ok(manifest);
    }

    write_manifest(dest_root, &manifest);
    if options.archive && !p4.archive_dir(dest_root) {
        tracing::warn!(dest = %dest_root.display(), "archive step failed");
    }
    if options.reveal && !p4.reveal_dir(dest_root) {
        tracing::warn!(dest = %dest_root.display(), "reveal step failed");
    }
    tracing::info!(
        copied = manifest.copied.len(),
        downloaded = manifest.downloaded.len(),
        "overlay rebuilt"
    );
    Ok(manifest)
}

/// The first line of `p4 print` output names the depot file, not content.
fn strip_banner(text: &str) -> &str {
    match text.split_once('\n') {
        Some((_banner, rest)) => rest,
        None => "",
    }
}

/// Manifest lands next to the destination root, not inside it, so a rebuild
/// with identical inputs leaves the tree byte-identical.
fn write_manifest(dest_root: &Path, manifest: &OverlayManifest) {
    let Some(path) = manifest_path(dest_root) else {
        tracing::warn!(dest = %dest_root.display(), "cannot derive manifest location");
        return;
    };
    let bytes = match serde_json::to_vec_pretty(manifest) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%err, "serialize manifest failed");
            return;
        }
    };
    if let Err(err) = fs::write(&path, &bytes) {
        tracing::warn!(path = %path.display(), %err, "write manifest failed");
    }
}

pub fn manifest_path(dest_root: &Path) -> Option<PathBuf> {
    let name = dest_root.file_name()?.to_str()?;
    Some(dest_root.with_file_name(format!("{name}.manifest.json")))
}

fn rel_display(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}
