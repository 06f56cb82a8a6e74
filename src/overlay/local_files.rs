use std::collections::BTreeMap;
use std::path::PathBuf;

use globset::GlobSet;

use crate::model::{Changelist, DepotPath};
use crate::p4::Perforce;
use crate::parse;

/// A file currently opened for edit in the workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalOpenedFile {
    pub local_path: PathBuf,
    pub change: Changelist,
}

/// Locally opened script files across the given changelists, keyed by depot
/// path.
///
/// An empty workspace name is an explicit opt-out: no query is issued and the
/// result is empty. Changelists are visited ascending and later entries
/// overwrite earlier ones, so a path opened under several changelists
/// resolves to the highest one. Files whose where-query yields no usable
/// output are skipped.
pub fn resolve(
    p4: &Perforce,
    scripts: &GlobSet,
    workspace: &str,
    changes: &[Changelist],
) -> BTreeMap<DepotPath, LocalOpenedFile> {
    let mut map = BTreeMap::new();
    if workspace.is_empty() {
        return map;
    }

    let mut ordered = changes.to_vec();
    ordered.sort();
    ordered.dedup();

    for change in ordered {
        let text = p4.opened(workspace, change);
        if text.is_empty() {
            tracing::debug!(%change, workspace, "no opened files");
            continue;
        }
        for path in parse::opened::opened_files(&text, scripts) {
            let where_text = p4.where_file(workspace, &path);
            let Some(local_path) = parse::whereis::local_path(&where_text) else {
                tracing::warn!(depot = %path, "where query gave no local path, skipping");
                continue;
            };
            map.insert(path, LocalOpenedFile { local_path, change });
        }
    }
    map
}
