use std::collections::BTreeMap;

use globset::GlobSet;

use crate::model::{Changelist, DepotPath};
use crate::p4::Perforce;
use crate::parse;

/// Fold changelists, ascending, into `{depot path -> changelist}`.
///
/// Later changelists overwrite earlier entries for the same path, so each
/// surviving value is the highest changelist in the input set that touched
/// that path with a non-delete action. A changelist whose describe query
/// yields nothing contributes nothing.
pub fn build(
    p4: &Perforce,
    scripts: &GlobSet,
    changes: &[Changelist],
) -> BTreeMap<DepotPath, Changelist> {
    let mut ordered = changes.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut map = BTreeMap::new();
    for change in ordered {
        let text = p4.describe(change);
        if text.is_empty() {
            tracing::warn!(%change, "describe returned no output, skipping changelist");
            continue;
        }
        for (path, action) in parse::describe::affected_files(&text, scripts) {
            tracing::debug!(%change, depot = %path, %action, "depot candidate");
            map.insert(path, change);
        }
    }
    map
}
