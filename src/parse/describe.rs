use std::collections::BTreeMap;

use globset::GlobSet;

use crate::model::{DepotPath, FileAction};

use super::is_script;

const AFFECTED_HEADER: &str = "Affected files ...";
const SHELVED_HEADER: &str = "Shelved files ...";

/// Script files touched by one changelist, keyed by depot path.
///
/// Reads the block following the "Affected files ..." header, falling back to
/// "Shelved files ..." for pending changelists. Deletions and non-script
/// paths are dropped; malformed lines are skipped, and text without either
/// header yields an empty map.
pub fn affected_files(text: &str, scripts: &GlobSet) -> BTreeMap<DepotPath, FileAction> {
    let block = file_block(text, AFFECTED_HEADER)
        .or_else(|| file_block(text, SHELVED_HEADER))
        .unwrap_or_default();

    let mut out = BTreeMap::new();
    for line in block {
        // `... //depot/path#rev action`
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        let action = FileAction::from_token(tokens[2]);
        if action.is_delete() {
            continue;
        }
        let (path, _rev) = DepotPath::split_revision(tokens[1]);
        if !is_script(&path, scripts) {
            continue;
        }
        out.insert(path, action);
    }
    out
}

/// Lines between `header` and the next blank line, ignoring the blank line
/// the server emits directly after the header.
fn file_block<'a>(text: &'a str, header: &str) -> Option<Vec<&'a str>> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| line.trim_start().starts_with(header))?;
    Some(
        lines
            .skip_while(|line| line.trim().is_empty())
            .take_while(|line| !line.trim().is_empty())
            .collect(),
    )
}
