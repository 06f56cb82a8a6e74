use globset::GlobSet;

use crate::model::{DepotPath, FileAction};

use super::is_script;

/// Script files listed by `p4 opened`, in output order.
///
/// Unlike describe output the depot path is the first token (revision
/// attached) and the action follows the `-` separator as the third token.
pub fn opened_files(text: &str, scripts: &GlobSet) -> Vec<DepotPath> {
    let mut out = Vec::new();
    for line in text.lines() {
        // `//depot/path#rev - action change N (type)`
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }
        let action = FileAction::from_token(tokens[2]);
        if action.is_delete() {
            continue;
        }
        let (path, _rev) = DepotPath::split_revision(tokens[0]);
        if !is_script(&path, scripts) {
            continue;
        }
        out.push(path);
    }
    out
}
