use std::path::PathBuf;

use crate::model::DepotPath;

/// Overlay-relative path for a depot file, anchored at the first path segment
/// equal to `anchor`.
///
/// With `include_file_name` false the final segment is dropped (the caller
/// wants the containing directory). Returns `None` when the anchor is absent;
/// the file is then unresolved and the caller skips it.
pub fn overlay_relative(
    path: &DepotPath,
    anchor: &str,
    include_file_name: bool,
) -> Option<PathBuf> {
    let segments: Vec<&str> = path
        .as_str()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let start = segments.iter().position(|s| *s == anchor)?;
    let end = if include_file_name {
        segments.len()
    } else {
        segments.len().saturating_sub(1)
    };

    let mut out = PathBuf::new();
    for segment in segments.get(start..end).unwrap_or_default() {
        out.push(segment);
    }
    Some(out)
}
