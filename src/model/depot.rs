use std::fmt;

use serde::{Deserialize, Serialize};

/// Repository-relative file identifier, independent of any local copy.
///
/// Never carries a `#revision` suffix; revisions are split off at parse time
/// so the same file always maps to the same key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DepotPath(pub String);

impl DepotPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a raw `path#revision` token into the path and its revision.
    pub fn split_revision(raw: &str) -> (DepotPath, Option<u32>) {
        match raw.rsplit_once('#') {
            Some((path, rev)) => (DepotPath(path.to_string()), rev.parse().ok()),
            None => (DepotPath(raw.to_string()), None),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for DepotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
