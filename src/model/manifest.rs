use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::change::Changelist;
use super::depot::DepotPath;

/// Record of one overlay rebuild: which files were copied from the local
/// workspace and which were downloaded from the depot. An empty manifest
/// means nothing gets archived or revealed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlayManifest {
    pub version: u32,
    pub created_at: String,

    #[serde(default)]
    pub copied: Vec<CopiedEntry>,

    #[serde(default)]
    pub downloaded: Vec<DownloadedEntry>,
}

/// A locally opened file copied as-is into the overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedEntry {
    pub depot_path: DepotPath,
    /// Changelist the file was found opened under.
    pub change: Changelist,
    pub source: String,
    pub dest: String,
    pub size: u64,
    pub digest: String,
}

/// Committed content fetched from the depot at a specific changelist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedEntry {
    pub depot_path: DepotPath,
    pub change: Changelist,
    pub dest: String,
    pub size: u64,
    pub digest: String,
}

impl OverlayManifest {
    pub fn new(created_at: String) -> Self {
        OverlayManifest {
            version: 1,
            created_at,
            copied: Vec::new(),
            downloaded: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.downloaded.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.copied.len() + self.downloaded.len()
    }

    /// Human-readable summary for the end of a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.copied.is_empty() {
            let _ = writeln!(out, "copied ({}):", self.copied.len());
            for entry in &self.copied {
                let _ = writeln!(out, "  {} <- {}", entry.depot_path, entry.source);
            }
        }
        if !self.downloaded.is_empty() {
            let _ = writeln!(out, "downloaded ({}):", self.downloaded.len());
            for entry in &self.downloaded {
                let _ = writeln!(out, "  {} @={} -> {}", entry.depot_path, entry.change, entry.dest);
            }
        }
        out
    }
}
