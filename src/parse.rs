//! Parsers for the human-oriented output of `p4` commands.
//!
//! The formats are free text and can drift between server versions; keeping
//! every parser here, pinned to captured samples in its tests, keeps drift a
//! localized failure instead of a scattered one.

use globset::GlobSet;

use crate::model::DepotPath;

pub mod client_spec;
pub mod describe;
pub mod opened;
pub mod whereis;

pub(crate) fn is_script(path: &DepotPath, scripts: &GlobSet) -> bool {
    match path.file_name() {
        Some(name) => scripts.is_match(name),
        None => false,
    }
}
