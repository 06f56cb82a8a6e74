//! Overlay folders for Perforce script changelists.
//!
//! Resolves the set of script files touched by a batch of changelists, picks
//! the correct version of each (a locally opened copy when one exists, the
//! latest committed snapshot otherwise) and rebuilds a destination folder
//! from scratch with the result.

pub mod logging;
pub mod model;
pub mod overlay;
pub mod p4;
pub mod parse;
pub mod workspace_init;
