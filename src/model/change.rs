use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of one atomic set of file edits, committed or shelved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Changelist(pub u32);

impl Changelist {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Changelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
