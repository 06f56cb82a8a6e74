use std::path::Path;

use crate::model::{Changelist, DepotPath};

mod runner;

pub use self::runner::{CommandRunner, SystemRunner, archive_dir, reveal_dir};

/// Typed queries over the `p4` command line.
///
/// Every query inherits the runner's contract: a failed invocation returns
/// empty text and the caller treats the item as absent.
pub struct Perforce {
    runner: Box<dyn CommandRunner>,
}

impl Perforce {
    pub fn system() -> Self {
        Perforce {
            runner: Box::new(SystemRunner),
        }
    }

    pub fn with_runner(runner: Box<dyn CommandRunner>) -> Self {
        Perforce { runner }
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Describe text for one changelist, shelved files included.
    pub fn describe(&self, change: Changelist) -> String {
        let change = change.to_string();
        self.runner.run(&["p4", "describe", "-S", &change])
    }

    /// Files opened in `client` under one changelist.
    pub fn opened(&self, client: &str, change: Changelist) -> String {
        let change = change.to_string();
        self.runner
            .run(&["p4", "-c", client, "opened", "-c", &change])
    }

    /// Depot-to-local mapping for one file; the local path is the third
    /// whitespace token of the output.
    pub fn where_file(&self, client: &str, path: &DepotPath) -> String {
        self.runner.run(&["p4", "-c", client, "where", path.as_str()])
    }

    /// File content as of `change`; the first output line is a banner.
    pub fn print_at(&self, path: &DepotPath, change: Changelist) -> String {
        let spec = format!("{}@={}", path.as_str(), change);
        self.runner.run(&["p4", "print", &spec])
    }

    pub fn client_spec(&self, name: &str) -> String {
        self.runner.run(&["p4", "client", "-o", name])
    }

    pub fn client_exists(&self, name: &str) -> bool {
        !self.runner.run(&["p4", "clients", "-e", name]).trim().is_empty()
    }

    pub fn archive_dir(&self, dir: &Path) -> bool {
        archive_dir(self.runner.as_ref(), dir)
    }

    pub fn reveal_dir(&self, dir: &Path) -> bool {
        reveal_dir(self.runner.as_ref(), dir)
    }
}
