use std::path::Path;
use std::process::Command;

/// One external command invocation.
///
/// The pipeline never distinguishes failure causes: a command that cannot be
/// spawned, exits non-zero or produces non-text output simply yields nothing,
/// and the caller skips whatever that output would have driven.
pub trait CommandRunner {
    /// Captured stdout of the command; empty on any failure.
    fn run(&self, argv: &[&str]) -> String;

    /// True when the command ran and exited with status 0.
    fn status(&self, argv: &[&str]) -> bool;
}

/// Runs commands through the operating system.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[&str]) -> String {
        let Some((program, args)) = argv.split_first() else {
            return String::new();
        };
        match Command::new(program).args(args).output() {
            Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).into_owned(),
            Ok(out) => {
                tracing::warn!(
                    command = %argv.join(" "),
                    code = ?out.status.code(),
                    "external command failed"
                );
                String::new()
            }
            Err(err) => {
                tracing::warn!(command = %argv.join(" "), %err, "external command could not be run");
                String::new()
            }
        }
    }

    fn status(&self, argv: &[&str]) -> bool {
        let Some((program, args)) = argv.split_first() else {
            return false;
        };
        match Command::new(program).args(args).output() {
            Ok(out) if out.status.success() => true,
            Ok(out) => {
                tracing::warn!(
                    command = %argv.join(" "),
                    code = ?out.status.code(),
                    "external command failed"
                );
                false
            }
            Err(err) => {
                tracing::warn!(command = %argv.join(" "), %err, "external command could not be run");
                false
            }
        }
    }
}

/// Zip a directory into `<dir>.zip` next to it.
pub fn archive_dir(runner: &dyn CommandRunner, dir: &Path) -> bool {
    let (Some(parent), Some(name)) = (
        dir.parent().and_then(Path::to_str),
        dir.file_name().and_then(|n| n.to_str()),
    ) else {
        tracing::warn!(dir = %dir.display(), "cannot derive archive location");
        return false;
    };
    let parent = if parent.is_empty() { "." } else { parent };
    let zip = format!("{parent}/{name}.zip");
    runner.status(&["tar", "-a", "-c", "-f", &zip, "-C", parent, name])
}

/// Open a directory in the platform file browser.
pub fn reveal_dir(runner: &dyn CommandRunner, dir: &Path) -> bool {
    let Some(dir) = dir.to_str() else {
        tracing::warn!("non-utf8 path, cannot reveal");
        return false;
    };
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    runner.status(&[opener, dir])
}
