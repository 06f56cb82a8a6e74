use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use p4overlay::model::{Changelist, OverlayConfig};
use p4overlay::overlay::{self, MaterializeOptions};
use p4overlay::p4::Perforce;

mod common;

use common::{ScriptedRunner, called_program, describe_text, print_text};

fn quiet() -> MaterializeOptions {
    MaterializeOptions {
        archive: false,
        reveal: false,
    }
}

#[test]
fn later_changelist_wins_for_depot_content() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new()
        .respond(
            &["p4", "describe", "-S", "100"],
            &describe_text(100, &["... //depot/Scripts/a.py#3 edit"]),
        )
        .respond(
            &["p4", "describe", "-S", "101"],
            &describe_text(101, &["... //depot/Scripts/a.py#4 edit"]),
        )
        .respond(
            &["p4", "print", "//depot/Scripts/a.py@=101"],
            &print_text("//depot/Scripts/a.py", "new content\n"),
        );
    let calls = runner.calls();
    let p4 = Perforce::with_runner(Box::new(runner));

    let manifest = overlay::build_overlay(
        &p4,
        &OverlayConfig::default(),
        "",
        &[Changelist(100), Changelist(101)],
        &dest,
        &quiet(),
    )?;

    assert_eq!(manifest.downloaded.len(), 1);
    assert_eq!(manifest.downloaded[0].change, Changelist(101));
    assert_eq!(manifest.downloaded[0].dest, "Scripts/a.py");
    assert_eq!(fs::read_to_string(dest.join("Scripts/a.py"))?, "new content\n");

    // The superseded changelist is never fetched.
    let fetched_old = calls
        .borrow()
        .iter()
        .any(|argv| argv.iter().any(|tok| tok == "//depot/Scripts/a.py@=100"));
    assert!(!fetched_old);
    Ok(())
}

#[test]
fn delete_only_suppresses_its_own_changelist() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new()
        .respond(
            &["p4", "describe", "-S", "100"],
            &describe_text(100, &["... //depot/Scripts/a.py#3 edit"]),
        )
        .respond(
            &["p4", "describe", "-S", "101"],
            &describe_text(101, &["... //depot/Scripts/a.py#4 delete"]),
        )
        .respond(
            &["p4", "print", "//depot/Scripts/a.py@=100"],
            &print_text("//depot/Scripts/a.py", "still here\n"),
        );
    let p4 = Perforce::with_runner(Box::new(runner));

    let manifest = overlay::build_overlay(
        &p4,
        &OverlayConfig::default(),
        "",
        &[Changelist(100), Changelist(101)],
        &dest,
        &quiet(),
    )?;

    assert_eq!(manifest.downloaded.len(), 1);
    assert_eq!(manifest.downloaded[0].change, Changelist(100));
    assert_eq!(fs::read_to_string(dest.join("Scripts/a.py"))?, "still here\n");
    Ok(())
}

#[test]
fn local_file_supersedes_depot_version() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let local_dir = tmp.path().join("ws1/Scripts");
    fs::create_dir_all(&local_dir).context("create local dir")?;
    let local_file = local_dir.join("a.py");
    fs::write(&local_file, b"work in flight\n").context("write local file")?;
    let local_str = local_file.to_str().context("utf8 local path")?.to_string();

    let runner = ScriptedRunner::new()
        .respond(
            &["p4", "describe", "-S", "100"],
            &describe_text(100, &["... //depot/Scripts/a.py#3 edit"]),
        )
        .respond(
            &["p4", "-c", "ws1", "opened", "-c", "100"],
            "//depot/Scripts/a.py#3 - edit change 100 (text)\n",
        )
        .respond(
            &["p4", "-c", "ws1", "where", "//depot/Scripts/a.py"],
            &format!("//depot/Scripts/a.py //ws1/Scripts/a.py {local_str}\n"),
        );
    let calls = runner.calls();
    let p4 = Perforce::with_runner(Box::new(runner));

    let manifest = overlay::build_overlay(
        &p4,
        &OverlayConfig::default(),
        "ws1",
        &[Changelist(100)],
        &dest,
        &quiet(),
    )?;

    assert_eq!(manifest.copied.len(), 1);
    assert!(manifest.downloaded.is_empty());
    assert_eq!(manifest.copied[0].change, Changelist(100));
    assert_eq!(manifest.copied[0].source, local_str);
    assert_eq!(
        fs::read(dest.join("Scripts/a.py"))?,
        b"work in flight\n".to_vec()
    );
    assert_eq!(
        manifest.copied[0].digest,
        blake3::hash(b"work in flight\n").to_hex().to_string()
    );

    // No depot fetch for a path the local copy already covers.
    let printed = calls
        .borrow()
        .iter()
        .any(|argv| argv.get(1).map(String::as_str) == Some("print"));
    assert!(!printed);
    Ok(())
}

#[test]
fn headerless_describe_yields_empty_overlay_and_no_archive() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new().respond(
        &["p4", "describe", "-S", "100"],
        "Change 100 by alice@ws1 on 2024/05/01 12:00:00\n\n\tNo file sections here\n",
    );
    let calls = runner.calls();
    let p4 = Perforce::with_runner(Box::new(runner));

    let manifest = overlay::build_overlay(
        &p4,
        &OverlayConfig::default(),
        "",
        &[Changelist(100)],
        &dest,
        &MaterializeOptions {
            archive: true,
            reveal: false,
        },
    )?;

    assert!(manifest.is_empty());
    assert!(dest.is_dir());
    assert!(fs::read_dir(&dest)?.next().is_none());
    assert!(!called_program(&calls, "tar"));
    Ok(())
}

#[test]
fn non_empty_manifest_triggers_archive_and_manifest_file() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new()
        .respond(
            &["p4", "describe", "-S", "100"],
            &describe_text(100, &["... //depot/Scripts/a.py#3 edit"]),
        )
        .respond(
            &["p4", "print", "//depot/Scripts/a.py@=100"],
            &print_text("//depot/Scripts/a.py", "alpha\n"),
        );
    let calls = runner.calls();
    let p4 = Perforce::with_runner(Box::new(runner));

    overlay::build_overlay(
        &p4,
        &OverlayConfig::default(),
        "",
        &[Changelist(100)],
        &dest,
        &MaterializeOptions {
            archive: true,
            reveal: false,
        },
    )?;

    assert!(called_program(&calls, "tar"));

    let manifest_file = tmp.path().join("OverlayFolder.manifest.json");
    let manifest: serde_json::Value = serde_json::from_slice(&fs::read(&manifest_file)?)?;
    assert_eq!(manifest["downloaded"][0]["depot_path"], "//depot/Scripts/a.py");
    assert_eq!(manifest["downloaded"][0]["change"], 100);
    Ok(())
}

#[test]
fn empty_changelist_input_is_a_valid_empty_run() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new();
    let calls = runner.calls();
    let p4 = Perforce::with_runner(Box::new(runner));

    let manifest =
        overlay::build_overlay(&p4, &OverlayConfig::default(), "", &[], &dest, &quiet())?;

    assert!(manifest.is_empty());
    assert!(dest.is_dir());
    assert!(calls.borrow().is_empty());
    Ok(())
}

#[test]
fn rebuild_with_identical_inputs_is_idempotent() -> Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dest = tmp.path().join("OverlayFolder");

    let runner = ScriptedRunner::new()
        .respond(
            &["p4", "describe", "-S", "100"],
            &describe_text(
                100,
                &[
                    "... //depot/Scripts/a.py#3 edit",
                    "... //depot/Scripts/sub/b.py#1 add",
                ],
            ),
        )
        .respond(
            &["p4", "print", "//depot/Scripts/a.py@=100"],
            &print_text("//depot/Scripts/a.py", "alpha\n"),
        )
        .respond(
            &["p4", "print", "//depot/Scripts/sub/b.py@=100"],
            &print_text("//depot/Scripts/sub/b.py", "beta\n"),
        );
    let p4 = Perforce::with_runner(Box::new(runner));
    let config = OverlayConfig::default();
    let changes = [Changelist(100)];

    let first = overlay::build_overlay(&p4, &config, "", &changes, &dest, &quiet())?;
    let first_tree = capture_tree(&dest)?;

    // Leave a stray file behind to prove the rebuild starts clean.
    fs::write(dest.join("stale.txt"), b"leftover")?;

    let second = overlay::build_overlay(&p4, &config, "", &changes, &dest, &quiet())?;
    let second_tree = capture_tree(&dest)?;

    assert_eq!(first_tree, second_tree);
    assert_eq!(first.copied, second.copied);
    assert_eq!(first.downloaded, second.downloaded);
    assert!(!second_tree.contains_key(&PathBuf::from("stale.txt")));
    Ok(())
}

fn capture_tree(root: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut out = BTreeMap::new();
    capture_dir(root, Path::new(""), &mut out)?;
    Ok(out)
}

fn capture_dir(root: &Path, rel: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) -> Result<()> {
    let dir = root.join(rel);
    for entry in fs::read_dir(&dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|_| anyhow::anyhow!("non-utf8 filename"))?;
        let child_rel = rel.join(&name);
        if entry.file_type()?.is_dir() {
            capture_dir(root, &child_rel, out)?;
        } else {
            out.insert(child_rel.clone(), fs::read(root.join(&child_rel))?);
        }
    }
    Ok(())
}
