use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::model::OverlayConfig;
use crate::p4::Perforce;
use crate::parse::client_spec::{ClientSpec, client_spec};

/// Generate `.p4config` and a `.code-workspace` file under a client's root.
///
/// Unlike the overlay pipeline this command reports failure to the user:
/// without a complete client spec there is nowhere to write.
pub fn init_workspace(p4: &Perforce, config: &OverlayConfig, client: &str) -> Result<()> {
    let text = p4.client_spec(client);
    if text.is_empty() {
        bail!("no client spec for {client} (is p4 reachable?)");
    }
    let spec = client_spec(&text);
    if !spec.is_complete() {
        bail!("client spec for {client} is missing Root, Owner or Stream");
    }

    let root = Path::new(&spec.root);
    write_p4_config(root, config, client, &spec.owner)?;
    write_editor_workspace(root, config, client, &spec)?;

    if !p4.reveal_dir(root) {
        tracing::warn!(root = %root.display(), "reveal step failed");
    }
    Ok(())
}

fn write_p4_config(root: &Path, config: &OverlayConfig, client: &str, user: &str) -> Result<()> {
    let path = root.join(".p4config");
    let body = format!("P4PORT={}\nP4USER={}\nP4CLIENT={}\n", config.port, user, client);
    fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote p4 config");
    Ok(())
}

fn write_editor_workspace(
    root: &Path,
    config: &OverlayConfig,
    client: &str,
    spec: &ClientSpec,
) -> Result<()> {
    let doc = workspace_document(root, config, client, spec);
    let path = root.join(format!("{}.code-workspace", spec.stream));
    let bytes = serde_json::to_vec_pretty(&doc).context("serialize workspace document")?;
    fs::write(&path, &bytes).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote editor workspace");
    Ok(())
}

#[derive(Serialize)]
struct WorkspaceDocument {
    folders: Vec<WorkspaceFolder>,
    settings: EditorSettings,
}

#[derive(Serialize)]
struct WorkspaceFolder {
    path: String,
}

#[derive(Serialize)]
struct EditorSettings {
    #[serde(rename = "python.autoComplete.extraPaths")]
    auto_complete_extra_paths: Vec<String>,

    #[serde(rename = "python.analysis.extraPaths")]
    analysis_extra_paths: Vec<String>,

    #[serde(rename = "perforce.port")]
    perforce_port: String,

    #[serde(rename = "perforce.user")]
    perforce_user: String,

    #[serde(rename = "perforce.client")]
    perforce_client: String,

    #[serde(rename = "perforce.editOnFileSave")]
    edit_on_file_save: bool,

    #[serde(rename = "perforce.editOnFileModified")]
    edit_on_file_modified: bool,

    #[serde(rename = "perforce.addOnFileCreate")]
    add_on_file_create: bool,

    #[serde(rename = "perforce.deleteOnFileDelete")]
    delete_on_file_delete: bool,
}

/// Built fresh per invocation; there is no shared template value to mutate.
fn workspace_document(
    root: &Path,
    config: &OverlayConfig,
    client: &str,
    spec: &ClientSpec,
) -> WorkspaceDocument {
    let script_root = root.join(&config.anchor);
    let script_root = script_root.to_string_lossy().replace('\\', "/");
    WorkspaceDocument {
        folders: vec![WorkspaceFolder {
            path: format!("./{}", config.anchor),
        }],
        settings: EditorSettings {
            auto_complete_extra_paths: vec![script_root.clone()],
            analysis_extra_paths: vec![script_root],
            perforce_port: config.port.clone(),
            perforce_user: spec.owner.clone(),
            perforce_client: client.to_string(),
            edit_on_file_save: true,
            edit_on_file_modified: true,
            add_on_file_create: true,
            delete_on_file_delete: true,
        },
    }
}
