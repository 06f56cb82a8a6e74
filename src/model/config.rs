use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "p4overlay.json";

/// Per-invocation configuration. Built fresh for every run from defaults plus
/// an optional JSON file; immutable afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Globs matched against the file name of each depot path.
    #[serde(default = "default_script_globs")]
    pub script_globs: Vec<String>,

    /// Directory segment where overlay-relative paths start.
    #[serde(default = "default_anchor")]
    pub anchor: String,

    /// Folder name used when `--dest` is not given.
    #[serde(default = "default_dest_name")]
    pub dest_name: String,

    /// P4PORT written into generated `.p4config` files.
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            version: 1,
            script_globs: default_script_globs(),
            anchor: default_anchor(),
            dest_name: default_dest_name(),
            port: default_port(),
        }
    }
}

impl OverlayConfig {
    /// Load from an explicit path, else from `p4overlay.json` in the working
    /// directory when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<OverlayConfig> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                fallback.exists().then(|| fallback.to_path_buf())
            }
        };
        let Some(path) = path else {
            return Ok(OverlayConfig::default());
        };
        let bytes =
            fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
        let config: OverlayConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn script_matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for glob in &self.script_globs {
            builder.add(
                Glob::new(glob).with_context(|| format!("invalid script glob {glob:?}"))?,
            );
        }
        builder.build().context("build script glob set")
    }
}

fn default_version() -> u32 {
    1
}

fn default_script_globs() -> Vec<String> {
    vec!["*.py".to_string()]
}

fn default_anchor() -> String {
    "Scripts".to_string()
}

fn default_dest_name() -> String {
    "OverlayFolder".to_string()
}

fn default_port() -> String {
    "perforce:1666".to_string()
}
