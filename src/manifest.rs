//! Loading and interpreting the build-generated entrypoints manifest.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

/// Deserialised representation of an `entrypoints.json` manifest.
///
/// The manifest is produced by the asset build and maps each entrypoint name to
/// the ordered list of generated files it requires. Entry order is preserved as
/// written by the build tool. Immutable once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntrypointsManifest {
  /// Entrypoint name mapped to the files it requires.
  #[serde(default)]
  pub entrypoints: IndexMap<String, EntryFiles>,
  /// Optional subresource-integrity hashes keyed by generated file path.
  #[serde(default)]
  pub integrity: IndexMap<String, String>,
}

/// Generated files declared for a single entrypoint, partitioned by type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryFiles {
  /// Ordered JavaScript file paths.
  #[serde(default)]
  pub js: Vec<String>,
  /// Ordered CSS file paths.
  #[serde(default)]
  pub css: Vec<String>,
}

/// Load an entrypoints manifest from disk.
pub fn load_manifest(path: &Path) -> Result<EntrypointsManifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("entrypoints manifest not found at {}", path.display()))?;
  let manifest: EntrypointsManifest =
    serde_json::from_str(&content).context("failed to parse entrypoints manifest JSON")?;
  Ok(manifest)
}

#[cfg(test)]
mod tests {
  use super::*;

  const FIXTURE: &str = r#"{
    "entrypoints": {
      "app": {
        "js": ["/build/runtime.js", "/build/app.js"],
        "css": ["/build/app.css"]
      },
      "admin": {
        "js": ["/build/runtime.js", "/build/admin.js"]
      }
    },
    "integrity": {
      "/build/app.js": "sha384-abc123"
    }
  }"#;

  #[test]
  fn parses_entrypoints_in_declaration_order() {
    let manifest: EntrypointsManifest = serde_json::from_str(FIXTURE).unwrap();
    let names: Vec<&String> = manifest.entrypoints.keys().collect();
    assert_eq!(names, vec!["app", "admin"]);

    let app = &manifest.entrypoints["app"];
    assert_eq!(app.js, vec!["/build/runtime.js", "/build/app.js"]);
    assert_eq!(app.css, vec!["/build/app.css"]);
  }

  #[test]
  fn missing_sections_default_to_empty() {
    let manifest: EntrypointsManifest = serde_json::from_str(r#"{"entrypoints": {}}"#).unwrap();
    assert!(manifest.entrypoints.is_empty());
    assert!(manifest.integrity.is_empty());

    let partial: EntrypointsManifest = serde_json::from_str(FIXTURE).unwrap();
    assert!(partial.entrypoints["admin"].css.is_empty());
  }

  #[test]
  fn exposes_integrity_hashes() {
    let manifest: EntrypointsManifest = serde_json::from_str(FIXTURE).unwrap();
    assert_eq!(
      manifest.integrity.get("/build/app.js").map(String::as_str),
      Some("sha384-abc123")
    );
  }

  #[test]
  fn load_manifest_reports_missing_file() {
    let temp = tempfile::tempdir().unwrap();
    let err = load_manifest(&temp.path().join("entrypoints.json")).unwrap_err();
    assert!(err.to_string().contains("entrypoints.json"));
  }

  #[test]
  fn load_manifest_reads_file_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("entrypoints.json");
    std::fs::write(&path, FIXTURE).unwrap();

    let manifest = load_manifest(&path).unwrap();
    assert_eq!(manifest.entrypoints.len(), 2);
  }
}
