//! Resolution of a single build's entrypoint names to generated file lists.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::trace;

use crate::manifest::{EntryFiles, EntrypointsManifest, load_manifest};

/// Resolves entrypoint names against one build's manifest.
///
/// The lookup owns the immutable manifest plus mutable bookkeeping of which
/// files it has already handed out during the current request. The incremental
/// accessors ([`javascript_files`](Self::javascript_files),
/// [`css_files`](Self::css_files)) return only files not yet seen, so a page
/// that references the same entrypoint from several templates renders each tag
/// exactly once. One instance lives for one request.
#[derive(Debug)]
pub struct EntrypointLookup {
  manifest: EntrypointsManifest,
  returned_js: BTreeSet<String>,
  returned_css: BTreeSet<String>,
}

/// Requested entrypoint name is absent from the build's manifest.
#[derive(Debug)]
pub struct EntrypointNotFoundError {
  /// Name that was requested.
  pub entry: String,
  /// Entrypoint names the manifest actually declares.
  pub available: Vec<String>,
}

impl EntrypointLookup {
  /// Create a lookup over an already-loaded manifest.
  pub fn new(manifest: EntrypointsManifest) -> Self {
    Self {
      manifest,
      returned_js: BTreeSet::new(),
      returned_css: BTreeSet::new(),
    }
  }

  /// Create a lookup by reading a manifest file from disk.
  ///
  /// This is the only I/O the lookup ever performs; every subsequent call is a
  /// pure read of the loaded data plus local bookkeeping.
  pub fn from_path(path: &Path) -> anyhow::Result<Self> {
    Ok(Self::new(load_manifest(path)?))
  }

  /// JavaScript files for the entrypoint that have not been returned yet.
  ///
  /// Files handed out here are recorded as consumed and omitted from later
  /// calls, for this and any other entrypoint sharing them.
  pub fn javascript_files(
    &mut self,
    entry: &str,
  ) -> Result<Vec<String>, EntrypointNotFoundError> {
    let files = Self::entry_files(&self.manifest, entry)?.js.clone();
    Ok(consume(files, &mut self.returned_js))
  }

  /// CSS files for the entrypoint that have not been returned yet.
  pub fn css_files(&mut self, entry: &str) -> Result<Vec<String>, EntrypointNotFoundError> {
    let files = Self::entry_files(&self.manifest, entry)?.css.clone();
    Ok(consume(files, &mut self.returned_css))
  }

  /// All JavaScript files declared for the entrypoint, ignoring consumption state.
  pub fn all_javascript_files(
    &self,
    entry: &str,
  ) -> Result<&[String], EntrypointNotFoundError> {
    Ok(&Self::entry_files(&self.manifest, entry)?.js)
  }

  /// All CSS files declared for the entrypoint, ignoring consumption state.
  pub fn all_css_files(&self, entry: &str) -> Result<&[String], EntrypointNotFoundError> {
    Ok(&Self::entry_files(&self.manifest, entry)?.css)
  }

  /// Subresource-integrity hash recorded in the manifest for a file, if any.
  pub fn integrity_hash(&self, path: &str) -> Option<&str> {
    self.manifest.integrity.get(path).map(String::as_str)
  }

  /// Returns `true` when the manifest declares the entrypoint.
  pub fn entry_exists(&self, entry: &str) -> bool {
    self.manifest.entrypoints.contains_key(entry)
  }

  /// Forget which files have been handed out so far.
  pub fn reset(&mut self) {
    self.returned_js.clear();
    self.returned_css.clear();
  }

  fn entry_files<'m>(
    manifest: &'m EntrypointsManifest,
    entry: &str,
  ) -> Result<&'m EntryFiles, EntrypointNotFoundError> {
    manifest
      .entrypoints
      .get(entry)
      .ok_or_else(|| EntrypointNotFoundError {
        entry: entry.to_string(),
        available: manifest.entrypoints.keys().cloned().collect(),
      })
  }
}

/// Filter out already-returned files and record the remainder as consumed.
fn consume(files: Vec<String>, returned: &mut BTreeSet<String>) -> Vec<String> {
  let fresh: Vec<String> = files
    .into_iter()
    .filter(|file| returned.insert(file.clone()))
    .collect();
  trace!(count = fresh.len(), "handing out unconsumed entrypoint files");
  fresh
}

impl std::fmt::Display for EntrypointNotFoundError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.available.is_empty() {
      write!(
        f,
        "entrypoint \"{}\" not found: the manifest declares no entrypoints",
        self.entry
      )
    } else {
      write!(
        f,
        "entrypoint \"{}\" not found in the manifest (known entrypoints: {})",
        self.entry,
        self.available.join(", ")
      )
    }
  }
}

impl std::error::Error for EntrypointNotFoundError {}
