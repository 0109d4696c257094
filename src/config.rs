//! Typed settings controlling optional resource-hint emission.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::Relation;

const DEFAULT_SETTINGS_FILE: &str = "pagelink.settings.json";

/// Installation settings gating the lower-priority resource hints.
///
/// Each field is explicitly optional: an unset field, a missing settings file,
/// or an empty settings file all mean the hint is disabled. Only `preload`
/// headers are emitted unconditionally, so a default install does no hint
/// work at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AssetSettings {
  /// Emit `rel=dns-prefetch` headers for registered files.
  pub dns_prefetch: Option<bool>,
  /// Emit `rel=prefetch` headers for registered files.
  pub prefetch: Option<bool>,
  /// Emit `rel=preconnect` headers for registered files.
  pub preconnect: Option<bool>,
}

impl AssetSettings {
  /// Attempt to load settings from the provided directory.
  ///
  /// When the settings file does not exist or fails to parse we fall back to
  /// the defaults, which disable every optional hint.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_SETTINGS_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read settings from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Whether headers for this relation should be emitted at all.
  pub fn hint_enabled(&self, relation: Relation) -> bool {
    match relation {
      Relation::Preload => true,
      Relation::DnsPrefetch => self.dns_prefetch.unwrap_or(false),
      Relation::Prefetch => self.prefetch.unwrap_or(false),
      Relation::Preconnect => self.preconnect.unwrap_or(false),
    }
  }
}
