//! Resolution of build names to their entrypoint lookups.

use indexmap::IndexMap;

use crate::entrypoint::lookup::EntrypointLookup;

/// Owns the entrypoint lookups for every configured build.
///
/// Multi-build setups register one [`EntrypointLookup`] per build name and may
/// designate one of them as the default. Resolution always yields a borrow of
/// the stored instance, never a copy, so consumption bookkeeping is shared by
/// everything rendering against the same build during a request.
#[derive(Debug, Default)]
pub struct EntrypointLookupCollection {
  lookups: IndexMap<String, EntrypointLookup>,
  default_build: Option<String>,
}

/// Requested or default build name is not present in the collection.
#[derive(Debug)]
pub enum UndefinedBuildError {
  /// No build name was given and no default build is configured.
  NoDefaultBuild,
  /// The named build was never registered.
  UnknownBuild {
    /// Build name that was requested.
    build: String,
  },
}

impl EntrypointLookupCollection {
  /// Create an empty collection with no default build.
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a collection from named builds, preserving registration order.
  pub fn from_builds(builds: impl IntoIterator<Item = (String, EntrypointLookup)>) -> Self {
    Self {
      lookups: builds.into_iter().collect(),
      default_build: None,
    }
  }

  /// Register a build's lookup under a name, replacing any previous entry.
  pub fn with_build(mut self, name: impl Into<String>, lookup: EntrypointLookup) -> Self {
    self.lookups.insert(name.into(), lookup);
    self
  }

  /// Designate the build used when callers do not name one.
  pub fn with_default_build(mut self, name: impl Into<String>) -> Self {
    self.default_build = Some(name.into());
    self
  }

  /// Resolve a build name (or the configured default) to its lookup.
  ///
  /// Misconfiguration fails fast: an unregistered name, or an omitted name
  /// with no default configured, is an error rather than a silent fallback.
  pub fn get_entrypoint_lookup(
    &mut self,
    build: Option<&str>,
  ) -> Result<&mut EntrypointLookup, UndefinedBuildError> {
    let name = match build {
      Some(name) => name,
      None => self
        .default_build
        .as_deref()
        .ok_or(UndefinedBuildError::NoDefaultBuild)?,
    };
    self
      .lookups
      .get_mut(name)
      .ok_or_else(|| UndefinedBuildError::UnknownBuild {
        build: name.to_string(),
      })
  }

  /// Names of the registered builds, in registration order.
  pub fn build_names(&self) -> impl Iterator<Item = &str> {
    self.lookups.keys().map(String::as_str)
  }
}

impl std::fmt::Display for UndefinedBuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NoDefaultBuild => {
        write!(
          f,
          "no default build is configured: pass an explicit build name"
        )
      }
      Self::UnknownBuild { build } => {
        write!(f, "the build \"{build}\" is not configured")
      }
    }
  }
}

impl std::error::Error for UndefinedBuildError {}
