//! Per-request bookkeeping of files registered for resource hinting.

use indexmap::IndexMap;

/// Resource-hint relation a file can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
  /// High-priority `rel=preload` hint.
  Preload,
  /// `rel=dns-prefetch` hint.
  DnsPrefetch,
  /// `rel=prefetch` hint.
  Prefetch,
  /// `rel=preconnect` hint.
  Preconnect,
}

/// Kind of resource a registered file represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
  /// A stylesheet, hinted with `as=style`.
  Style,
  /// A script, hinted with `as=script`.
  Script,
}

/// Attribute attached to a registered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
  /// Boolean attribute, rendered as a bare token when `true` and omitted when `false`.
  Flag(bool),
  /// Valued attribute, rendered as `key=value`.
  Value(String),
}

/// String-keyed attribute map, in insertion order.
pub type Attributes = IndexMap<String, AttributeValue>;

/// Nested view of everything registered: relation, then kind, then file path.
pub type RegisteredFiles = IndexMap<Relation, IndexMap<ResourceKind, IndexMap<String, Attributes>>>;

/// Accumulates the files a page wants hinted, during rendering, for the
/// middleware to read back once the response exists.
///
/// Pure bookkeeping with no HTTP knowledge. One registry is created per
/// request and passed explicitly to the rendering code and the middleware;
/// rendering writes, the middleware only reads, and the instance is discarded
/// with the request.
#[derive(Debug, Default)]
pub struct AssetRegistry {
  files: RegisteredFiles,
  default_attributes: Attributes,
}

impl Relation {
  /// The `rel` token for this relation.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Preload => "preload",
      Self::DnsPrefetch => "dns-prefetch",
      Self::Prefetch => "prefetch",
      Self::Preconnect => "preconnect",
    }
  }

  /// The lower-priority hint relations, in emission order.
  pub const HINTS: [Relation; 3] = [Self::DnsPrefetch, Self::Prefetch, Self::Preconnect];
}

impl ResourceKind {
  /// The `as` token for this kind.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Style => "style",
      Self::Script => "script",
    }
  }
}

impl AssetRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a file under a relation and kind.
  ///
  /// Registering the same path again merges the attribute maps, with the
  /// later registration winning per key. Paths within one relation+kind
  /// bucket stay unique; first registration fixes the iteration position.
  pub fn register(
    &mut self,
    relation: Relation,
    kind: ResourceKind,
    path: impl Into<String>,
    attributes: Attributes,
  ) {
    let entry = self
      .files
      .entry(relation)
      .or_default()
      .entry(kind)
      .or_default()
      .entry(path.into())
      .or_default();
    entry.extend(attributes);
  }

  /// Replace the registry-wide default attributes.
  pub fn set_default_attributes(&mut self, attributes: Attributes) {
    self.default_attributes = attributes;
  }

  /// Default attributes merged into every registered file by consumers.
  pub fn default_attributes(&self) -> &Attributes {
    &self.default_attributes
  }

  /// Read-only view of everything registered so far.
  pub fn registered_files(&self) -> &RegisteredFiles {
    &self.files
  }

  /// Files registered under one relation, if any.
  pub fn files_for(
    &self,
    relation: Relation,
  ) -> Option<&IndexMap<ResourceKind, IndexMap<String, Attributes>>> {
    self.files.get(&relation)
  }

  /// Returns `true` when no file has been registered under any relation.
  pub fn is_empty(&self) -> bool {
    self
      .files
      .values()
      .all(|kinds| kinds.values().all(IndexMap::is_empty))
  }

  /// A file's attributes overlaid on the registry defaults.
  ///
  /// Explicit attributes win over defaults key by key; defaults only fill in
  /// keys the file did not set itself.
  pub fn merged_attributes(&self, attributes: &Attributes) -> Attributes {
    let mut merged = self.default_attributes.clone();
    merged.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
  }
}

impl From<bool> for AttributeValue {
  fn from(flag: bool) -> Self {
    Self::Flag(flag)
  }
}

impl From<&str> for AttributeValue {
  fn from(value: &str) -> Self {
    Self::Value(value.to_string())
  }
}

impl From<String> for AttributeValue {
  fn from(value: String) -> Self {
    Self::Value(value)
  }
}
