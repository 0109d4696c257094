//! HTML `<script>`/`<link>` tag generation from entrypoint file lists.

use std::fmt::Write as _;

use tracing::trace;

use crate::entrypoint::{EntrypointLookupCollection, EntrypointNotFoundError, UndefinedBuildError};
use crate::registry::{AttributeValue, Attributes};

/// Where rendered script tags belong on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPosition {
  /// Inside `<head>`.
  Head,
  /// Before the closing `</body>`.
  Footer,
}

/// Renders an entrypoint's files as HTML tags, one templating backend per
/// implementation, selected at configuration time.
pub trait TagRenderer {
  /// Render `<script>` tags for the entrypoint's unconsumed JS files into the
  /// given position bucket.
  fn render_script_tags(
    &mut self,
    entry: &str,
    position: TagPosition,
    build: Option<&str>,
    attributes: &Attributes,
  ) -> Result<(), RenderTagsError>;

  /// Render stylesheet `<link>` tags for the entrypoint's unconsumed CSS
  /// files into the head bucket.
  fn render_link_tags(
    &mut self,
    entry: &str,
    media: &str,
    build: Option<&str>,
    attributes: &Attributes,
  ) -> Result<(), RenderTagsError>;

  /// Tags accumulated for a position, in render order.
  fn tags(&self, position: TagPosition) -> &[String];
}

/// Tag rendering failed because the build or entrypoint is misconfigured.
#[derive(Debug)]
pub enum RenderTagsError {
  /// The requested build is not registered in the collection.
  UndefinedBuild(UndefinedBuildError),
  /// The requested entrypoint is absent from the build's manifest.
  EntrypointNotFound(EntrypointNotFoundError),
}

/// Plain-HTML [`TagRenderer`] over an [`EntrypointLookupCollection`].
///
/// Rendered tags accumulate into head and footer buckets the page assembly
/// code drains once per request. Because the underlying lookups track
/// consumption, rendering the same entrypoint from several templates emits
/// each file's tag exactly once.
#[derive(Debug)]
pub struct HtmlTagRenderer {
  collection: EntrypointLookupCollection,
  head: Vec<String>,
  footer: Vec<String>,
}

impl HtmlTagRenderer {
  /// Create a renderer over the request's lookup collection.
  pub fn new(collection: EntrypointLookupCollection) -> Self {
    Self {
      collection,
      head: Vec::new(),
      footer: Vec::new(),
    }
  }

  /// Drain the accumulated tags for a position.
  pub fn take_tags(&mut self, position: TagPosition) -> Vec<String> {
    match position {
      TagPosition::Head => std::mem::take(&mut self.head),
      TagPosition::Footer => std::mem::take(&mut self.footer),
    }
  }

  /// Access the underlying collection, e.g. to reset consumption state.
  pub fn collection_mut(&mut self) -> &mut EntrypointLookupCollection {
    &mut self.collection
  }

  fn bucket_mut(&mut self, position: TagPosition) -> &mut Vec<String> {
    match position {
      TagPosition::Head => &mut self.head,
      TagPosition::Footer => &mut self.footer,
    }
  }
}

impl TagRenderer for HtmlTagRenderer {
  fn render_script_tags(
    &mut self,
    entry: &str,
    position: TagPosition,
    build: Option<&str>,
    attributes: &Attributes,
  ) -> Result<(), RenderTagsError> {
    let lookup = self.collection.get_entrypoint_lookup(build)?;
    let files = lookup.javascript_files(entry)?;
    trace!(entry, count = files.len(), "rendering script tags");

    let mut tags = Vec::with_capacity(files.len());
    for file in files {
      let mut tag = format!("<script src=\"{}\"", escape_attribute(&file));
      if let Some(hash) = lookup.integrity_hash(&file) {
        let _ = write!(
          tag,
          " integrity=\"{}\" crossorigin=\"anonymous\"",
          escape_attribute(hash)
        );
      }
      write_extra_attributes(&mut tag, attributes);
      tag.push_str("></script>");
      tags.push(tag);
    }
    self.bucket_mut(position).extend(tags);
    Ok(())
  }

  fn render_link_tags(
    &mut self,
    entry: &str,
    media: &str,
    build: Option<&str>,
    attributes: &Attributes,
  ) -> Result<(), RenderTagsError> {
    let lookup = self.collection.get_entrypoint_lookup(build)?;
    let files = lookup.css_files(entry)?;
    trace!(entry, count = files.len(), "rendering stylesheet link tags");

    let mut tags = Vec::with_capacity(files.len());
    for file in files {
      let mut tag = format!(
        "<link rel=\"stylesheet\" href=\"{}\" media=\"{}\"",
        escape_attribute(&file),
        escape_attribute(media)
      );
      if let Some(hash) = lookup.integrity_hash(&file) {
        let _ = write!(
          tag,
          " integrity=\"{}\" crossorigin=\"anonymous\"",
          escape_attribute(hash)
        );
      }
      write_extra_attributes(&mut tag, attributes);
      tag.push('>');
      tags.push(tag);
    }
    // Stylesheets always belong in the document head.
    self.head.extend(tags);
    Ok(())
  }

  fn tags(&self, position: TagPosition) -> &[String] {
    match position {
      TagPosition::Head => &self.head,
      TagPosition::Footer => &self.footer,
    }
  }
}

fn write_extra_attributes(tag: &mut String, attributes: &Attributes) {
  for (name, attribute) in attributes {
    match attribute {
      AttributeValue::Flag(true) => {
        let _ = write!(tag, " {name}");
      }
      AttributeValue::Flag(false) => {}
      AttributeValue::Value(value) => {
        let _ = write!(tag, " {}=\"{}\"", name, escape_attribute(value));
      }
    }
  }
}

/// Minimal escaping for double-quoted HTML attribute values.
fn escape_attribute(value: &str) -> String {
  value
    .replace('&', "&amp;")
    .replace('"', "&quot;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

impl From<UndefinedBuildError> for RenderTagsError {
  fn from(err: UndefinedBuildError) -> Self {
    Self::UndefinedBuild(err)
  }
}

impl From<EntrypointNotFoundError> for RenderTagsError {
  fn from(err: EntrypointNotFoundError) -> Self {
    Self::EntrypointNotFound(err)
  }
}

impl std::fmt::Display for RenderTagsError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::UndefinedBuild(err) => write!(f, "cannot render tags: {err}"),
      Self::EntrypointNotFound(err) => write!(f, "cannot render tags: {err}"),
    }
  }
}

impl std::error::Error for RenderTagsError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::UndefinedBuild(err) => Some(err),
      Self::EntrypointNotFound(err) => Some(err),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entrypoint::EntrypointLookup;
  use crate::manifest::EntrypointsManifest;
  use crate::registry::Attributes;

  fn renderer() -> HtmlTagRenderer {
    let manifest: EntrypointsManifest = serde_json::from_str(
      r#"{
        "entrypoints": {
          "app": {
            "js": ["/build/runtime.js", "/build/app.js"],
            "css": ["/build/app.css"]
          }
        },
        "integrity": {
          "/build/app.js": "sha384-abc123"
        }
      }"#,
    )
    .unwrap();
    let collection = EntrypointLookupCollection::new()
      .with_build("_default", EntrypointLookup::new(manifest))
      .with_default_build("_default");
    HtmlTagRenderer::new(collection)
  }

  #[test]
  fn renders_script_tags_into_the_requested_bucket() {
    let mut renderer = renderer();
    renderer
      .render_script_tags("app", TagPosition::Footer, None, &Attributes::new())
      .unwrap();

    assert!(renderer.tags(TagPosition::Head).is_empty());
    assert_eq!(renderer.tags(TagPosition::Footer), [
      "<script src=\"/build/runtime.js\"></script>",
      "<script src=\"/build/app.js\" integrity=\"sha384-abc123\" crossorigin=\"anonymous\"></script>",
    ]);
  }

  #[test]
  fn renders_stylesheet_tags_into_the_head() {
    let mut renderer = renderer();
    renderer
      .render_link_tags("app", "all", None, &Attributes::new())
      .unwrap();

    assert_eq!(renderer.tags(TagPosition::Head), [
      "<link rel=\"stylesheet\" href=\"/build/app.css\" media=\"all\">",
    ]);
  }

  #[test]
  fn rendering_twice_emits_each_tag_once() {
    let mut renderer = renderer();
    renderer
      .render_script_tags("app", TagPosition::Footer, None, &Attributes::new())
      .unwrap();
    renderer
      .render_script_tags("app", TagPosition::Footer, None, &Attributes::new())
      .unwrap();

    assert_eq!(renderer.tags(TagPosition::Footer).len(), 2);
  }

  #[test]
  fn extra_attributes_are_rendered_and_escaped() {
    let mut renderer = renderer();
    let attributes: Attributes = [
      ("defer".to_string(), AttributeValue::Flag(true)),
      ("async".to_string(), AttributeValue::Flag(false)),
      (
        "data-track".to_string(),
        AttributeValue::Value("a\"b".to_string()),
      ),
    ]
    .into_iter()
    .collect();
    renderer
      .render_script_tags("app", TagPosition::Head, None, &attributes)
      .unwrap();

    let tag = &renderer.tags(TagPosition::Head)[0];
    assert!(tag.contains(" defer"));
    assert!(!tag.contains("async"));
    assert!(tag.contains(" data-track=\"a&quot;b\""));
  }

  #[test]
  fn unknown_build_surfaces_through_the_renderer() {
    let mut renderer = renderer();
    let err = renderer
      .render_script_tags("app", TagPosition::Head, Some("ghost"), &Attributes::new())
      .unwrap_err();
    assert!(matches!(err, RenderTagsError::UndefinedBuild(_)));
  }

  #[test]
  fn unknown_entrypoint_surfaces_through_the_renderer() {
    let mut renderer = renderer();
    let err = renderer
      .render_link_tags("missing", "all", None, &Attributes::new())
      .unwrap_err();
    assert!(matches!(err, RenderTagsError::EntrypointNotFound(_)));
  }

  #[test]
  fn take_tags_drains_the_bucket() {
    let mut renderer = renderer();
    renderer
      .render_link_tags("app", "all", None, &Attributes::new())
      .unwrap();

    let tags = renderer.take_tags(TagPosition::Head);
    assert_eq!(tags.len(), 1);
    assert!(renderer.tags(TagPosition::Head).is_empty());
  }
}
