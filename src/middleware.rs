//! HTTP pipeline stage that turns registered files into `Link` headers.

use std::fmt::Write as _;

use http::header::{HeaderValue, LINK};
use http::{Request, Response};
use tracing::{debug, warn};

use crate::config::AssetSettings;
use crate::registry::{AssetRegistry, AttributeValue, Attributes, Relation, ResourceKind};

/// The inner pipeline stage producing the response this middleware decorates.
pub trait RequestHandler<B> {
  /// Handle the request and produce a response.
  fn handle(&mut self, request: Request<B>) -> Response<B>;
}

/// Page-controller collaborator reporting whether real output is produced.
pub trait PageOutput {
  /// Returns `true` when the current request renders an actual page body.
  fn is_outputting(&self) -> bool;
}

/// Response-extension marker designating a no-op response.
///
/// Handlers that produce no real output (redirects, early exits) insert this
/// into the response extensions; the middleware passes such responses through
/// without touching the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullResponse;

/// Appends `Link` resource-hint headers for every file accumulated in the
/// request's [`AssetRegistry`] once the inner handler has produced a response.
///
/// The pass is a single synchronous walk over the registry; the response body
/// and any headers the handler set are never touched, and handler output that
/// is not a real page short-circuits before the registry is even read.
pub struct AssetsMiddleware<'a, C> {
  controller: &'a C,
  registry: &'a AssetRegistry,
  settings: &'a AssetSettings,
}

impl<'a, C: PageOutput> AssetsMiddleware<'a, C> {
  /// Create a middleware over the request's collaborators.
  pub fn new(
    controller: &'a C,
    registry: &'a AssetRegistry,
    settings: &'a AssetSettings,
  ) -> Self {
    Self {
      controller,
      registry,
      settings,
    }
  }

  /// Run the inner handler and decorate its response.
  pub fn process<B, H: RequestHandler<B>>(
    &self,
    request: Request<B>,
    handler: &mut H,
  ) -> Response<B> {
    let mut response = handler.handle(request);

    if response.extensions().get::<NullResponse>().is_some()
      || !self.controller.is_outputting()
    {
      return response;
    }
    if self.registry.is_empty() {
      return response;
    }

    let values = self.collect_link_values();
    debug!(count = values.len(), "appending Link headers for registered assets");
    for value in values {
      match HeaderValue::from_str(&value) {
        Ok(header) => {
          // Distinct header entries per file, never one comma-joined value.
          response.headers_mut().append(LINK, header);
        }
        Err(_) => warn!(value = %value, "skipping Link header value with invalid characters"),
      }
    }
    response
  }

  /// Assemble one `Link` value per registered (relation, path).
  ///
  /// The unconditional preload block comes first; the optional hint relations
  /// follow only when the installation settings enable them. Within a
  /// relation the order is kind then path insertion order, as produced by the
  /// registry.
  fn collect_link_values(&self) -> Vec<String> {
    let mut values = Vec::new();
    self.collect_relation(Relation::Preload, &mut values);
    for relation in Relation::HINTS {
      if self.settings.hint_enabled(relation) {
        self.collect_relation(relation, &mut values);
      }
    }
    values
  }

  fn collect_relation(&self, relation: Relation, values: &mut Vec<String>) {
    let Some(kinds) = self.registry.files_for(relation) else {
      return;
    };
    for (kind, paths) in kinds {
      for (path, attributes) in paths {
        let merged = self.registry.merged_attributes(attributes);
        values.push(link_header_value(path, relation, *kind, &merged));
      }
    }
  }
}

/// Serialise one registered file as a `Link` header value.
///
/// Grammar: `<path>; rel=<relation>; as=<kind>[; attr[=value]]*`. Boolean
/// attributes render as bare tokens when set and disappear when unset.
fn link_header_value(
  path: &str,
  relation: Relation,
  kind: ResourceKind,
  attributes: &Attributes,
) -> String {
  let mut value = format!("<{}>; rel={}; as={}", path, relation.as_str(), kind.as_str());
  for (name, attribute) in attributes {
    match attribute {
      AttributeValue::Flag(true) => {
        let _ = write!(value, "; {name}");
      }
      AttributeValue::Flag(false) => {}
      AttributeValue::Value(v) => {
        let _ = write!(value, "; {name}={v}");
      }
    }
  }
  value
}
