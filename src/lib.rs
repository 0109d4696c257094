#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod entrypoint;
pub mod manifest;
pub mod middleware;
pub mod registry;
pub mod render;

pub use config::AssetSettings;
pub use entrypoint::{
  EntrypointLookup, EntrypointLookupCollection, EntrypointNotFoundError, UndefinedBuildError,
};
pub use manifest::{EntrypointsManifest, load_manifest};
pub use middleware::{AssetsMiddleware, NullResponse, PageOutput, RequestHandler};
pub use registry::{AssetRegistry, AttributeValue, Attributes, Relation, ResourceKind};
pub use render::{HtmlTagRenderer, RenderTagsError, TagPosition, TagRenderer};
