//! Rendering entrypoint file lists as HTML tags for template use.

mod tag;

pub use tag::{HtmlTagRenderer, RenderTagsError, TagPosition, TagRenderer};
