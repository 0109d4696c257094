//! Entrypoint resolution against one or more build manifests.
//!
//! This module intentionally splits the responsibilities into focused
//! submodules so that single-build lookup (with its incremental-consumption
//! bookkeeping) and multi-build resolution can be tested independently.

mod collection;
mod lookup;

pub use collection::{EntrypointLookupCollection, UndefinedBuildError};
pub use lookup::{EntrypointLookup, EntrypointNotFoundError};
