//! # origo-core
//!
//! The in-memory source registry for Origo - THE REGISTRY.
//!
//! A *source* is a named, identified record describing where query data
//! comes from. This crate keeps every source for the lifetime of the process
//! and guarantees that a well-known default source exists once bootstrap has
//! run.
//!
//! ## Layout
//!
//! - `types`: identifiers, records, patches and the error taxonomy
//! - `store`: the concurrent `Id -> Source` map
//! - `registry`: CRUD, default lookup and bootstrap (`SourceService`)
//! - `idgen`: identifier generators
//! - `encoding`: MIME type classification
//!
//! ## Example
//!
//! ```
//! use origo_core::{Context, Source, SourceRegistry, SourceService, SourceType};
//!
//! let registry = SourceRegistry::bootstrap_default().expect("bootstrap");
//! let ctx = Context::background();
//!
//! let mut src = Source::new("telegraf", SourceType::V1);
//! registry.create_source(&ctx, &mut src).expect("create");
//!
//! assert_eq!(registry.find_source_by_id(&ctx, src.id).expect("find"), src);
//! assert_eq!(registry.default_source(&ctx).expect("default").name, "autogen");
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod context;
pub mod encoding;
pub mod idgen;
pub mod registry;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ErrorCode, FindOptions, ID_LENGTH, Id, IdError, NO_DEFAULT_SOURCE, RegistryError,
    SOURCE_NOT_FOUND, Source, SourceType, SourceUpdate,
};

// =============================================================================
// RE-EXPORTS: Registry
// =============================================================================

pub use context::Context;
pub use encoding::EncodingFormat;
pub use idgen::{IdGenerator, MAX_MACHINE_ID, SequentialGenerator, SnowflakeGenerator};
pub use registry::{
    DEFAULT_SOURCE_ID, DEFAULT_SOURCE_NAME, DEFAULT_SOURCE_ORGANIZATION_ID, DefaultSourceSpec,
    SourceRegistry, SourceService,
};
pub use store::SourceStore;
