//! # Source Registry
//!
//! The service layer over `SourceStore`.
//!
//! This module implements the `SourceService` trait. The registry assigns
//! identifiers, bootstraps the well-known default source, and turns missing
//! records into `NotFound` errors annotated with the failing operation.
//!
//! ## Atomicity
//!
//! Update, delete and bootstrap each touch one key through a single store
//! primitive (`update`, `remove`, `insert_if_absent`), so a concurrent delete
//! can never resurrect or lose a write. Full scans (`default_source`,
//! `find_sources`) are best-effort snapshots.

use crate::context::Context;
use crate::idgen::{IdGenerator, SnowflakeGenerator};
use crate::store::SourceStore;
use crate::{
    FindOptions, Id, NO_DEFAULT_SOURCE, RegistryError, Source, SourceType, SourceUpdate,
};

// =============================================================================
// OPERATION NAMES
// =============================================================================

/// Operation names attached to annotated errors.
pub mod op {
    pub const CREATE_SOURCE: &str = "create_source";
    pub const UPDATE_SOURCE: &str = "update_source";
    pub const DELETE_SOURCE: &str = "delete_source";
}

// =============================================================================
// DEFAULT SOURCE
// =============================================================================

/// Identifier of the well-known default source.
pub const DEFAULT_SOURCE_ID: &str = "020f755c3c082000";

/// Organization of the well-known default source.
pub const DEFAULT_SOURCE_ORGANIZATION_ID: &str = "50616e67652c206c";

/// Name of the well-known default source.
pub const DEFAULT_SOURCE_NAME: &str = "autogen";

/// Undecoded identifiers of the default source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultSourceSpec {
    pub id: String,
    pub organization_id: String,
}

impl Default for DefaultSourceSpec {
    fn default() -> Self {
        Self {
            id: DEFAULT_SOURCE_ID.to_string(),
            organization_id: DEFAULT_SOURCE_ORGANIZATION_ID.to_string(),
        }
    }
}

impl DefaultSourceSpec {
    /// Decode into the canonical default record.
    ///
    /// Fails with `Invalid` if either identifier is malformed.
    pub fn decode(&self) -> Result<Source, RegistryError> {
        let id: Id = self.id.parse().map_err(|e| {
            RegistryError::Invalid(format!("failed to decode default source id: {e}"))
        })?;
        let organization_id: Id = self.organization_id.parse().map_err(|e| {
            RegistryError::Invalid(format!(
                "failed to decode default source organization id: {e}"
            ))
        })?;

        let mut source = Source::new(DEFAULT_SOURCE_NAME, SourceType::Local)
            .with_organization(organization_id)
            .with_default(true);
        source.id = id;
        Ok(source)
    }
}

// =============================================================================
// SOURCESERVICE TRAIT
// =============================================================================

/// Read/write operations on sources.
///
/// Every operation takes a `Context` so that storage-backed implementations
/// can honour deadlines and cancellation.
pub trait SourceService: Send + Sync {
    /// The first source flagged as default.
    fn default_source(&self, ctx: &Context) -> Result<Source, RegistryError>;

    /// The source stored under `id`.
    fn find_source_by_id(&self, ctx: &Context, id: Id) -> Result<Source, RegistryError>;

    /// Every stored source and how many there are, in unspecified order.
    fn find_sources(
        &self,
        ctx: &Context,
        opts: &FindOptions,
    ) -> Result<(Vec<Source>, usize), RegistryError>;

    /// Assign a fresh id to `src` and store it.
    fn create_source(&self, ctx: &Context, src: &mut Source) -> Result<(), RegistryError>;

    /// Apply `update` to the source under `id` and return the result.
    fn update_source(
        &self,
        ctx: &Context,
        id: Id,
        update: SourceUpdate,
    ) -> Result<Source, RegistryError>;

    /// Remove the source under `id`.
    fn delete_source(&self, ctx: &Context, id: Id) -> Result<(), RegistryError>;
}

// =============================================================================
// REGISTRY IMPLEMENTATION
// =============================================================================

/// In-memory `SourceService`.
pub struct SourceRegistry {
    store: SourceStore,
    generator: Box<dyn IdGenerator>,
    default_source: Source,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.store.len())
            .field("default_source", &self.default_source.id)
            .finish_non_exhaustive()
    }
}

impl SourceRegistry {
    /// Create an empty registry using the built-in default identifiers.
    ///
    /// The default source is not inserted until `initialize_default_source`.
    pub fn new(generator: impl IdGenerator + 'static) -> Result<Self, RegistryError> {
        Self::with_default(generator, &DefaultSourceSpec::default())
    }

    /// Create an empty registry with custom default identifiers.
    pub fn with_default(
        generator: impl IdGenerator + 'static,
        spec: &DefaultSourceSpec,
    ) -> Result<Self, RegistryError> {
        let default_source = spec.decode()?;
        Ok(Self {
            store: SourceStore::new(),
            generator: Box::new(generator),
            default_source,
        })
    }

    /// Create a registry and insert the default source.
    pub fn bootstrap(generator: impl IdGenerator + 'static) -> Result<Self, RegistryError> {
        let registry = Self::new(generator)?;
        registry.initialize_default_source(&Context::background())?;
        Ok(registry)
    }

    /// Create a registry with `SnowflakeGenerator` and insert the default source.
    pub fn bootstrap_default() -> Result<Self, RegistryError> {
        Self::bootstrap(SnowflakeGenerator::default())
    }

    /// The canonical default record this registry bootstraps.
    #[must_use]
    pub fn canonical_default(&self) -> &Source {
        &self.default_source
    }

    /// Insert the canonical default source unless its id is already taken.
    ///
    /// Safe to call any number of times. An existing record under the
    /// default id is never overwritten.
    pub fn initialize_default_source(&self, _ctx: &Context) -> Result<(), RegistryError> {
        let id = self.default_source.id;
        if self.store.insert_if_absent(id, self.default_source.clone()) {
            tracing::info!(id = %id, name = %self.default_source.name, "default source created");
        } else {
            tracing::debug!(id = %id, "default source already present");
        }
        Ok(())
    }

    /// Store `src` under its current id without assigning a new one.
    pub fn put_source(&self, _ctx: &Context, src: &Source) -> Result<(), RegistryError> {
        self.store.store(src.id, src.clone());
        tracing::debug!(id = %src.id, name = %src.name, "source stored");
        Ok(())
    }

    /// Number of stored sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True if no source is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl SourceService for SourceRegistry {
    fn default_source(&self, _ctx: &Context) -> Result<Source, RegistryError> {
        // Full scan: no secondary index on the default flag.
        let mut found = None;
        self.store.range(|_, src| {
            if src.default {
                found = Some(src.clone());
                return false;
            }
            true
        });
        found.ok_or_else(|| RegistryError::NotFound(NO_DEFAULT_SOURCE.to_string()))
    }

    fn find_source_by_id(&self, _ctx: &Context, id: Id) -> Result<Source, RegistryError> {
        self.store
            .load(id)
            .ok_or_else(RegistryError::source_not_found)
    }

    fn find_sources(
        &self,
        _ctx: &Context,
        opts: &FindOptions,
    ) -> Result<(Vec<Source>, usize), RegistryError> {
        if !opts.is_unbounded() {
            tracing::trace!(?opts, "find options are not applied by the in-memory registry");
        }
        let mut sources = Vec::with_capacity(self.store.len());
        self.store.range(|_, src| {
            sources.push(src.clone());
            true
        });
        let count = sources.len();
        Ok((sources, count))
    }

    fn create_source(&self, ctx: &Context, src: &mut Source) -> Result<(), RegistryError> {
        src.id = self.generator.id();
        self.put_source(ctx, src)
            .map_err(|e| e.within(op::CREATE_SOURCE))?;
        tracing::debug!(id = %src.id, "source created");
        Ok(())
    }

    fn update_source(
        &self,
        _ctx: &Context,
        id: Id,
        update: SourceUpdate,
    ) -> Result<Source, RegistryError> {
        let updated = self
            .store
            .update(id, |src| update.apply(src))
            .ok_or_else(|| RegistryError::source_not_found().within(op::UPDATE_SOURCE))?;
        tracing::debug!(id = %id, "source updated");
        Ok(updated)
    }

    fn delete_source(&self, _ctx: &Context, id: Id) -> Result<(), RegistryError> {
        self.store
            .remove(id)
            .ok_or_else(|| RegistryError::source_not_found().within(op::DELETE_SOURCE))?;
        tracing::debug!(id = %id, "source deleted");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
