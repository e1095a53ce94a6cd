//! # Core Type Definitions
//!
//! This module contains all core types for the Origo source registry:
//! - Identifiers (`Id`, `IdError`)
//! - Source records (`Source`, `SourceType`, `SourceUpdate`)
//! - Query options (`FindOptions`)
//! - Error types (`RegistryError`, `ErrorCode`)
//!
//! ## Identifier Format
//!
//! An `Id` is a 64-bit value whose canonical text form is exactly 16 lowercase
//! hexadecimal characters. The zero value means "unset" and never decodes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Length of the canonical hexadecimal form of an `Id`.
pub const ID_LENGTH: usize = 16;

/// Opaque 64-bit identifier for sources and organizations.
///
/// `Id::default()` is the unset identifier (zero). It is never produced by an
/// `IdGenerator` and never accepted by `Id::from_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(u64);

impl Id {
    /// Wrap a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True for the unset (zero) identifier.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Id {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LENGTH {
            return Err(IdError::InvalidLength(s.len()));
        }
        // from_str_radix tolerates a leading '+', the wire form does not.
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(IdError::InvalidHex(s.to_string()));
        }
        let value = u64::from_str_radix(s, 16).map_err(|_| IdError::InvalidHex(s.to_string()))?;
        if value == 0 {
            return Err(IdError::Zero);
        }
        Ok(Self(value))
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Reasons an identifier string fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The string is not exactly `ID_LENGTH` characters long.
    #[error("id must have a length of 16 bytes, got {0}")]
    InvalidLength(usize),

    /// The string contains a non-hexadecimal character.
    #[error("id is not valid hexadecimal: {0:?}")]
    InvalidHex(String),

    /// The string decodes to the reserved zero value.
    #[error("invalid ID")]
    Zero,
}

// =============================================================================
// SOURCE
// =============================================================================

/// Kind of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// An external 1.x instance (username/password credentials).
    V1,
    /// An external 2.x instance (token credentials).
    #[default]
    V2,
    /// The process's own query engine.
    #[serde(rename = "self")]
    Local,
}

impl SourceType {
    /// Wire tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
            Self::Local => "self",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, addressable origin of query data.
///
/// `id` is assigned by the registry on create and never changes afterwards.
/// `organization_id` is fixed once set; `SourceUpdate` cannot touch either.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    /// Registry-assigned identifier.
    #[serde(skip_serializing_if = "Id::is_unset")]
    pub id: Id,
    /// Owning organization.
    #[serde(skip_serializing_if = "Id::is_unset")]
    pub organization_id: Id,
    /// Whether this is the source used when none is named.
    pub default: bool,
    /// Human-readable label.
    pub name: String,
    /// Kind of source.
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Endpoint of the source.
    pub url: String,
    /// Skip TLS certificate verification when talking to `url`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub insecure_skip_verify: bool,
    /// Telegraf database name.
    pub telegraf: String,
    /// 2.x credential.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// 1.x username.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// 1.x password.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// 1.x JWT shared secret.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shared_secret: String,
    /// 1.x meta node URL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub meta_url: String,
    /// 1.x default retention policy.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_rp: String,
}

impl Source {
    /// Create an unregistered source with the given name and kind.
    #[must_use]
    pub fn new(name: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            name: name.into(),
            source_type,
            ..Self::default()
        }
    }

    /// Set the owning organization.
    #[must_use]
    pub fn with_organization(mut self, organization_id: Id) -> Self {
        self.organization_id = organization_id;
        self
    }

    /// Set the endpoint.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the default flag.
    #[must_use]
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }
}

// =============================================================================
// SOURCE UPDATE
// =============================================================================

/// A partial patch for a `Source`.
///
/// Only fields set to `Some` are written by `apply`. There is no
/// field for `id` or `organization_id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub source_type: Option<SourceType>,
    pub default: Option<bool>,
    pub url: Option<String>,
    pub insecure_skip_verify: Option<bool>,
    pub telegraf: Option<String>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub shared_secret: Option<String>,
    pub meta_url: Option<String>,
    pub default_rp: Option<String>,
}

impl SourceUpdate {
    /// Patch that only renames.
    #[must_use]
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// True if applying this patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every present field into `src`.
    pub fn apply(self, src: &mut Source) {
        if let Some(name) = self.name {
            src.name = name;
        }
        if let Some(source_type) = self.source_type {
            src.source_type = source_type;
        }
        if let Some(default) = self.default {
            src.default = default;
        }
        if let Some(url) = self.url {
            src.url = url;
        }
        if let Some(insecure) = self.insecure_skip_verify {
            src.insecure_skip_verify = insecure;
        }
        if let Some(telegraf) = self.telegraf {
            src.telegraf = telegraf;
        }
        if let Some(token) = self.token {
            src.token = token;
        }
        if let Some(username) = self.username {
            src.username = username;
        }
        if let Some(password) = self.password {
            src.password = password;
        }
        if let Some(shared_secret) = self.shared_secret {
            src.shared_secret = shared_secret;
        }
        if let Some(meta_url) = self.meta_url {
            src.meta_url = meta_url;
        }
        if let Some(default_rp) = self.default_rp {
            src.default_rp = default_rp;
        }
    }
}

// =============================================================================
// FIND OPTIONS
// =============================================================================

/// Paging and sorting hints for `find_sources`.
///
/// The in-memory registry accepts these and returns every record regardless.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    pub limit: Option<usize>,
    pub offset: usize,
    pub sort_by: Option<String>,
    pub descending: bool,
}

impl FindOptions {
    /// True when no paging or sorting was requested.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Message carried by a failed lookup by id.
pub const SOURCE_NOT_FOUND: &str = "source not found";

/// Message carried by a failed default lookup.
pub const NO_DEFAULT_SOURCE: &str = "no default source found";

/// Coarse classification of a `RegistryError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Invalid,
    Internal,
}

/// Errors returned by registry operations.
///
/// - No retries: every operation is a synchronous in-memory action
/// - `Op` annotates an inner error with the registry operation that failed
/// - Use `code()` to classify without unwrapping annotations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Input or configuration is malformed.
    #[error("{0}")]
    Invalid(String),

    /// The underlying store failed.
    #[error("store failure: {0}")]
    Store(String),

    /// An inner error annotated with the failing operation.
    #[error("registry/{op}: {source}")]
    Op {
        op: &'static str,
        source: Box<RegistryError>,
    },
}

impl RegistryError {
    /// The not-found error for a missing source.
    #[must_use]
    pub fn source_not_found() -> Self {
        Self::NotFound(SOURCE_NOT_FOUND.to_string())
    }

    /// Annotate this error with the name of the operation it failed.
    #[must_use]
    pub fn within(self, op: &'static str) -> Self {
        Self::Op {
            op,
            source: Box::new(self),
        }
    }

    /// Classify this error, looking through operation annotations.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Invalid(_) => ErrorCode::Invalid,
            Self::Store(_) => ErrorCode::Internal,
            Self::Op { source, .. } => source.code(),
        }
    }

    /// Shorthand for `code() == ErrorCode::NotFound`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }
}

impl From<IdError> for RegistryError {
    fn from(err: IdError) -> Self {
        Self::Invalid(err.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
