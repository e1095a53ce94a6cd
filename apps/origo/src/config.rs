//! # Configuration
//!
//! TOML file describing the default source and the sources to seed.
//!
//! ```toml
//! [default_source]
//! id = "020f755c3c082000"
//! organization_id = "50616e67652c206c"
//!
//! [[sources]]
//! name = "telegraf"
//! type = "v1"
//! url = "http://localhost:8086"
//! username = "reader"
//!
//! [[sources]]
//! id = "0000000000000abc"
//! name = "edge"
//! type = "v2"
//! ```
//!
//! Seeds with an `id` are stored under it. Seeds without one get a fresh id.

use crate::error::CliError;
use origo_core::{
    Context, DefaultSourceSpec, IdGenerator, Source, SourceRegistry, SourceService,
};
use serde::Deserialize;
use std::path::Path;

/// Maximum config file size (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Override for the well-known default source identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultSourceConfig {
    pub id: String,
    pub organization_id: String,
}

/// Parsed `origo.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrigoConfig {
    #[serde(default)]
    pub default_source: Option<DefaultSourceConfig>,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl OrigoConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let metadata = std::fs::metadata(path)?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(CliError::ConfigTooLarge {
                path: path.display().to_string(),
                size: metadata.len(),
                max: MAX_CONFIG_FILE_SIZE,
            });
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|message| CliError::Config {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse config text.
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Default source identifiers, falling back to the built-in ones.
    #[must_use]
    pub fn default_spec(&self) -> DefaultSourceSpec {
        self.default_source
            .as_ref()
            .map_or_else(DefaultSourceSpec::default, |d| DefaultSourceSpec {
                id: d.id.clone(),
                organization_id: d.organization_id.clone(),
            })
    }

    /// Build a bootstrapped registry holding every seed source.
    pub fn build_registry(
        &self,
        generator: impl IdGenerator + 'static,
    ) -> Result<SourceRegistry, CliError> {
        let ctx = Context::background();
        let registry = SourceRegistry::with_default(generator, &self.default_spec())?;
        registry.initialize_default_source(&ctx)?;

        for seed in &self.sources {
            if seed.id.is_unset() {
                let mut src = seed.clone();
                registry.create_source(&ctx, &mut src)?;
            } else {
                registry.put_source(&ctx, seed)?;
            }
        }

        tracing::debug!(
            seeded = self.sources.len(),
            total = registry.len(),
            "registry built from config"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use origo_core::{FindOptions, Id, SequentialGenerator, SourceType};

    #[test]
    fn empty_config_uses_builtin_default() {
        let config = OrigoConfig::parse("").expect("parse");
        assert_eq!(config.default_spec(), DefaultSourceSpec::default());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn parses_seeds_and_override() {
        let config = OrigoConfig::parse(
            r#"
            [default_source]
            id = "00000000000000aa"
            organization_id = "00000000000000bb"

            [[sources]]
            name = "telegraf"
            type = "v1"
            url = "http://localhost:8086"

            [[sources]]
            id = "0000000000000abc"
            name = "edge"
            "#,
        )
        .expect("parse");

        assert_eq!(config.default_spec().id, "00000000000000aa");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].source_type, SourceType::V1);
        assert!(config.sources[0].id.is_unset());
        assert_eq!(config.sources[1].id, Id::new(0xabc));
        assert_eq!(config.sources[1].source_type, SourceType::V2);
    }

    #[test]
    fn rejects_unknown_top_level_keys() {
        assert!(OrigoConfig::parse("unknown = 1").is_err());
    }

    #[test]
    fn build_registry_seeds_with_and_without_ids() {
        let config = OrigoConfig::parse(
            r#"
            [[sources]]
            name = "fresh"

            [[sources]]
            id = "0000000000000abc"
            name = "fixed"
            "#,
        )
        .expect("parse");

        let registry = config
            .build_registry(SequentialGenerator::new())
            .expect("build");
        let ctx = Context::background();
        let (_, count) = registry
            .find_sources(&ctx, &FindOptions::default())
            .expect("find");
        assert_eq!(count, 3);
        assert_eq!(
            registry
                .find_source_by_id(&ctx, Id::new(0xabc))
                .expect("fixed")
                .name,
            "fixed"
        );
        assert_eq!(
            registry
                .find_source_by_id(&ctx, Id::new(1))
                .expect("fresh")
                .name,
            "fresh"
        );
    }

    #[test]
    fn malformed_default_override_fails_build() {
        let config = OrigoConfig {
            default_source: Some(DefaultSourceConfig {
                id: "xyz".to_string(),
                organization_id: "50616e67652c206c".to_string(),
            }),
            sources: Vec::new(),
        };
        assert!(matches!(
            config.build_registry(SequentialGenerator::new()),
            Err(CliError::Registry(_))
        ));
    }
}
