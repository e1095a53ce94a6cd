//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::error::CliError;
use origo_core::{
    Context, EncodingFormat, FindOptions, Id, Source, SourceRegistry, SourceService,
};
use std::io::Write;

/// Replacement text for secret fields in output.
const REDACTED: &str = "******";

/// Copy of `src` with credentials masked.
fn redacted(src: &Source) -> Source {
    let mut out = src.clone();
    for secret in [&mut out.password, &mut out.token, &mut out.shared_secret] {
        if !secret.is_empty() {
            *secret = REDACTED.to_string();
        }
    }
    out
}

fn write_json(out: &mut dyn Write, value: &serde_json::Value) -> Result<(), CliError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn write_source(out: &mut dyn Write, src: &Source) -> Result<(), CliError> {
    writeln!(out, "ID:        {}", src.id)?;
    writeln!(out, "Org:       {}", src.organization_id)?;
    writeln!(out, "Name:      {}", src.name)?;
    writeln!(out, "Type:      {}", src.source_type)?;
    writeln!(out, "Default:   {}", src.default)?;
    if !src.url.is_empty() {
        writeln!(out, "URL:       {}", src.url)?;
    }
    if src.insecure_skip_verify {
        writeln!(out, "Insecure:  true")?;
    }
    if !src.telegraf.is_empty() {
        writeln!(out, "Telegraf:  {}", src.telegraf)?;
    }
    if !src.username.is_empty() {
        writeln!(out, "Username:  {}", src.username)?;
    }
    if !src.default_rp.is_empty() {
        writeln!(out, "Retention: {}", src.default_rp)?;
    }
    Ok(())
}

/// Every source, sorted by id for stable output.
fn all_sources(registry: &SourceRegistry) -> Result<Vec<Source>, CliError> {
    let (mut sources, _) = registry.find_sources(&Context::background(), &FindOptions::default())?;
    sources.sort_by_key(|s| s.id);
    Ok(sources)
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List every source.
pub fn cmd_list(
    out: &mut dyn Write,
    json_mode: bool,
    registry: &SourceRegistry,
) -> Result<(), CliError> {
    let sources: Vec<Source> = all_sources(registry)?.iter().map(redacted).collect();

    if json_mode {
        let output = serde_json::json!({
            "count": sources.len(),
            "sources": sources,
        });
        return write_json(out, &output);
    }

    writeln!(out, "{:<16}  {:<4}  {:<7}  NAME", "ID", "TYPE", "DEFAULT")?;
    for src in &sources {
        writeln!(
            out,
            "{:<16}  {:<4}  {:<7}  {}",
            src.id.to_string(),
            src.source_type.as_str(),
            if src.default { "*" } else { "" },
            src.name
        )?;
    }
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show one source by id.
pub fn cmd_show(
    out: &mut dyn Write,
    json_mode: bool,
    registry: &SourceRegistry,
    id: &str,
) -> Result<(), CliError> {
    let id: Id = id.parse()?;
    let src = redacted(&registry.find_source_by_id(&Context::background(), id)?);

    if json_mode {
        return write_json(out, &serde_json::to_value(&src)?);
    }
    write_source(out, &src)
}

// =============================================================================
// DEFAULT COMMAND
// =============================================================================

/// Show the default source.
pub fn cmd_default(
    out: &mut dyn Write,
    json_mode: bool,
    registry: &SourceRegistry,
) -> Result<(), CliError> {
    let src = redacted(&registry.default_source(&Context::background())?);

    if json_mode {
        return write_json(out, &serde_json::to_value(&src)?);
    }
    write_source(out, &src)
}

// =============================================================================
// CLASSIFY COMMAND
// =============================================================================

/// Classify a MIME type.
pub fn cmd_classify(out: &mut dyn Write, json_mode: bool, mime: &str) -> Result<(), CliError> {
    let format = EncodingFormat::from_mime_type(mime);

    if json_mode {
        let output = serde_json::json!({
            "mime_type": mime,
            "format": format,
            "content_type": format.content_type(),
        });
        return write_json(out, &output);
    }

    writeln!(out, "{mime} -> {format}")?;
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Summarize the registry and flag more than one default-marked source.
pub fn cmd_check(
    out: &mut dyn Write,
    json_mode: bool,
    registry: &SourceRegistry,
) -> Result<(), CliError> {
    let sources = all_sources(registry)?;
    let flagged: Vec<&Source> = sources.iter().filter(|s| s.default).collect();
    if flagged.len() > 1 {
        tracing::warn!(
            count = flagged.len(),
            "more than one source is marked default; lookups pick one arbitrarily"
        );
    }
    let default = registry.default_source(&Context::background()).ok();

    if json_mode {
        let output = serde_json::json!({
            "sources": sources.len(),
            "default_flagged": flagged.len(),
            "default_id": default.as_ref().map(|s| s.id),
            "ok": flagged.len() == 1,
        });
        return write_json(out, &output);
    }

    writeln!(out, "Origo Registry Check")?;
    writeln!(out, "====================")?;
    writeln!(out, "Sources:         {}", sources.len())?;
    writeln!(out, "Default-flagged: {}", flagged.len())?;
    match default {
        Some(src) => writeln!(out, "Default:         {} ({})", src.id, src.name)?,
        None => writeln!(out, "Default:         none")?,
    }
    writeln!(
        out,
        "Status:          {}",
        if flagged.len() == 1 { "ok" } else { "warning" }
    )?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
