//! Export — CSS custom properties, CSV and JSON views of a derivation.
//!
//! Every exporter reads the published [`DerivationResult`] shape and
//! nothing else.

use std::fmt::Write as _;

use serde::Serialize;

use crate::derivation::DerivationResult;
use crate::error::ExportError;
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// CSS
// ---------------------------------------------------------------------------

/// Render the result as CSS custom properties.
///
/// `:root` carries the raw scale plus the light contextual tokens. Dark
/// tokens are emitted twice: under `prefers-color-scheme: dark` and under a
/// `.dark` class for manual switching. Contextual tokens reference raw ones
/// with `var()`, so editing a raw value restyles every role that uses it.
///
/// # Errors
///
/// Fails only if writing to the output buffer fails.
pub fn to_css(result: &DerivationResult) -> Result<String, ExportError> {
    let mut out = String::new();

    writeln!(out, ":root {{")?;
    write_background(&mut out, result, Theme::Light, "  ")?;
    for group in &result.raw_palette.groups {
        for token in &group.tokens {
            writeln!(out, "  --{}: {};", token.token_name, token.hex_value)?;
        }
    }
    write_contextual(&mut out, result, Theme::Light, "  ")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, "@media (prefers-color-scheme: dark) {{")?;
    writeln!(out, "  :root {{")?;
    write_background(&mut out, result, Theme::Dark, "    ")?;
    write_contextual(&mut out, result, Theme::Dark, "    ")?;
    writeln!(out, "  }}")?;
    writeln!(out, "}}")?;

    writeln!(out)?;
    writeln!(out, ".dark {{")?;
    write_background(&mut out, result, Theme::Dark, "  ")?;
    write_contextual(&mut out, result, Theme::Dark, "  ")?;
    writeln!(out, "}}")?;

    Ok(out)
}

fn write_background(out: &mut String, result: &DerivationResult, theme: Theme, indent: &str) -> std::fmt::Result {
    writeln!(out, "{indent}--bg-primary: {};", result.backgrounds.get(theme))
}

fn write_contextual(out: &mut String, result: &DerivationResult, theme: Theme, indent: &str) -> std::fmt::Result {
    let Some(tokens) = result.tokens_by_theme.theme(theme) else {
        return Ok(());
    };
    for group in &tokens.groups {
        for role in &group.roles {
            for (variation, token) in role.iter() {
                writeln!(
                    out,
                    "{indent}--{}-{}-{variation}: var(--{});",
                    group.group, role.role, token.source_token_ref
                )?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    theme: &'a str,
    group: &'a str,
    role: &'a str,
    variation: &'a str,
    weight: &'a str,
    value: String,
    hsl: String,
    contrast_ratio: String,
    contrast_rating: &'a str,
}

/// Render one row per derived token, with a header row.
///
/// # Errors
///
/// Fails if the CSV writer cannot encode or flush a row.
pub fn to_csv(result: &DerivationResult) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    for (theme, variation, token) in result.tokens_by_theme.iter() {
        writer.serialize(CsvRow {
            theme: theme.as_str(),
            group: &token.group,
            role: &token.role,
            variation: variation.as_str(),
            weight: &token.weight,
            value: token.hex_value.to_string(),
            hsl: token.hex_value.to_hsl_string(),
            contrast_ratio: format!("{:.2}", token.contrast_ratio),
            contrast_rating: token.contrast_rating.as_str(),
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Serialize the whole result as pretty-printed JSON.
///
/// # Errors
///
/// Fails if serialization fails.
pub fn to_json(result: &DerivationResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}
