//! The derivation entry point: scheme in, complete token set out.

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::engine::{Fanout, TokensByTheme, derive_tokens_with};
use crate::error::DeriveError;
use crate::raw::{RawPalette, build_raw_palette};
use crate::scheme::{ColorScheme, ValidScheme};
use crate::series::WeightSeries;
use crate::theme::{Backgrounds, Theme};
use crate::toolkit::Toolkit;

/// Counts over one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub groups: usize,
    pub weights: usize,
    pub roles: usize,
    pub themes: usize,
    pub tokens: usize,
    pub critical: usize,
    pub warnings: usize,
}

/// Everything one derivation produces. This is the only shape export and
/// display code may rely on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationResult {
    pub weights: WeightSeries,
    pub backgrounds: Backgrounds,
    pub raw_palette: RawPalette,
    pub tokens_by_theme: TokensByTheme,
    pub diagnostics: Diagnostics,
    pub summary: Summary,
}

/// Derive with the default [`Toolkit`].
///
/// # Errors
///
/// See [`derive_with`].
pub fn derive(scheme: &ColorScheme) -> Result<DerivationResult, DeriveError> {
    derive_with(scheme, &Toolkit::default())
}

/// Validate `scheme` and derive its tokens with `toolkit`.
///
/// # Errors
///
/// Fails when the scheme is malformed, or when the toolkit's weight series
/// has the wrong length or repeats a label.
pub fn derive_with(scheme: &ColorScheme, toolkit: &Toolkit) -> Result<DerivationResult, DeriveError> {
    derive_valid(&scheme.validate()?, toolkit)
}

/// Derive from an already validated scheme.
///
/// # Errors
///
/// Fails when the toolkit's weight series has the wrong length or repeats
/// a label.
pub fn derive_valid(scheme: &ValidScheme, toolkit: &Toolkit) -> Result<DerivationResult, DeriveError> {
    derive_valid_with(scheme, toolkit, Fanout::Parallel)
}

/// [`derive_valid`] with an explicit [`Fanout`] for the per-role jobs.
///
/// # Errors
///
/// Same as [`derive_valid`].
pub fn derive_valid_with(
    scheme: &ValidScheme,
    toolkit: &Toolkit,
    fanout: Fanout,
) -> Result<DerivationResult, DeriveError> {
    let weights = toolkit.series.series(scheme.weight_count);
    if weights.len() != scheme.weight_count {
        return Err(DeriveError::SeriesLength {
            expected: scheme.weight_count,
            actual: weights.len(),
        });
    }
    if let Some(label) = weights.first_duplicate() {
        return Err(DeriveError::DuplicateWeight(label.to_string()));
    }

    let (raw_palette, raw_diagnostics) = build_raw_palette(
        &scheme.groups,
        &weights,
        scheme.backgrounds,
        &*toolkit.interpolator,
        &*toolkit.contrast,
    );

    let mut diagnostics = Diagnostics::new();
    diagnostics.extend(raw_diagnostics);

    let (tokens_by_theme, engine_diagnostics) =
        derive_tokens_with(&raw_palette, &scheme.groups, &scheme.roles, &weights, &Theme::ALL, fanout)?;
    diagnostics.merge(engine_diagnostics);

    let summary = Summary {
        groups: scheme.groups.len(),
        weights: weights.len(),
        roles: scheme.roles.len(),
        themes: Theme::ALL.len(),
        tokens: tokens_by_theme.len(),
        critical: diagnostics.critical.len(),
        warnings: diagnostics.warnings.len(),
    };
    debug!(
        scheme = %scheme.name,
        tokens = summary.tokens,
        critical = summary.critical,
        warnings = summary.warnings,
        "derived tokens"
    );

    Ok(DerivationResult {
        weights,
        backgrounds: scheme.backgrounds,
        raw_palette,
        tokens_by_theme,
        diagnostics,
        summary,
    })
}
