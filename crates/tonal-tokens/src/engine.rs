//! Token derivation — mapping every (theme, group, role) onto the scale.
//!
//! For each triple the engine picks a *center* weight and places the five
//! variations at `-2g, -g, 0, +g, +2g` around it, where `g` is the role's
//! gap. The center is chosen in three tiers:
//!
//! 1. **Exact**: the lowest index that meets the role's minimum contrast
//!    and whose whole five-point neighborhood does too.
//! 2. **Best fallback**: among indices that meet the minimum on their own,
//!    the one farthest from either end of the scale (one warning).
//! 3. **Midpoint**: `n / 2` when nothing meets the minimum (one critical).
//!
//! The center is then clamped so the neighborhood fits on the scale. Any
//! variation that still falls off is pulled to the nearest end and flagged.
//!
//! Triples are independent of each other, so they are derived in parallel
//! and reassembled in declaration order.

use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tonal_color::HexColor;

use crate::contrast::ContrastRating;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::DeriveError;
use crate::raw::{RawGroup, RawPalette};
use crate::scheme::{Group, Role};
use crate::series::WeightSeries;
use crate::theme::{Theme, Variation};

/// Slack given to neighbor ratios so float rounding cannot reject a weight
/// that meets the minimum on paper.
pub const NEIGHBORHOOD_TOLERANCE: f64 = 0.001;

// ---------------------------------------------------------------------------
// Center search
// ---------------------------------------------------------------------------

/// Which tier of the search produced a center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenterTier {
    Exact,
    BestFallback,
    Midpoint,
}

/// A searched center before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterChoice {
    pub index: usize,
    pub tier: CenterTier,
}

/// Search `ratios` (one per scale position) for the center of a role.
#[must_use]
pub fn find_center(ratios: &[f64], min_contrast: f64, gap: usize) -> CenterChoice {
    let n = ratios.len();

    let neighborhood_holds = |center: usize| {
        Variation::ALL.iter().all(|v| {
            nominal_index(center, v.offset(gap))
                .filter(|&i| i < n)
                .is_some_and(|i| ratios[i] + NEIGHBORHOOD_TOLERANCE >= min_contrast)
        })
    };

    if let Some(index) = (0..n).find(|&i| ratios[i] >= min_contrast && neighborhood_holds(i)) {
        return CenterChoice { index, tier: CenterTier::Exact };
    }

    let mut best: Option<(usize, usize)> = None;
    for (i, &ratio) in ratios.iter().enumerate() {
        if ratio < min_contrast {
            continue;
        }
        let room = i.min(n - 1 - i);
        if best.is_none_or(|(_, r)| room > r) {
            best = Some((i, room));
        }
    }
    if let Some((index, _)) = best {
        return CenterChoice { index, tier: CenterTier::BestFallback };
    }

    CenterChoice { index: n / 2, tier: CenterTier::Midpoint }
}

/// Pull `index` into `[2g, n-1-2g]` so every variation lands on the scale.
///
/// When the scale is too short for that range to exist, the center goes to
/// `min(2g, n-1)`: the weakest variation stays on the scale and the stronger
/// side is clamped.
#[must_use]
pub fn clamp_center(index: usize, n: usize, gap: usize) -> usize {
    let reach = gap.saturating_mul(2);
    let last = n.saturating_sub(1);
    match last.checked_sub(reach) {
        Some(hi) if reach <= hi => index.clamp(reach, hi),
        _ => reach.min(last),
    }
}

/// Place one variation around `center`. Returns the index on the scale and
/// whether it had to be clamped.
#[must_use]
pub fn place_variation(center: usize, offset: i64, n: usize) -> (usize, bool) {
    let last = n.saturating_sub(1);
    match nominal_index(center, offset) {
        Some(i) if i <= last => (i, false),
        Some(_) => (last, true),
        None => (0, true),
    }
}

/// `center + offset`, or `None` when that lands below zero.
fn nominal_index(center: usize, offset: i64) -> Option<usize> {
    let center = i64::try_from(center).ok()?;
    usize::try_from(center.checked_add(offset)?).ok()
}

// ---------------------------------------------------------------------------
// Derived tokens
// ---------------------------------------------------------------------------

/// One variation of one role, resolved to a raw token for one theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedToken {
    pub hex_value: HexColor,
    pub contrast_ratio: f64,
    pub contrast_rating: ContrastRating,
    /// `group-weight` name of the raw token this one copies.
    pub source_token_ref: String,
    pub role: String,
    pub group: String,
    pub weight: String,
    pub variation_offset: i64,
    pub was_clamped: bool,
}

/// The five variations of one role, weakest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleTokens {
    pub role: String,
    pub variations: [DerivedToken; 5],
}

impl RoleTokens {
    #[must_use]
    pub fn get(&self, variation: Variation) -> &DerivedToken {
        &self.variations[usize::from(variation.code() - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variation, &DerivedToken)> {
        Variation::ALL.into_iter().zip(&self.variations)
    }
}

impl Serialize for RoleTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.variations.len()))?;
        for (variation, token) in self.iter() {
            map.serialize_entry(variation.as_str(), token)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTokens {
    pub group: String,
    pub roles: Vec<RoleTokens>,
}

impl Serialize for GroupTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.roles.len()))?;
        for r in &self.roles {
            map.serialize_entry(&r.role, r)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeTokens {
    pub theme: Theme,
    pub groups: Vec<GroupTokens>,
}

impl Serialize for ThemeTokens {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for g in &self.groups {
            map.serialize_entry(&g.group, g)?;
        }
        map.end()
    }
}

/// theme → group → role → variation → [`DerivedToken`].
///
/// Every level keeps declaration order: themes as requested, groups and
/// roles as in the scheme, variations weakest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokensByTheme {
    pub themes: Vec<ThemeTokens>,
}

impl TokensByTheme {
    #[must_use]
    pub fn theme(&self, theme: Theme) -> Option<&ThemeTokens> {
        self.themes.iter().find(|t| t.theme == theme)
    }

    #[must_use]
    pub fn role(&self, theme: Theme, group: &str, role: &str) -> Option<&RoleTokens> {
        self.theme(theme)?
            .groups
            .iter()
            .find(|g| g.group == group)?
            .roles
            .iter()
            .find(|r| r.role == role)
    }

    #[must_use]
    pub fn get(&self, theme: Theme, group: &str, role: &str, variation: Variation) -> Option<&DerivedToken> {
        self.role(theme, group, role).map(|r| r.get(variation))
    }

    /// Every token with its theme and variation, in nesting order.
    pub fn iter(&self) -> impl Iterator<Item = (Theme, Variation, &DerivedToken)> {
        self.themes.iter().flat_map(|t| {
            t.groups
                .iter()
                .flat_map(|g| &g.roles)
                .flat_map(RoleTokens::iter)
                .map(move |(v, token)| (t.theme, v, token))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.themes
            .iter()
            .flat_map(|t| &t.groups)
            .map(|g| g.roles.len() * Variation::ALL.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for TokensByTheme {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.themes.len()))?;
        for t in &self.themes {
            map.serialize_entry(t.theme.as_str(), t)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// How the per-role jobs of one derivation are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fanout {
    /// Spread jobs over the rayon pool.
    #[default]
    Parallel,
    /// Run jobs on the calling thread. Required while holding a lock that
    /// other rayon tasks may also take: a worker blocked in a parallel
    /// collect steals pending tasks, and one of them could be a second
    /// locker on the same thread.
    Sequential,
}

impl Fanout {
    /// [`Fanout::Sequential`] on a rayon worker thread, otherwise
    /// [`Fanout::Parallel`]. Non-worker threads block without stealing.
    #[must_use]
    pub fn for_current_thread() -> Self {
        if rayon::current_thread_index().is_some() {
            Self::Sequential
        } else {
            Self::Parallel
        }
    }
}

/// Derive every token of every (theme, group, role) on the rayon pool.
///
/// # Errors
///
/// Fails if `raw` lacks one of `groups` or holds a scale of a different
/// length than `series`. Unmet contrast never fails; it is reported in the
/// returned diagnostics.
pub fn derive_tokens(
    raw: &RawPalette,
    groups: &[Group],
    roles: &[Role],
    series: &WeightSeries,
    themes: &[Theme],
) -> Result<(TokensByTheme, Diagnostics), DeriveError> {
    derive_tokens_with(raw, groups, roles, series, themes, Fanout::Parallel)
}

/// [`derive_tokens`] with an explicit [`Fanout`]. Output is identical for
/// both modes.
///
/// # Errors
///
/// Same as [`derive_tokens`].
pub fn derive_tokens_with(
    raw: &RawPalette,
    groups: &[Group],
    roles: &[Role],
    series: &WeightSeries,
    themes: &[Theme],
    fanout: Fanout,
) -> Result<(TokensByTheme, Diagnostics), DeriveError> {
    let scales = groups
        .iter()
        .map(|g| {
            raw.group(&g.name)
                .filter(|rg| rg.tokens.len() == series.len())
                .ok_or_else(|| DeriveError::MissingRawGroup(g.name.clone()))
        })
        .collect::<Result<Vec<&RawGroup>, _>>()?;

    let mut jobs: Vec<(Theme, &RawGroup, &Role)> = Vec::with_capacity(themes.len() * scales.len() * roles.len());
    for &theme in themes {
        for &scale in &scales {
            jobs.extend(roles.iter().map(|role| (theme, scale, role)));
        }
    }

    let derived: Vec<(RoleTokens, Vec<Diagnostic>)> = match fanout {
        Fanout::Parallel => jobs
            .into_par_iter()
            .map(|(theme, scale, role)| derive_role(theme, scale, role))
            .collect(),
        Fanout::Sequential => jobs
            .into_iter()
            .map(|(theme, scale, role)| derive_role(theme, scale, role))
            .collect(),
    };

    let mut diagnostics = Diagnostics::new();
    let mut derived = derived.into_iter();
    let mut tokens = TokensByTheme {
        themes: Vec::with_capacity(themes.len()),
    };
    for &theme in themes {
        let mut theme_tokens = ThemeTokens {
            theme,
            groups: Vec::with_capacity(scales.len()),
        };
        for scale in &scales {
            let group_roles = derived
                .by_ref()
                .take(roles.len())
                .map(|(role_tokens, diags)| {
                    diagnostics.extend(diags);
                    role_tokens
                })
                .collect();
            theme_tokens.groups.push(GroupTokens {
                group: scale.name.clone(),
                roles: group_roles,
            });
        }
        tokens.themes.push(theme_tokens);
    }

    Ok((tokens, diagnostics))
}

fn derive_role(theme: Theme, scale: &RawGroup, role: &Role) -> (RoleTokens, Vec<Diagnostic>) {
    let n = scale.tokens.len();
    let mut diagnostics = Vec::new();

    let choice = find_center(&scale.ratios(theme), role.min_contrast, role.gap);
    match choice.tier {
        CenterTier::Exact => {}
        CenterTier::BestFallback => diagnostics.push(Diagnostic::partial_match(&scale.name, &role.key, theme)),
        CenterTier::Midpoint => diagnostics.push(Diagnostic::unsatisfiable(&scale.name, &role.key, theme)),
    }
    let center = clamp_center(choice.index, n, role.gap);

    let variations = Variation::ALL.map(|variation| {
        let offset = variation.offset(role.gap);
        let (index, was_clamped) = place_variation(center, offset, n);
        if was_clamped {
            diagnostics.push(Diagnostic::clamped(&scale.name, &role.key, theme, variation));
        }
        let source = &scale.tokens[index];
        let reading = source.contrast.get(theme);
        DerivedToken {
            hex_value: source.hex_value,
            contrast_ratio: reading.ratio,
            contrast_rating: reading.rating,
            source_token_ref: source.token_name.clone(),
            role: role.key.clone(),
            group: scale.name.clone(),
            weight: source.weight.clone(),
            variation_offset: offset,
            was_clamped,
        }
    });

    let tokens = RoleTokens {
        role: role.key.clone(),
        variations,
    };
    (tokens, diagnostics)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
