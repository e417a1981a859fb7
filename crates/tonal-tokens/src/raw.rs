//! Raw palette — every group's tonal scale, pre-tagged with contrast.
//!
//! This is the substrate the derivation engine searches. It is built once
//! per derivation and never mutated afterwards.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tonal_color::{HexColor, normalize_hex};

use crate::contrast::{ContrastEvaluator, ContrastRating, ContrastReading};
use crate::diagnostics::Diagnostic;
use crate::interpolate::SeedInterpolator;
use crate::scheme::Group;
use crate::series::WeightSeries;
use crate::theme::{Backgrounds, Theme};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Contrast of one color against both backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThemeContrast {
    pub light: ContrastReading,
    pub dark: ContrastReading,
}

impl ThemeContrast {
    #[must_use]
    pub const fn get(&self, theme: Theme) -> ContrastReading {
        theme.pick(self.light, self.dark)
    }
}

/// One weight of one group's scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToken {
    pub hex_value: HexColor,
    /// `group-weight`, the name other tokens reference this one by.
    pub token_name: String,
    #[serde(skip)]
    pub weight: String,
    pub contrast: ThemeContrast,
}

/// One group's full scale, lightest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGroup {
    pub name: String,
    pub tokens: Vec<RawToken>,
}

impl RawGroup {
    /// The group's ratios for `theme`, in scale order.
    #[must_use]
    pub fn ratios(&self, theme: Theme) -> Vec<f64> {
        self.tokens.iter().map(|t| t.contrast.get(theme).ratio).collect()
    }
}

impl Serialize for RawGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tokens.len()))?;
        for token in &self.tokens {
            map.serialize_entry(&token.weight, token)?;
        }
        map.end()
    }
}

/// group → weight → [`RawToken`], in scheme and scale order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPalette {
    pub groups: Vec<RawGroup>,
}

impl RawPalette {
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&RawGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    #[must_use]
    pub fn token(&self, group: &str, weight: &str) -> Option<&RawToken> {
        self.group(group)?.tokens.iter().find(|t| t.weight == weight)
    }

    /// Look a token up by its `group-weight` name.
    #[must_use]
    pub fn resolve(&self, token_name: &str) -> Option<&RawToken> {
        self.groups
            .iter()
            .flat_map(|g| &g.tokens)
            .find(|t| t.token_name == token_name)
    }

    /// Total number of raw tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.tokens.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for RawPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.name, group)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the raw palette for `groups` over `series`.
///
/// The interpolator runs once per group. Its output is read from the far
/// end, so index 0 of every scale is the interpolator's last (lightest)
/// value; the output itself is left untouched. Positions the interpolator
/// did not fill, or filled with an unreadable color, use the seed.
///
/// Ratios the evaluator reports as negative or non-finite are stored as 0
/// and reported as critical diagnostics.
pub fn build_raw_palette(
    groups: &[Group],
    series: &WeightSeries,
    backgrounds: Backgrounds,
    interpolator: &dyn SeedInterpolator,
    evaluator: &dyn ContrastEvaluator,
) -> (RawPalette, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut palette = RawPalette {
        groups: Vec::with_capacity(groups.len()),
    };

    for group in groups {
        let ramp = interpolator.interpolate(group.seed, series);
        let mut lightest_first = ramp.iter().rev();

        let tokens = series
            .iter()
            .map(|weight| {
                let hex_value = lightest_first
                    .next()
                    .and_then(|v| normalize_hex(v))
                    .unwrap_or(group.seed);

                let mut measure = |theme: Theme| {
                    let reading = evaluator.reading(hex_value, backgrounds.get(theme));
                    sanitize(reading, &group.name, weight, theme, &mut diagnostics)
                };
                let contrast = ThemeContrast {
                    light: measure(Theme::Light),
                    dark: measure(Theme::Dark),
                };

                RawToken {
                    hex_value,
                    token_name: format!("{}-{weight}", group.name),
                    weight: weight.to_string(),
                    contrast,
                }
            })
            .collect();

        palette.groups.push(RawGroup {
            name: group.name.clone(),
            tokens,
        });
    }

    (palette, diagnostics)
}

fn sanitize(
    reading: ContrastReading,
    group: &str,
    weight: &str,
    theme: Theme,
    diagnostics: &mut Vec<Diagnostic>,
) -> ContrastReading {
    if reading.ratio.is_finite() && reading.ratio >= 0.0 {
        return reading;
    }
    diagnostics.push(Diagnostic::invalid_contrast(group, weight, theme, reading.ratio));
    ContrastReading {
        ratio: 0.0,
        rating: ContrastRating::Fail,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::{WcagContrast, contrast_ratio};
    use crate::interpolate::OklchInterpolator;
    use crate::series::{NumberedSeries, WeightSeriesProvider};

    fn group(name: &str, seed: &str) -> Group {
        Group {
            name: name.to_string(),
            short_name: String::new(),
            seed: HexColor::parse(seed).unwrap(),
        }
    }

    const BGS: Backgrounds = Backgrounds {
        light: HexColor::WHITE,
        dark: HexColor::BLACK,
    };

    /// Returns a fixed list, darkest-first.
    struct Fixed(Vec<&'static str>);

    impl SeedInterpolator for Fixed {
        fn interpolate(&self, _seed: HexColor, _series: &WeightSeries) -> Vec<String> {
            self.0.iter().map(|s| (*s).to_string()).collect()
        }
    }

    struct Broken;

    impl ContrastEvaluator for Broken {
        fn ratio(&self, fg: HexColor, _bg: HexColor) -> f64 {
            if fg == HexColor::BLACK { f64::NAN } else { -1.0 }
        }

        fn rating(&self, _fg: HexColor, _bg: HexColor) -> ContrastRating {
            ContrastRating::Aaa
        }
    }

    #[test]
    fn one_token_per_group_and_weight() {
        let series = NumberedSeries.series(9);
        let groups = [group("primary", "#5D10D1"), group("gray", "#87899D")];
        let (palette, diags) = build_raw_palette(&groups, &series, BGS, &OklchInterpolator, &WcagContrast);
        assert!(diags.is_empty());
        assert_eq!(palette.groups.len(), 2);
        assert_eq!(palette.len(), 18);
        assert_eq!(palette.token("gray", "3").unwrap().token_name, "gray-3");
    }

    #[test]
    fn interpolator_output_is_read_from_the_far_end() {
        let series = NumberedSeries.series(3);
        let interp = Fixed(vec!["#111111", "#777777", "#EEEEEE"]);
        let (palette, _) = build_raw_palette(&[group("g", "#777777")], &series, BGS, &interp, &WcagContrast);
        let values: Vec<String> = palette.groups[0].tokens.iter().map(|t| t.hex_value.to_string()).collect();
        assert_eq!(values, vec!["#EEEEEE", "#777777", "#111111"]);
    }

    #[test]
    fn short_interpolation_falls_back_to_seed() {
        let series = NumberedSeries.series(4);
        let interp = Fixed(vec!["#222222", "#DDDDDD"]);
        let (palette, _) = build_raw_palette(&[group("g", "#5D10D1")], &series, BGS, &interp, &WcagContrast);
        let values: Vec<String> = palette.groups[0].tokens.iter().map(|t| t.hex_value.to_string()).collect();
        assert_eq!(values, vec!["#DDDDDD", "#222222", "#5D10D1", "#5D10D1"]);
    }

    #[test]
    fn unreadable_interpolated_value_falls_back_to_seed() {
        let series = NumberedSeries.series(2);
        let interp = Fixed(vec!["garbage", "#FFFFFF"]);
        let (palette, _) = build_raw_palette(&[group("g", "#123456")], &series, BGS, &interp, &WcagContrast);
        assert_eq!(palette.groups[0].tokens[1].hex_value.to_string(), "#123456");
    }

    #[test]
    fn ratios_match_the_evaluator() {
        let series = NumberedSeries.series(11);
        let bgs = Backgrounds {
            light: HexColor::parse("#FAF7F0").unwrap(),
            dark: HexColor::parse("#101418").unwrap(),
        };
        let (palette, _) = build_raw_palette(&[group("g", "#206BB0")], &series, bgs, &OklchInterpolator, &WcagContrast);
        for token in &palette.groups[0].tokens {
            for theme in Theme::ALL {
                let expected = contrast_ratio(token.hex_value, bgs.get(theme));
                assert!((token.contrast.get(theme).ratio - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn invalid_ratios_become_critical_diagnostics() {
        let series = NumberedSeries.series(2);
        let interp = Fixed(vec!["#000000", "#FFFFFF"]);
        let (palette, diags) = build_raw_palette(&[group("g", "#777777")], &series, BGS, &interp, &Broken);
        // Two weights × two themes, every ratio unusable.
        assert_eq!(diags.len(), 4);
        for token in &palette.groups[0].tokens {
            assert_eq!(token.contrast.light.ratio, 0.0);
            assert_eq!(token.contrast.dark.rating, ContrastRating::Fail);
        }
    }

    #[test]
    fn resolve_finds_tokens_by_name() {
        let series = NumberedSeries.series(5);
        let (palette, _) =
            build_raw_palette(&[group("primary", "#5D10D1")], &series, BGS, &OklchInterpolator, &WcagContrast);
        assert!(palette.resolve("primary-4").is_some());
        assert!(palette.resolve("primary-6").is_none());
    }

    #[test]
    fn serializes_as_nested_maps_in_order() {
        let series = NumberedSeries.series(2);
        let interp = Fixed(vec!["#000000", "#FFFFFF"]);
        let (palette, _) = build_raw_palette(&[group("b", "#777777"), group("a", "#777777")], &series, BGS, &interp, &WcagContrast);
        let json = serde_json::to_string(&palette).unwrap();
        assert!(json.starts_with("{\"b\":{\"1\":{\"hexValue\":\"#FFFFFF\",\"tokenName\":\"b-1\""), "{json}");
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }
}
