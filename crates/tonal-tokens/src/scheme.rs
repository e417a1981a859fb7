//! Color schemes — the declarative input to token derivation.
//!
//! A [`ColorScheme`] is what users write and edit: seed colors, roles and
//! backgrounds, stored exactly as typed (hex strings may lack `#`, minimum
//! contrast may be a string). [`ColorScheme::validate`] turns it into a
//! [`ValidScheme`] once, with every color canonicalized and every role
//! threshold parsed, so the derivation engine never re-parses anything.
//!
//! The file format mirrors the JSON the tool has always exported:
//!
//! ```json
//! {
//!   "name": "Brand",
//!   "clrGroups": [{ "name": "primary", "shortName": "Pr", "value": "5d10d1" }],
//!   "roles": { "text": { "name": "Text", "shortName": "tx", "minContrast": "5", "gaps": 3 } },
//!   "weightCount": 23,
//!   "lightBg": "FFFFFF",
//!   "darkBg": "000000"
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tonal_color::{HexColor, normalize_hex};
use tracing::warn;

use crate::error::SchemeError;
use crate::theme::Backgrounds;

// ---------------------------------------------------------------------------
// Raw (editable) scheme
// ---------------------------------------------------------------------------

/// A user-facing color scheme, as loaded from or saved to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScheme {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "clrGroups", default)]
    pub groups: Vec<ColorGroup>,
    #[serde(default)]
    pub roles: RoleMap,
    pub weight_count: i64,
    #[serde(default = "default_light_bg")]
    pub light_bg: String,
    #[serde(default = "default_dark_bg")]
    pub dark_bg: String,
}

fn default_light_bg() -> String {
    "FFFFFF".to_string()
}

fn default_dark_bg() -> String {
    "000000".to_string()
}

/// A named seed color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorGroup {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    /// Seed color as typed; normalized during validation.
    pub value: String,
}

impl ColorGroup {
    #[must_use]
    pub fn new(name: &str, short_name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A role as written in a scheme file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSpec {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    pub min_contrast: MinContrast,
    /// Weight distance between neighboring variations.
    pub gaps: i64,
}

impl RoleSpec {
    #[must_use]
    pub fn new(name: &str, short_name: &str, min_contrast: f64, gaps: i64) -> Self {
        Self {
            name: name.to_string(),
            short_name: short_name.to_string(),
            min_contrast: MinContrast::Number(min_contrast),
            gaps,
        }
    }
}

/// A minimum contrast threshold, written either as a number or as a
/// numeric string (`"4.5"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinContrast {
    Number(f64),
    Text(String),
}

impl MinContrast {
    /// The threshold, if it is a finite, non-negative number.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (v.is_finite() && v >= 0.0).then_some(v)
    }
}

impl fmt::Display for MinContrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// RoleMap — insertion-ordered role table
// ---------------------------------------------------------------------------

/// Roles keyed by their identifier, in declaration order.
///
/// Serialized as a JSON/TOML map. Order matters: it is the order roles
/// appear in every derived output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleMap(Vec<(String, RoleSpec)>);

impl RoleMap {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a role, keeping the original position on replace.
    pub fn insert(&mut self, key: &str, spec: RoleSpec) {
        match self.get_mut(key) {
            Some(slot) => *slot = spec,
            None => self.0.push((key.to_string(), spec)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RoleSpec> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut RoleSpec> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleSpec)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RoleSpec)> for RoleMap {
    fn from_iter<I: IntoIterator<Item = (String, RoleSpec)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(&k, v);
        }
        map
    }
}

impl Serialize for RoleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RoleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleMapVisitor;

        impl<'de> Visitor<'de> for RoleMapVisitor {
            type Value = RoleMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of role key to role")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RoleMap, A::Error> {
                // Duplicates are kept so validation can report them.
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, spec)) = access.next_entry::<String, RoleSpec>()? {
                    entries.push((key, spec));
                }
                Ok(RoleMap(entries))
            }
        }

        deserializer.deserialize_map(RoleMapVisitor)
    }
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

impl ColorScheme {
    /// Parse a scheme from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Json`] if the text is not a scheme.
    pub fn from_json_str(text: &str) -> Result<Self, SchemeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a scheme from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Toml`] if the text is not a scheme.
    pub fn from_toml_str(text: &str) -> Result<Self, SchemeError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a scheme file, choosing the parser by extension.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, unknown extensions and parse errors.
    pub fn load(path: &Path) -> Result<Self, SchemeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Self, SchemeError> = match ext.as_deref() {
            Some("json") => Self::from_json_str,
            Some("toml") => Self::from_toml_str,
            _ => return Err(SchemeError::UnsupportedFormat(path.to_path_buf())),
        };

        let text = std::fs::read_to_string(path).map_err(|source| SchemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&text)
    }

    /// Pretty-printed JSON, the format the tool exports configs in.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Json`] if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, SchemeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Validated scheme
// ---------------------------------------------------------------------------

/// A seed color with its canonical hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub short_name: String,
    pub seed: HexColor,
}

/// A semantic role with a parsed threshold and a positive gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub key: String,
    pub name: String,
    pub short_name: String,
    pub min_contrast: f64,
    pub gap: usize,
}

impl Role {
    /// Distance from the center to the outermost variation.
    #[must_use]
    pub const fn max_offset(&self) -> usize {
        self.gap.saturating_mul(2)
    }
}

/// A scheme that passed validation. Immutable input to one derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidScheme {
    pub name: String,
    pub groups: Vec<Group>,
    pub roles: Vec<Role>,
    pub weight_count: usize,
    pub backgrounds: Backgrounds,
}

impl ColorScheme {
    /// Check structure and canonicalize colors.
    ///
    /// Unreadable colors fall back (seeds and the dark background to black,
    /// the light background to white) with a logged warning.
    ///
    /// # Errors
    ///
    /// Fails when the scheme has no groups or roles, a non-positive weight
    /// count or gap, an unparseable threshold, or duplicate names.
    pub fn validate(&self) -> Result<ValidScheme, SchemeError> {
        if self.groups.is_empty() {
            return Err(SchemeError::NoGroups);
        }
        if self.roles.is_empty() {
            return Err(SchemeError::NoRoles);
        }
        let weight_count = usize::try_from(self.weight_count)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(SchemeError::InvalidWeightCount(self.weight_count))?;

        let mut seen = HashSet::new();
        let mut groups = Vec::with_capacity(self.groups.len());
        for g in &self.groups {
            if !seen.insert(g.name.as_str()) {
                return Err(SchemeError::DuplicateGroup(g.name.clone()));
            }
            groups.push(Group {
                name: g.name.clone(),
                short_name: g.short_name.clone(),
                seed: resolve_color(&g.value, HexColor::BLACK, &g.name),
            });
        }

        let mut seen = HashSet::new();
        let mut roles = Vec::with_capacity(self.roles.len());
        for (key, spec) in self.roles.iter() {
            if !seen.insert(key) {
                return Err(SchemeError::DuplicateRole(key.to_string()));
            }
            let gap = usize::try_from(spec.gaps)
                .ok()
                .filter(|g| *g > 0)
                .ok_or_else(|| SchemeError::InvalidGap { role: key.to_string(), gap: spec.gaps })?;
            let min_contrast = spec.min_contrast.value().ok_or_else(|| SchemeError::InvalidMinContrast {
                role: key.to_string(),
                value: spec.min_contrast.to_string(),
            })?;
            roles.push(Role {
                key: key.to_string(),
                name: spec.name.clone(),
                short_name: spec.short_name.clone(),
                min_contrast,
                gap,
            });
        }

        Ok(ValidScheme {
            name: self.name.clone(),
            groups,
            roles,
            weight_count,
            backgrounds: Backgrounds {
                light: resolve_color(&self.light_bg, HexColor::WHITE, "light background"),
                dark: resolve_color(&self.dark_bg, HexColor::BLACK, "dark background"),
            },
        })
    }
}

fn resolve_color(raw: &str, fallback: HexColor, what: &str) -> HexColor {
    normalize_hex(raw).unwrap_or_else(|| {
        warn!(input = raw, %fallback, "unreadable color for {what}; using fallback");
        fallback
    })
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A single edit to a scheme, as issued by an editing front end.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemeEdit {
    Name(String),
    GroupName { index: usize, name: String },
    GroupShortName { index: usize, short_name: String },
    GroupSeed { index: usize, value: String },
    RoleMinContrast { role: String, value: f64 },
    RoleGap { role: String, gap: i64 },
    WeightCount(i64),
    LightBackground(String),
    DarkBackground(String),
}

impl SchemeEdit {
    /// Whether the edit changes the raw palette inputs: group colors,
    /// weight count or backgrounds. Caches must drop their result for these.
    #[must_use]
    pub const fn touches_palette(&self) -> bool {
        matches!(
            self,
            Self::GroupName { .. }
                | Self::GroupShortName { .. }
                | Self::GroupSeed { .. }
                | Self::WeightCount(_)
                | Self::LightBackground(_)
                | Self::DarkBackground(_)
        )
    }
}

impl ColorScheme {
    /// Apply one edit in place.
    ///
    /// # Errors
    ///
    /// Fails if the edit addresses a group index or role key that does not
    /// exist. Values themselves are checked later by [`Self::validate`].
    pub fn apply(&mut self, edit: SchemeEdit) -> Result<(), SchemeError> {
        match edit {
            SchemeEdit::Name(name) => self.name = name,
            SchemeEdit::GroupName { index, name } => self.group_mut(index)?.name = name,
            SchemeEdit::GroupShortName { index, short_name } => {
                self.group_mut(index)?.short_name = short_name;
            }
            SchemeEdit::GroupSeed { index, value } => self.group_mut(index)?.value = value,
            SchemeEdit::RoleMinContrast { role, value } => {
                self.role_mut(&role)?.min_contrast = MinContrast::Number(value);
            }
            SchemeEdit::RoleGap { role, gap } => self.role_mut(&role)?.gaps = gap,
            SchemeEdit::WeightCount(n) => self.weight_count = n,
            SchemeEdit::LightBackground(v) => self.light_bg = v,
            SchemeEdit::DarkBackground(v) => self.dark_bg = v,
        }
        Ok(())
    }

    fn group_mut(&mut self, index: usize) -> Result<&mut ColorGroup, SchemeError> {
        self.groups.get_mut(index).ok_or(SchemeError::UnknownGroup(index))
    }

    fn role_mut(&mut self, key: &str) -> Result<&mut RoleSpec, SchemeError> {
        self.roles.get_mut(key).ok_or_else(|| SchemeError::UnknownRole(key.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_JSON: &str = r##"{
        "name": "Sample",
        "clrGroups": [
            { "name": "primary", "shortName": "Pr", "value": "5d10d1" },
            { "name": "gray", "shortName": "Gr", "value": "#87899D" }
        ],
        "roles": {
            "text": { "name": "Text", "shortName": "tx", "minContrast": "5", "gaps": 3 },
            "layer": { "name": "Layer", "shortName": "ly", "minContrast": 0, "gaps": 1 },
            "fill": { "name": "Fill", "shortName": "fi", "minContrast": 4.5, "gaps": 2 }
        },
        "variations": { "base": { "name": "Base", "code": "3" } },
        "weightCount": 23,
        "lightBg": "FFFFFF",
        "darkBg": "000000",
        "weightNames": ""
    }"##;

    fn sample() -> ColorScheme {
        ColorScheme::from_json_str(SAMPLE_JSON).unwrap()
    }

    #[test]
    fn parses_exported_json_shape() {
        let scheme = sample();
        assert_eq!(scheme.name, "Sample");
        assert_eq!(scheme.groups.len(), 2);
        assert_eq!(scheme.groups[0], ColorGroup::new("primary", "Pr", "5d10d1"));
        assert_eq!(scheme.weight_count, 23);
    }

    #[test]
    fn roles_keep_declaration_order() {
        let scheme = sample();
        let keys: Vec<&str> = scheme.roles.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["text", "layer", "fill"]);
    }

    #[test]
    fn string_thresholds_parse_once() {
        let valid = sample().validate().unwrap();
        let thresholds: Vec<f64> = valid.roles.iter().map(|r| r.min_contrast).collect();
        assert_eq!(thresholds, vec![5.0, 0.0, 4.5]);
    }

    #[test]
    fn validation_canonicalizes_colors() {
        let valid = sample().validate().unwrap();
        assert_eq!(valid.groups[0].seed.to_string(), "#5D10D1");
        assert_eq!(valid.groups[1].seed.to_string(), "#87899D");
        assert_eq!(valid.backgrounds.light, HexColor::WHITE);
        assert_eq!(valid.backgrounds.dark, HexColor::BLACK);
    }

    #[test]
    fn invalid_colors_fall_back() {
        let mut scheme = sample();
        scheme.groups[0].value = "not-a-color".to_string();
        scheme.light_bg = "zzz".to_string();
        scheme.dark_bg = String::new();
        let valid = scheme.validate().unwrap();
        assert_eq!(valid.groups[0].seed, HexColor::BLACK);
        assert_eq!(valid.backgrounds.light, HexColor::WHITE);
        assert_eq!(valid.backgrounds.dark, HexColor::BLACK);
    }

    #[test]
    fn missing_groups_is_fatal() {
        let mut scheme = sample();
        scheme.groups.clear();
        assert!(matches!(scheme.validate(), Err(SchemeError::NoGroups)));
    }

    #[test]
    fn missing_roles_is_fatal() {
        let mut scheme = sample();
        scheme.roles = RoleMap::new();
        assert!(matches!(scheme.validate(), Err(SchemeError::NoRoles)));
    }

    #[test]
    fn non_positive_weight_count_is_fatal() {
        for n in [0, -4] {
            let mut scheme = sample();
            scheme.weight_count = n;
            assert!(matches!(scheme.validate(), Err(SchemeError::InvalidWeightCount(v)) if v == n));
        }
    }

    #[test]
    fn non_positive_gap_is_fatal() {
        let mut scheme = sample();
        scheme.roles.get_mut("fill").unwrap().gaps = 0;
        assert!(matches!(
            scheme.validate(),
            Err(SchemeError::InvalidGap { role, gap: 0 }) if role == "fill"
        ));
    }

    #[test]
    fn bad_threshold_is_fatal() {
        for bad in [MinContrast::Text("lots".into()), MinContrast::Number(-1.0), MinContrast::Number(f64::NAN)] {
            let mut scheme = sample();
            scheme.roles.get_mut("text").unwrap().min_contrast = bad;
            assert!(matches!(
                scheme.validate(),
                Err(SchemeError::InvalidMinContrast { role, .. }) if role == "text"
            ));
        }
    }

    #[test]
    fn duplicate_names_are_fatal() {
        let mut scheme = sample();
        scheme.groups.push(ColorGroup::new("primary", "P2", "000"));
        assert!(matches!(scheme.validate(), Err(SchemeError::DuplicateGroup(n)) if n == "primary"));

        let dup = r#"{ "clrGroups": [{ "name": "a", "value": "000" }],
            "roles": { "x": { "name": "X", "minContrast": 1, "gaps": 1 },
                       "x": { "name": "X", "minContrast": 2, "gaps": 1 } },
            "weightCount": 9 }"#;
        let scheme = ColorScheme::from_json_str(dup).unwrap();
        assert!(matches!(scheme.validate(), Err(SchemeError::DuplicateRole(k)) if k == "x"));
    }

    #[test]
    fn toml_scheme_parses() {
        let text = r##"
            name = "Toml"
            weightCount = 11
            lightBg = "#FAFAFA"

            [[clrGroups]]
            name = "accent"
            shortName = "Ac"
            value = "206BB0"

            [roles.text]
            name = "Text"
            shortName = "tx"
            minContrast = 4.5
            gaps = 1
        "##;
        let scheme = ColorScheme::from_toml_str(text).unwrap();
        let valid = scheme.validate().unwrap();
        assert_eq!(valid.weight_count, 11);
        assert_eq!(valid.backgrounds.light.to_string(), "#FAFAFA");
        assert_eq!(valid.backgrounds.dark, HexColor::BLACK);
        assert_eq!(valid.roles[0].gap, 1);
    }

    #[test]
    fn json_export_roundtrips() {
        let scheme = sample();
        let text = scheme.to_json_pretty().unwrap();
        assert_eq!(ColorScheme::from_json_str(&text).unwrap(), scheme);
    }

    #[test]
    fn load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("scheme.json");
        std::fs::write(&json, SAMPLE_JSON).unwrap();
        assert_eq!(ColorScheme::load(&json).unwrap().name, "Sample");

        let yaml = dir.path().join("scheme.yaml");
        std::fs::write(&yaml, "name: nope").unwrap();
        assert!(matches!(ColorScheme::load(&yaml), Err(SchemeError::UnsupportedFormat(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(ColorScheme::load(&missing), Err(SchemeError::Io { .. })));
    }

    #[test]
    fn edits_apply_in_place() {
        let mut scheme = sample();
        scheme.apply(SchemeEdit::GroupSeed { index: 1, value: "#123456".into() }).unwrap();
        scheme.apply(SchemeEdit::RoleGap { role: "text".into(), gap: 2 }).unwrap();
        scheme.apply(SchemeEdit::WeightCount(15)).unwrap();
        assert_eq!(scheme.groups[1].value, "#123456");
        assert_eq!(scheme.roles.get("text").unwrap().gaps, 2);
        assert_eq!(scheme.weight_count, 15);
    }

    #[test]
    fn edits_reject_unknown_targets() {
        let mut scheme = sample();
        let err = scheme.apply(SchemeEdit::GroupName { index: 9, name: "x".into() });
        assert!(matches!(err, Err(SchemeError::UnknownGroup(9))));
        let err = scheme.apply(SchemeEdit::RoleMinContrast { role: "halo".into(), value: 3.0 });
        assert!(matches!(err, Err(SchemeError::UnknownRole(r)) if r == "halo"));
    }

    #[test]
    fn palette_edits_are_flagged() {
        assert!(SchemeEdit::WeightCount(9).touches_palette());
        assert!(SchemeEdit::DarkBackground("111".into()).touches_palette());
        assert!(SchemeEdit::GroupSeed { index: 0, value: "000".into() }.touches_palette());
        assert!(!SchemeEdit::Name("x".into()).touches_palette());
        assert!(!SchemeEdit::RoleGap { role: "text".into(), gap: 1 }.touches_palette());
    }
}
