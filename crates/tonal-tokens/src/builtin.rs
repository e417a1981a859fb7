//! Named preset schemes — ready to derive without a config file.

use crate::scheme::{ColorGroup, ColorScheme, RoleMap, RoleSpec};

/// Look up a builtin scheme by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_scheme(name: &str) -> Option<ColorScheme> {
    match name {
        "default" | "r316" => Some(r316()),
        "mono" => Some(mono()),
        _ => None,
    }
}

/// List all builtin scheme names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["r316", "mono"]
}

fn standard_roles() -> RoleMap {
    let mut roles = RoleMap::new();
    roles.insert("text", RoleSpec::new("Text", "tx", 5.0, 3));
    roles.insert("layer", RoleSpec::new("Layer", "ly", 0.0, 1));
    roles.insert("stroke", RoleSpec::new("Stroke", "st", 1.0, 1));
    roles.insert("fill", RoleSpec::new("Fill", "fi", 4.0, 2));
    roles
}

/// Nine brand and status groups over a 23-step scale.
fn r316() -> ColorScheme {
    ColorScheme {
        name: "r316".to_string(),
        groups: vec![
            ColorGroup::new("primary", "Pr", "5d10d1"),
            ColorGroup::new("secondary", "Sc", "904AAA"),
            ColorGroup::new("tertiary", "Te", "7E8088"),
            ColorGroup::new("black", "Bk", "1C2230"),
            ColorGroup::new("gray", "Gr", "87899D"),
            ColorGroup::new("success", "Su", "47B872"),
            ColorGroup::new("danger", "Dg", "ED3E3E"),
            ColorGroup::new("warning", "Wg", "F2AA30"),
            ColorGroup::new("info", "In", "206BB0"),
        ],
        roles: standard_roles(),
        weight_count: 23,
        light_bg: "FFFFFF".to_string(),
        dark_bg: "000000".to_string(),
    }
}

/// One neutral group, for quick experiments with roles.
fn mono() -> ColorScheme {
    ColorScheme {
        name: "mono".to_string(),
        groups: vec![ColorGroup::new("neutral", "Nt", "808080")],
        roles: standard_roles(),
        weight_count: 15,
        light_bg: "FAFAFA".to_string(),
        dark_bg: "121212".to_string(),
    }
}
