//! Themes and variations — the two fixed axes of the token grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use tonal_color::HexColor;

/// Light or dark presentation. Each theme checks contrast against its own
/// background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Both themes, light first.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Pick this theme's entry out of a light/dark pair.
    #[must_use]
    pub const fn pick<T: Copy>(self, light: T, dark: T) -> T {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The light and dark page backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Backgrounds {
    pub light: HexColor,
    pub dark: HexColor,
}

impl Backgrounds {
    #[must_use]
    pub const fn get(self, theme: Theme) -> HexColor {
        theme.pick(self.light, self.dark)
    }
}

/// One of the five graded outputs of a role.
///
/// Each variation sits a whole number of role gaps away from the role's
/// center weight: `weakest` two gaps below, `stronger` two gaps above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variation {
    Weakest,
    Weak,
    Base,
    Strong,
    Stronger,
}

impl Variation {
    /// All five variations, weakest first.
    pub const ALL: [Self; 5] = [Self::Weakest, Self::Weak, Self::Base, Self::Strong, Self::Stronger];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weakest => "weakest",
            Self::Weak => "weak",
            Self::Base => "base",
            Self::Strong => "strong",
            Self::Stronger => "stronger",
        }
    }

    /// Display name, e.g. `Weakest`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weakest => "Weakest",
            Self::Weak => "Weak",
            Self::Base => "Base",
            Self::Strong => "Strong",
            Self::Stronger => "Stronger",
        }
    }

    /// Short numeric code, `1` (weakest) through `5` (stronger).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Weakest => 1,
            Self::Weak => 2,
            Self::Base => 3,
            Self::Strong => 4,
            Self::Stronger => 5,
        }
    }

    /// Number of gaps between this variation and the center.
    #[must_use]
    pub const fn steps(self) -> i64 {
        match self {
            Self::Weakest => -2,
            Self::Weak => -1,
            Self::Base => 0,
            Self::Strong => 1,
            Self::Stronger => 2,
        }
    }

    /// Signed weight offset from the center for a role with this `gap`.
    #[must_use]
    pub fn offset(self, gap: usize) -> i64 {
        i64::try_from(gap).unwrap_or(i64::MAX).saturating_mul(self.steps())
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
