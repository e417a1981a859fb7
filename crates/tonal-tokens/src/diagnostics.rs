//! Diagnostics — every compromise a derivation made, as data.
//!
//! A derivation never fails because a contrast target is out of reach. It
//! picks the best weight it can and records why here, so callers decide
//! whether a warning blocks a release or just shows up in a report.

use serde::Serialize;
use tracing::{debug, warn};

use crate::theme::{Theme, Variation};

/// How bad a compromise is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The role's contrast target cannot be met at all.
    Critical,
    /// The target was met with a fallback, or a variation was clamped.
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// No weight reaches the role's minimum contrast; the midpoint was used.
    Unsatisfiable,
    /// Some weights reach the minimum but none with a full neighborhood.
    PartialMatch,
    /// A variation's offset fell off the scale and was pulled back.
    ClampedVariation,
    /// The contrast evaluator returned a negative or non-finite ratio.
    InvalidContrast,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Unsatisfiable | Self::InvalidContrast => Severity::Critical,
            Self::PartialMatch | Self::ClampedVariation => Severity::Warning,
        }
    }
}

/// One recorded compromise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<Variation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, group: &str, theme: Theme, message: String) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            group: group.to_string(),
            role: None,
            theme,
            variation: None,
            weight: None,
            message,
        }
    }

    #[must_use]
    pub fn unsatisfiable(group: &str, role: &str, theme: Theme) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::new(
                DiagnosticKind::Unsatisfiable,
                group,
                theme,
                "cannot meet minimum contrast for this role at any weight".to_string(),
            )
        }
    }

    #[must_use]
    pub fn partial_match(group: &str, role: &str, theme: Theme) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::new(
                DiagnosticKind::PartialMatch,
                group,
                theme,
                "minimum contrast met only partially; used best-available fallback".to_string(),
            )
        }
    }

    #[must_use]
    pub fn clamped(group: &str, role: &str, theme: Theme, variation: Variation) -> Self {
        Self {
            role: Some(role.to_string()),
            variation: Some(variation),
            ..Self::new(
                DiagnosticKind::ClampedVariation,
                group,
                theme,
                format!("variation '{variation}' clamped due to overflow"),
            )
        }
    }

    #[must_use]
    pub fn invalid_contrast(group: &str, weight: &str, theme: Theme, ratio: f64) -> Self {
        Self {
            weight: Some(weight.to_string()),
            ..Self::new(
                DiagnosticKind::InvalidContrast,
                group,
                theme,
                format!("contrast ratio {ratio} against the {theme} background is unusable; treated as 0"),
            )
        }
    }
}

/// All diagnostics of one derivation, split by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub critical: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            critical: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a diagnostic under its severity and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let role = diagnostic.role.as_deref().unwrap_or("-");
        match diagnostic.severity {
            Severity::Critical => {
                warn!(group = %diagnostic.group, role, theme = %diagnostic.theme, "{}", diagnostic.message);
                self.critical.push(diagnostic);
            }
            Severity::Warning => {
                debug!(group = %diagnostic.group, role, theme = %diagnostic.theme, "{}", diagnostic.message);
                self.warnings.push(diagnostic);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.critical.len() + self.warnings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.warnings.is_empty()
    }

    /// Move every diagnostic of `other` to the end of this set. Already
    /// logged when first pushed, so nothing is logged again.
    pub fn merge(&mut self, mut other: Self) {
        self.critical.append(&mut other.critical);
        self.warnings.append(&mut other.warnings);
    }

    /// Critical diagnostics first, then warnings.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.critical.iter().chain(&self.warnings)
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for d in iter {
            self.push(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_routes_by_severity() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::unsatisfiable("primary", "text", Theme::Light));
        diags.push(Diagnostic::partial_match("primary", "fill", Theme::Dark));
        diags.push(Diagnostic::clamped("gray", "stroke", Theme::Dark, Variation::Stronger));
        assert_eq!(diags.critical.len(), 1);
        assert_eq!(diags.warnings.len(), 2);
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.iter().next().unwrap().kind, DiagnosticKind::Unsatisfiable);
    }

    #[test]
    fn clamped_message_names_variation() {
        let d = Diagnostic::clamped("gray", "stroke", Theme::Dark, Variation::Weakest);
        assert_eq!(d.message, "variation 'weakest' clamped due to overflow");
        assert_eq!(d.variation, Some(Variation::Weakest));
        assert_eq!(d.severity, Severity::Warning);
    }

    #[test]
    fn invalid_contrast_is_critical_without_role() {
        let d = Diagnostic::invalid_contrast("primary", "07", Theme::Light, f64::NAN);
        assert_eq!(d.severity, Severity::Critical);
        assert_eq!(d.role, None);
        assert_eq!(d.weight.as_deref(), Some("07"));
    }

    #[test]
    fn serializes_without_empty_fields() {
        let d = Diagnostic::partial_match("primary", "text", Theme::Light);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "partialMatch");
        assert_eq!(json["role"], "text");
        assert!(json.get("variation").is_none());
        assert!(json.get("weight").is_none());
    }
}
