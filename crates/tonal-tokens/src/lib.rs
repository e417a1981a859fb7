//! # tonal-tokens — Contrast-Checked Design Token Derivation
//!
//! Turns a small declarative color scheme (seed colors, semantic roles with
//! minimum contrast and spacing, two backgrounds) into a complete token
//! set: every group × role × variation resolved to a concrete weight of the
//! group's tonal scale, for both light and dark themes.
//!
//! # Architecture
//!
//! ```text
//! ColorScheme (JSON / TOML / builtin)
//!     │
//!     ▼
//! scheme.rs:      validate, canonicalize colors, parse thresholds
//!     │
//!     ▼
//! raw.rs:         interpolate each seed into a scale, tag contrast
//!     │
//!     ▼
//! engine.rs:      pick a center per (theme, group, role), place variations
//!     │
//!     ▼
//! derivation.rs:  DerivationResult { raw palette, tokens, diagnostics }
//!     │
//!     ├──▶ cache.rs:   last-call memoization keyed by fingerprint
//!     └──▶ export.rs:  CSS variables, CSV, JSON
//! ```
//!
//! # Collaborators
//!
//! Weight labels, seed interpolation and contrast measurement are traits
//! ([`WeightSeriesProvider`], [`SeedInterpolator`], [`ContrastEvaluator`])
//! bundled in a [`Toolkit`]. The defaults number weights, ramp through
//! OKLCH and measure WCAG 2.1 contrast.

pub mod builtin;
pub mod cache;
pub mod contrast;
pub mod derivation;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod export;
pub mod interpolate;
pub mod raw;
pub mod scheme;
pub mod series;
pub mod theme;
pub mod toolkit;

pub use builtin::{builtin_names, builtin_scheme};
pub use cache::{DerivationCache, Fingerprint};
pub use contrast::{ContrastEvaluator, ContrastRating, ContrastReading, WcagContrast};
pub use derivation::{DerivationResult, Summary, derive, derive_valid, derive_valid_with, derive_with};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use engine::{DerivedToken, Fanout, TokensByTheme, derive_tokens, derive_tokens_with};
pub use error::{DeriveError, ExportError, SchemeError};
pub use interpolate::{OklchInterpolator, SeedInterpolator};
pub use raw::{RawPalette, RawToken, build_raw_palette};
pub use scheme::{ColorGroup, ColorScheme, MinContrast, RoleMap, RoleSpec, SchemeEdit, ValidScheme};
pub use series::{NumberedSeries, WeightSeries, WeightSeriesProvider};
pub use theme::{Backgrounds, Theme, Variation};
pub use toolkit::Toolkit;
