//! Error types for scheme loading, token derivation and export.
//!
//! Only structurally broken input is an error. Unreadable colors, partial
//! contrast and clamping are recoverable and surface as diagnostics instead.

use std::path::PathBuf;

use thiserror::Error;

/// A scheme that cannot be loaded, edited or validated.
#[derive(Error, Debug)]
pub enum SchemeError {
    /// The scheme declares no color groups.
    #[error("scheme has no color groups")]
    NoGroups,

    /// The scheme declares no roles.
    #[error("scheme has no roles")]
    NoRoles,

    /// The weight count is zero or negative.
    #[error("weight count must be positive, got {0}")]
    InvalidWeightCount(i64),

    /// A role's gap is zero or negative.
    #[error("role '{role}' has invalid gap {gap}; gaps must be positive")]
    InvalidGap { role: String, gap: i64 },

    /// A role's minimum contrast is not a finite, non-negative number.
    #[error("role '{role}' has invalid minimum contrast {value:?}")]
    InvalidMinContrast { role: String, value: String },

    /// Two groups share a name.
    #[error("duplicate color group '{0}'")]
    DuplicateGroup(String),

    /// Two roles share a key.
    #[error("duplicate role '{0}'")]
    DuplicateRole(String),

    /// An edit addressed a group index that does not exist.
    #[error("no color group at index {0}")]
    UnknownGroup(usize),

    /// An edit addressed a role key that does not exist.
    #[error("no role named '{0}'")]
    UnknownRole(String),

    /// No builtin scheme with this name.
    #[error("unknown builtin scheme '{0}'")]
    UnknownBuiltin(String),

    /// The scheme file extension is neither `.json` nor `.toml`.
    #[error("unsupported scheme format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Reading the scheme file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse or encode failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse failure.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A derivation that could not produce a result.
#[derive(Error, Debug)]
pub enum DeriveError {
    /// The scheme itself is malformed.
    #[error(transparent)]
    Scheme(#[from] SchemeError),

    /// The weight series provider broke its length contract.
    #[error("weight series has {actual} labels, expected {expected}")]
    SeriesLength { expected: usize, actual: usize },

    /// The weight series provider produced the same label twice.
    #[error("weight series repeats label '{0}'")]
    DuplicateWeight(String),

    /// The raw palette has no full-length scale for a group.
    #[error("raw palette has no complete scale for group '{0}'")]
    MissingRawGroup(String),

    /// The scheme fingerprint could not be encoded.
    #[error("failed to fingerprint scheme: {0}")]
    Fingerprint(#[source] serde_json::Error),
}

/// A derivation result that could not be rendered.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing to the output buffer failed.
    #[error("failed to format output: {0}")]
    Format(#[from] std::fmt::Error),

    /// A CSV row could not be encoded.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV writer failed.
    #[error("failed to flush csv output: {0}")]
    Io(#[source] std::io::Error),

    /// The rendered CSV was not valid UTF-8.
    #[error("csv output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
