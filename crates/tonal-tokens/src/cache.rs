//! Last-call memoization of derivations.
//!
//! Editing front ends re-derive on every keystroke, mostly with an
//! unchanged palette. [`DerivationCache`] keeps the single most recent
//! result keyed by a fingerprint of everything the derivation reads, and
//! hands the same [`Arc`] back while the fingerprint holds.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace};

use crate::derivation::{DerivationResult, derive_valid_with};
use crate::engine::Fanout;
use crate::error::{DeriveError, SchemeError};
use crate::scheme::{ColorScheme, Group, Role, SchemeEdit, ValidScheme};
use crate::theme::Backgrounds;
use crate::toolkit::Toolkit;

/// Canonical encoding of a validated scheme's derivation inputs: groups
/// with normalized seeds, weight count, backgrounds and roles. The scheme
/// name is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintInput<'a> {
    groups: &'a [Group],
    weight_count: usize,
    backgrounds: Backgrounds,
    roles: &'a [Role],
}

impl Fingerprint {
    /// # Errors
    ///
    /// Fails only if the scheme cannot be encoded, which a validated scheme
    /// with finite thresholds never triggers.
    pub fn of(scheme: &ValidScheme) -> Result<Self, DeriveError> {
        let input = FingerprintInput {
            groups: &scheme.groups,
            weight_count: scheme.weight_count,
            backgrounds: scheme.backgrounds,
            roles: &scheme.roles,
        };
        serde_json::to_string(&input).map(Self).map_err(DeriveError::Fingerprint)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
struct Slot {
    entry: Option<(Fingerprint, Arc<DerivationResult>)>,
    computations: usize,
}

/// Single-slot derivation cache, owned by the host.
///
/// Lookup, recomputation and store happen under one lock, so concurrent
/// callers never interleave writes to the slot. When called from a rayon
/// worker the derivation runs on that worker alone, so the thread holding
/// the lock never steals another caller's task.
#[derive(Default)]
pub struct DerivationCache {
    toolkit: Toolkit,
    slot: Mutex<Slot>,
}

impl DerivationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_toolkit(toolkit: Toolkit) -> Self {
        Self {
            toolkit,
            slot: Mutex::default(),
        }
    }

    /// Return the cached result for `scheme`, deriving it if the scheme's
    /// fingerprint differs from the last call's.
    ///
    /// # Errors
    ///
    /// Propagates validation and derivation errors. A failed derivation
    /// leaves the previous entry in place.
    pub fn get_or_compute(&self, scheme: &ColorScheme) -> Result<Arc<DerivationResult>, DeriveError> {
        let valid = scheme.validate()?;
        let fingerprint = Fingerprint::of(&valid)?;

        let mut slot = self.slot.lock();
        if let Some((cached, result)) = &slot.entry {
            if *cached == fingerprint {
                trace!(scheme = %valid.name, "derivation cache hit");
                return Ok(Arc::clone(result));
            }
        }

        let result = Arc::new(derive_valid_with(&valid, &self.toolkit, Fanout::for_current_thread())?);
        slot.computations += 1;
        slot.entry = Some((fingerprint, Arc::clone(&result)));
        debug!(scheme = %valid.name, computations = slot.computations, "derivation cache refreshed");
        Ok(result)
    }

    /// Drop the cached result; the next call recomputes.
    pub fn invalidate(&self) {
        self.slot.lock().entry = None;
    }

    /// Apply `edit` to `scheme`, invalidating first-hand when the edit
    /// touches group colors, weight count or backgrounds.
    ///
    /// # Errors
    ///
    /// Fails if the edit addresses a group or role that does not exist; the
    /// cache is left untouched in that case.
    pub fn apply_edit(&self, scheme: &mut ColorScheme, edit: SchemeEdit) -> Result<(), SchemeError> {
        let touches_palette = edit.touches_palette();
        scheme.apply(edit)?;
        if touches_palette {
            debug!(scheme = %scheme.name, "palette edit; invalidating derivation cache");
            self.invalidate();
        }
        Ok(())
    }

    /// Whether a result is currently held.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.slot.lock().entry.is_some()
    }

    /// How many derivations this cache has actually run.
    #[must_use]
    pub fn computations(&self) -> usize {
        self.slot.lock().computations
    }
}

impl std::fmt::Debug for DerivationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivationCache")
            .field("populated", &self.is_populated())
            .field("computations", &self.computations())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{ColorGroup, RoleMap, RoleSpec};

    fn scheme() -> ColorScheme {
        let mut roles = RoleMap::new();
        roles.insert("text", RoleSpec::new("Text", "tx", 4.5, 1));
        ColorScheme {
            name: "Cache".to_string(),
            groups: vec![ColorGroup::new("primary", "Pr", "#5d10d1")],
            roles,
            weight_count: 11,
            light_bg: "FFFFFF".to_string(),
            dark_bg: "000000".to_string(),
        }
    }

    #[test]
    fn unchanged_scheme_returns_same_result() {
        let cache = DerivationCache::new();
        let a = cache.get_or_compute(&scheme()).unwrap();
        let b = cache.get_or_compute(&scheme()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.computations(), 1);
    }

    #[test]
    fn equivalent_spellings_share_a_fingerprint() {
        let cache = DerivationCache::new();
        let a = cache.get_or_compute(&scheme()).unwrap();

        let mut respelled = scheme();
        respelled.groups[0].value = "5D10D1".to_string();
        respelled.light_bg = "#fff".to_string();
        respelled.name = "Renamed".to_string();
        let b = cache.get_or_compute(&respelled).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn changed_roles_recompute() {
        let cache = DerivationCache::new();
        let a = cache.get_or_compute(&scheme()).unwrap();

        let mut changed = scheme();
        changed.roles.get_mut("text").unwrap().gaps = 2;
        let b = cache.get_or_compute(&changed).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn only_the_latest_result_is_kept() {
        let cache = DerivationCache::new();
        let mut other = scheme();
        other.weight_count = 13;

        cache.get_or_compute(&scheme()).unwrap();
        cache.get_or_compute(&other).unwrap();
        cache.get_or_compute(&scheme()).unwrap();
        assert_eq!(cache.computations(), 3);
    }

    #[test]
    fn palette_edit_invalidates_even_when_value_is_unchanged() {
        let cache = DerivationCache::new();
        let mut s = scheme();
        let a = cache.get_or_compute(&s).unwrap();

        cache
            .apply_edit(&mut s, SchemeEdit::GroupSeed { index: 0, value: "#5d10d1".to_string() })
            .unwrap();
        assert!(!cache.is_populated());

        let b = cache.get_or_compute(&s).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn non_palette_edit_keeps_entry() {
        let cache = DerivationCache::new();
        let mut s = scheme();
        cache.get_or_compute(&s).unwrap();
        cache.apply_edit(&mut s, SchemeEdit::Name("Other".to_string())).unwrap();
        assert!(cache.is_populated());
    }

    #[test]
    fn failed_edit_leaves_cache_alone() {
        let cache = DerivationCache::new();
        let mut s = scheme();
        cache.get_or_compute(&s).unwrap();
        let err = cache.apply_edit(&mut s, SchemeEdit::GroupSeed { index: 7, value: "000".to_string() });
        assert!(err.is_err());
        assert!(cache.is_populated());
    }

    #[test]
    fn explicit_invalidate_forces_recompute() {
        let cache = DerivationCache::new();
        cache.get_or_compute(&scheme()).unwrap();
        cache.invalidate();
        cache.get_or_compute(&scheme()).unwrap();
        assert_eq!(cache.computations(), 2);
    }

    #[test]
    fn concurrent_callers_compute_once() {
        let cache = DerivationCache::new();
        let s = scheme();
        let results: Vec<Arc<DerivationResult>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8).map(|_| scope.spawn(|| cache.get_or_compute(&s).unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(cache.computations(), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn callers_on_the_rayon_pool_do_not_deadlock() {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        let cache = DerivationCache::new();
        let s = scheme();
        let mut other = scheme();
        other.weight_count = 13;

        let results: Vec<Arc<DerivationResult>> = pool.install(|| {
            (0..64)
                .into_par_iter()
                .map(|i| cache.get_or_compute(if i % 2 == 0 { &s } else { &other }).unwrap())
                .collect()
        });
        assert_eq!(results.len(), 64);
        assert!(cache.computations() >= 2);
        assert_eq!(results[0].summary.weights, 11);
        assert_eq!(results[1].summary.weights, 13);
    }

    #[test]
    fn invalid_scheme_is_an_error_and_keeps_entry() {
        let cache = DerivationCache::new();
        cache.get_or_compute(&scheme()).unwrap();
        let mut broken = scheme();
        broken.groups.clear();
        assert!(cache.get_or_compute(&broken).is_err());
        assert!(cache.is_populated());
    }
}
