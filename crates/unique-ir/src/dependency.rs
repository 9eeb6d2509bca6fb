//! DQBF Herbrand dependency sets.

use rustc_hash::FxHashMap;

use crate::alias::Alias;

/// Per-variable Herbrand dependency sets for DQBF existentials that
/// carry an explicit `d`-line.
///
/// Existentials not present in `deps` are implicitly dependent on the
/// universals that precede them in the prefix (ordinary existentials).
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    deps: FxHashMap<Alias, Vec<Alias>>,
    /// Existentials sharing the exact same (order-sensitive) depset,
    /// keyed by that depset.
    reverse_deps: FxHashMap<Vec<Alias>, Vec<Alias>>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `variable` depends on exactly `depset`, in the order
    /// given. Overwrites any previous entry for `variable`.
    pub fn insert(&mut self, variable: Alias, depset: Vec<Alias>) {
        self.reverse_deps.entry(depset.clone()).or_default().push(variable);
        self.deps.insert(variable, depset);
    }

    #[inline]
    pub fn get(&self, variable: Alias) -> Option<&[Alias]> {
        self.deps.get(&variable).map(Vec::as_slice)
    }

    #[inline]
    pub fn contains(&self, variable: Alias) -> bool {
        self.deps.contains_key(&variable)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    /// Iterate over `(depset, variables)` pairs. Depsets with no
    /// variables never appear; empty depsets (the variable has no
    /// listed dependencies) are included and must be skipped by callers
    /// that only want "real" shared sets.
    pub fn reverse_groups(&self) -> impl Iterator<Item = (&[Alias], &[Alias])> {
        self.reverse_deps
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
