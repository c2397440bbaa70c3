#![deny(missing_docs)]

//! # Partial-Failure Aggregator
//!
//! Combines many independent keyed results into either every success or
//! every failure. All entries are evaluated; nothing short-circuits, so a
//! request with three bad parameters reports all three.

use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use std::ops::Deref;

/// The failed entries of an aggregation, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureMap<K: Hash + Eq, E>(IndexMap<K, E>);

impl<K: Hash + Eq, E> FailureMap<K, E> {
    /// Consumes the map, returning the underlying entries.
    pub fn into_inner(self) -> IndexMap<K, E> {
        self.0
    }
}

impl<K: Hash + Eq, E> Deref for FailureMap<K, E> {
    type Target = IndexMap<K, E>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Hash + Eq, E> IntoIterator for FailureMap<K, E> {
    type Item = (K, E);
    type IntoIter = indexmap::map::IntoIter<K, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Hash + Eq + fmt::Display, E: fmt::Display> fmt::Display for FailureMap<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {error}")?;
        }
        Ok(())
    }
}

impl<K, E> std::error::Error for FailureMap<K, E>
where
    K: Hash + Eq + fmt::Display + fmt::Debug,
    E: fmt::Display + fmt::Debug,
{
}

/// Outcome of an aggregation.
pub type Aggregated<K, T, E> = Result<IndexMap<K, T>, FailureMap<K, E>>;

/// Drains `results` and splits them into successes and failures.
///
/// Returns `Ok` with every value only if no entry failed, otherwise `Err` with
/// exactly the failed entries.
pub fn aggregate<K, T, E>(
    results: impl IntoIterator<Item = (K, Result<T, E>)>,
) -> Aggregated<K, T, E>
where
    K: Hash + Eq,
{
    let mut successes = IndexMap::new();
    let mut failures = IndexMap::new();
    for (key, result) in results {
        match result {
            Ok(value) => {
                successes.insert(key, value);
            }
            Err(error) => {
                failures.insert(key, error);
            }
        }
    }
    if failures.is_empty() {
        Ok(successes)
    } else {
        Err(FailureMap(failures))
    }
}

/// Runs `f` over every keyed input and aggregates the results.
pub fn aggregate_with<K, I, T, E, F>(
    inputs: impl IntoIterator<Item = (K, I)>,
    mut f: F,
) -> Aggregated<K, T, E>
where
    K: Hash + Eq,
    F: FnMut(&K, I) -> Result<T, E>,
{
    aggregate(inputs.into_iter().map(|(key, input)| {
        let result = f(&key, input);
        (key, result)
    }))
}
