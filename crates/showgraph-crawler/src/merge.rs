//! Identity-keyed merging of observations.
//!
//! A single page can mention the same show or writer more than once. Merging
//! collapses those mentions to one observation per identity, keeping the
//! first-seen order of identities.

use showgraph_core::{ShowObservation, WriterCredit};
use std::collections::HashMap;
use std::hash::Hash;

/// An observation that can absorb later observations of the same entity.
pub trait Observation {
    /// Identity two observations must share to be merged.
    type Key: Eq + Hash + Clone;

    /// Identity of this observation.
    fn key(&self) -> Self::Key;

    /// Fold a later observation of the same entity into this one.
    fn absorb(&mut self, later: Self);
}

impl Observation for ShowObservation {
    type Key = showgraph_core::ShowId;

    fn key(&self) -> Self::Key {
        self.id.clone()
    }

    fn absorb(&mut self, later: Self) {
        if self.title.is_empty() {
            self.title = later.title;
        }
        if self.year_start.is_none() {
            self.year_start = later.year_start;
        }
        if self.year_end.is_none() {
            self.year_end = later.year_end;
        }
    }
}

impl Observation for WriterCredit {
    type Key = showgraph_core::WriterId;

    fn key(&self) -> Self::Key {
        self.writer.id.clone()
    }

    fn absorb(&mut self, later: Self) {
        if self.writer.name.is_empty() {
            self.writer.name = later.writer.name;
        }
        if self.credit.role.is_none() {
            self.credit.role = later.credit.role;
        }
        self.credit.episode_count = match (self.credit.episode_count, later.credit.episode_count) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }
}

/// Merge observations sharing an identity, preserving first-seen order.
pub fn merge<T, I>(observations: I) -> Vec<T>
where
    T: Observation,
    I: IntoIterator<Item = T>,
{
    let mut positions: HashMap<T::Key, usize> = HashMap::new();
    let mut merged: Vec<T> = Vec::new();

    for observation in observations {
        let key = observation.key();
        match positions.get(&key) {
            Some(&idx) => merged[idx].absorb(observation),
            None => {
                positions.insert(key, merged.len());
                merged.push(observation);
            }
        }
    }

    merged
}
