//! Quantum index allocation.
//!
//! An [`IndexManager`] owns a bounded pool of `max_num_index` integer handles
//! ("qubit slots"). Indices move between three disjoint collections:
//!
//! ```text
//!   available ──request(var, n)──→ allocated + in_use_by[var]
//!       ↑                                     │
//!       └──────────────free(var)──────────────┘
//! ```
//!
//! **Invariants:**
//! - `|available| + |allocated| == max_num_index` at all times.
//! - `allocated` is exactly the union of every `in_use_by` list.
//! - No index belongs to two variables.
//! - A failed `request` leaves all three collections untouched.
//!
//! **Allocation order** is FIFO: requests take from the front of `available`
//! and freed indices are appended to its back, in the order they were granted.
//! A fresh manager therefore hands out `0, 1, 2, ...`, and a fixed sequence of
//! calls always yields the same indices.

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use tracing::debug;

use hhat_types::FullName;

use crate::error::{MemError, MemResult};

/// Allocator for quantum indices.
///
/// The manager provides no internal synchronization; each instance belongs
/// to one scope.
#[derive(Debug, Clone)]
pub struct IndexManager {
    max_num_index: usize,
    available: VecDeque<usize>,
    allocated: Vec<usize>,
    in_use_by: FxHashMap<FullName, Vec<usize>>,
    reserved: FxHashMap<FullName, usize>,
}

impl IndexManager {
    /// Create a pool holding indices `0..max_num_index`.
    pub fn new(max_num_index: usize) -> Self {
        Self {
            max_num_index,
            available: (0..max_num_index).collect(),
            allocated: Vec::new(),
            in_use_by: FxHashMap::default(),
            reserved: FxHashMap::default(),
        }
    }

    pub fn max_number(&self) -> usize {
        self.max_num_index
    }

    /// Free indices, front first.
    pub fn available(&self) -> &VecDeque<usize> {
        &self.available
    }

    /// Granted indices in grant order.
    pub fn allocated(&self) -> &[usize] {
        &self.allocated
    }

    pub fn num_available(&self) -> usize {
        self.available.len()
    }

    pub fn num_allocated(&self) -> usize {
        self.allocated.len()
    }

    /// Indices held by `var`, in the order they were granted.
    pub fn indexes_of(&self, var: &FullName) -> Option<&[usize]> {
        self.in_use_by.get(var).map(Vec::as_slice)
    }

    /// Whether `var` currently holds indices.
    pub fn has_indexes(&self, var: &FullName) -> bool {
        self.in_use_by.contains_key(var)
    }

    /// Variables currently holding indices.
    pub fn holders(&self) -> impl Iterator<Item = (&FullName, &[usize])> {
        self.in_use_by.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Grant `num_idxs` indices to `var`.
    pub fn request(&mut self, var: &FullName, num_idxs: usize) -> MemResult<Vec<usize>> {
        if num_idxs == 0 {
            return Err(MemError::IndexEmptyRequest(var.clone()));
        }
        if self.in_use_by.contains_key(var) {
            return Err(MemError::IndexVarHasIndexes(var.clone()));
        }
        if num_idxs > self.available.len() {
            return Err(MemError::IndexAllocation {
                var: var.clone(),
                requested: num_idxs,
                available: self.available.len(),
            });
        }

        let idxs: Vec<usize> = self.available.drain(..num_idxs).collect();
        self.allocated.extend_from_slice(&idxs);
        self.in_use_by.insert(var.clone(), idxs.clone());
        debug!("Allocated {:?} to '{}'", idxs, var);
        Ok(idxs)
    }

    /// Record that `var` will need `num_idxs` indices, without granting them.
    ///
    /// Reservations are checked against the free count at the time of the
    /// call and granted later by [`IndexManager::request_reserved`].
    pub fn reserve(&mut self, var: &FullName, num_idxs: usize) -> MemResult<()> {
        if num_idxs == 0 {
            return Err(MemError::IndexEmptyRequest(var.clone()));
        }
        if self.reserved.contains_key(var) || self.in_use_by.contains_key(var) {
            return Err(MemError::IndexVarHasIndexes(var.clone()));
        }
        if num_idxs > self.available.len() {
            return Err(MemError::IndexAllocation {
                var: var.clone(),
                requested: num_idxs,
                available: self.available.len(),
            });
        }
        self.reserved.insert(var.clone(), num_idxs);
        Ok(())
    }

    /// Grant the indices previously reserved for `var`.
    pub fn request_reserved(&mut self, var: &FullName) -> MemResult<Vec<usize>> {
        let num_idxs = *self
            .reserved
            .get(var)
            .ok_or_else(|| MemError::IndexInvalidVar(var.clone()))?;
        let idxs = self.request(var, num_idxs)?;
        self.reserved.remove(var);
        Ok(idxs)
    }

    /// Return every index held by `var` to the pool.
    pub fn free(&mut self, var: &FullName) -> MemResult<Vec<usize>> {
        let idxs = self
            .in_use_by
            .remove(var)
            .ok_or_else(|| MemError::IndexInvalidVar(var.clone()))?;
        self.allocated.retain(|i| !idxs.contains(i));
        self.available.extend(idxs.iter().copied());
        self.reserved.remove(var);
        debug!("Freed {:?} from '{}'", idxs, var);
        Ok(idxs)
    }

    /// Check the pool invariants.
    pub fn is_consistent(&self) -> bool {
        if self.available.len() + self.allocated.len() != self.max_num_index {
            return false;
        }

        let mut seen = vec![false; self.max_num_index];
        for &i in self.available.iter().chain(self.allocated.iter()) {
            if i >= self.max_num_index || seen[i] {
                return false;
            }
            seen[i] = true;
        }

        let mut held: Vec<usize> = self.in_use_by.values().flatten().copied().collect();
        let mut allocated = self.allocated.clone();
        held.sort_unstable();
        allocated.sort_unstable();
        held == allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> FullName {
        FullName::local(name)
    }

    #[test]
    fn test_fifo_allocation() {
        let mut idx = IndexManager::new(5);
        assert_eq!(idx.request(&var("@a"), 2).unwrap(), vec![0, 1]);
        assert_eq!(idx.request(&var("@b"), 2).unwrap(), vec![2, 3]);
        assert_eq!(idx.free(&var("@a")).unwrap(), vec![0, 1]);
        assert_eq!(idx.request(&var("@c"), 3).unwrap(), vec![4, 0, 1]);
        assert!(idx.is_consistent());
    }

    #[test]
    fn test_allocation_failure_is_non_mutating() {
        let mut idx = IndexManager::new(3);
        idx.request(&var("@a"), 2).unwrap();
        let before = idx.clone();

        let err = idx.request(&var("@b"), 2).unwrap_err();
        assert_eq!(
            err,
            MemError::IndexAllocation {
                var: var("@b"),
                requested: 2,
                available: 1
            }
        );
        assert_eq!(idx.available(), before.available());
        assert_eq!(idx.allocated(), before.allocated());
        assert!(!idx.has_indexes(&var("@b")));
    }

    #[test]
    fn test_double_request() {
        let mut idx = IndexManager::new(4);
        idx.request(&var("@a"), 1).unwrap();
        assert_eq!(
            idx.request(&var("@a"), 1),
            Err(MemError::IndexVarHasIndexes(var("@a")))
        );
    }

    #[test]
    fn test_free_unknown() {
        let mut idx = IndexManager::new(2);
        assert_eq!(
            idx.free(&var("@ghost")),
            Err(MemError::IndexInvalidVar(var("@ghost")))
        );
    }

    #[test]
    fn test_zero_request() {
        let mut idx = IndexManager::new(2);
        assert!(matches!(
            idx.request(&var("@a"), 0),
            Err(MemError::IndexEmptyRequest(_))
        ));
    }

    #[test]
    fn test_reservation() {
        let mut idx = IndexManager::new(4);
        idx.reserve(&var("@a"), 3).unwrap();
        assert_eq!(idx.num_allocated(), 0);
        assert!(idx.reserve(&var("@a"), 1).is_err());
        assert_eq!(idx.request_reserved(&var("@a")).unwrap(), vec![0, 1, 2]);
        assert_eq!(
            idx.request_reserved(&var("@b")),
            Err(MemError::IndexInvalidVar(var("@b")))
        );
    }
}
