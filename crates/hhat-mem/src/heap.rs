//! Variable heap.

use rustc_hash::{FxHashMap, FxHashSet};

use hhat_types::FullName;

use crate::error::{MemError, MemResult};
use crate::variable::Variable;

/// Named storage for variables.
///
/// Names of removed variables are remembered so a later lookup reports
/// [`MemError::UseAfterFree`] instead of an unknown key.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    vars: FxHashMap<FullName, Variable>,
    freed: FxHashSet<FullName>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `var` under its own name, replacing any previous binding.
    pub fn set(&mut self, var: Variable) {
        self.freed.remove(var.name());
        self.vars.insert(var.name().clone(), var);
    }

    pub fn get(&self, name: &FullName) -> MemResult<&Variable> {
        self.vars.get(name).ok_or_else(|| self.missing(name))
    }

    pub fn get_mut(&mut self, name: &FullName) -> MemResult<&mut Variable> {
        if self.freed.contains(name) {
            return Err(MemError::UseAfterFree(name.clone()));
        }
        self.vars
            .get_mut(name)
            .ok_or_else(|| MemError::HeapInvalidKey(name.clone()))
    }

    /// Remove and return a variable.
    pub fn free(&mut self, name: &FullName) -> MemResult<Variable> {
        let var = self.vars.remove(name).ok_or_else(|| self.missing(name))?;
        self.freed.insert(name.clone());
        Ok(var)
    }

    pub fn contains(&self, name: &FullName) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn missing(&self, name: &FullName) -> MemError {
        if self.freed.contains(name) {
            MemError::UseAfterFree(name.clone())
        } else {
            MemError::HeapInvalidKey(name.clone())
        }
    }
}
