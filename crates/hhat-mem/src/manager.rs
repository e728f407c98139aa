//! Memory manager bundling stack, heap and index pool.

use tracing::{debug, instrument};

use hhat_ir::Literal;
use hhat_types::{FullName, TypeTable};

use crate::error::MemResult;
use crate::heap::Heap;
use crate::index::IndexManager;
use crate::stack::Stack;
use crate::variable::Variable;

/// Default number of stack entries.
pub const DEFAULT_STACK_CAPACITY: usize = 1024;

/// Per-scope memory: a value stack, a variable heap and a quantum index pool.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    stack: Stack<Literal>,
    heap: Heap,
    idx: IndexManager,
}

impl MemoryManager {
    pub fn new(max_num_index: usize) -> Self {
        Self::with_stack_capacity(max_num_index, DEFAULT_STACK_CAPACITY)
    }

    pub fn with_stack_capacity(max_num_index: usize, stack_capacity: usize) -> Self {
        Self {
            stack: Stack::new(stack_capacity),
            heap: Heap::new(),
            idx: IndexManager::new(max_num_index),
        }
    }

    pub fn stack(&self) -> &Stack<Literal> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack<Literal> {
        &mut self.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn idx(&self) -> &IndexManager {
        &self.idx
    }

    pub fn idx_mut(&mut self) -> &mut IndexManager {
        &mut self.idx
    }

    /// Store a variable on the heap. Quantum variables are granted as many
    /// indices as their type's resolved maximum qsize (or minimum, when the
    /// maximum is undefined) before they are stored.
    #[instrument(skip(self, var, types), fields(var = %var.name()))]
    pub fn declare(&mut self, var: Variable, types: &mut TypeTable) -> MemResult<Vec<usize>> {
        let mut idxs = Vec::new();
        if var.is_quantum() {
            let qsize = types.resolve_qsize(var.type_name())?;
            let needed = qsize.max().unwrap_or(qsize.min()) as usize;
            idxs = self.idx.request(var.name(), needed)?;
        }
        debug!("Declared '{}' with indexes {:?}", var.name(), idxs);
        self.heap.set(var);
        Ok(idxs)
    }

    /// Drop a variable and return its indices to the pool.
    pub fn free(&mut self, name: &FullName) -> MemResult<Vec<usize>> {
        let var = self.heap.free(name)?;
        if var.is_quantum() && self.idx.has_indexes(name) {
            return self.idx.free(name);
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MemError;
    use crate::variable::VariableKind;
    use hhat_types::{DataType, DataTypeKind, Member};

    #[test]
    fn test_declare_quantum_struct() {
        let mut types = TypeTable::with_builtins();
        types
            .add(
                DataType::new("@pair", DataTypeKind::Struct)
                    .with_member(Member::typed("@a", "@bool"))
                    .unwrap()
                    .with_member(Member::typed("@b", "@u2"))
                    .unwrap(),
            )
            .unwrap();
        let ty = types.get(&FullName::local("@pair")).unwrap().clone();

        let mut mem = MemoryManager::new(4);
        let var = Variable::new("@p", &ty, VariableKind::Mutable).unwrap();
        assert_eq!(mem.declare(var, &mut types).unwrap(), vec![0, 1, 2]);
        assert_eq!(mem.idx().num_available(), 1);

        assert_eq!(mem.free(&FullName::local("@p")).unwrap(), vec![0, 1, 2]);
        assert!(mem.idx().is_consistent());
        assert!(matches!(
            mem.heap().get(&FullName::local("@p")),
            Err(MemError::UseAfterFree(_))
        ));
    }

    #[test]
    fn test_declare_fails_without_storing() {
        let mut types = TypeTable::with_builtins();
        let ty = types.get(&FullName::local("@u4")).unwrap().clone();
        let mut mem = MemoryManager::new(2);
        let var = Variable::new("@q", &ty, VariableKind::Mutable).unwrap();

        assert!(matches!(
            mem.declare(var, &mut types),
            Err(MemError::IndexAllocation {
                requested: 4,
                available: 2,
                ..
            })
        ));
        assert!(!mem.heap().contains(&FullName::local("@q")));
    }

    #[test]
    fn test_classical_variable_uses_no_indexes() {
        let mut types = TypeTable::with_builtins();
        let ty = types.get(&FullName::local("u8")).unwrap().clone();
        let mut mem = MemoryManager::new(2);
        let var = Variable::new("x", &ty, VariableKind::Constant).unwrap();
        assert!(mem.declare(var, &mut types).unwrap().is_empty());
        assert_eq!(mem.free(&FullName::local("x")).unwrap(), Vec::<usize>::new());
    }
}
