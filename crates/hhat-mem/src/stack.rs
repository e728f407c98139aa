//! Bounded LIFO stack.

use crate::error::{MemError, MemResult};

/// Bounded stack used by the evaluator for intermediate values.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Stack<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) -> MemResult<()> {
        if self.items.len() >= self.capacity {
            return Err(MemError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> MemResult<T> {
        self.items.pop().ok_or(MemError::StackEmpty)
    }

    pub fn peek(&self) -> MemResult<&T> {
        self.items.last().ok_or(MemError::StackEmpty)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
