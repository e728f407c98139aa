//! The type table.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::builtin;
use crate::datatype::DataType;
use crate::error::{TypeError, TypeResult};
use crate::name::FullName;
use crate::resolve;
use crate::size::{QSize, Size};

/// `FullName`-keyed registry of data types, kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: FxHashMap<FullName, DataType>,
    order: Vec<FullName>,
}

impl TypeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with the builtin types.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for ty in builtin::builtin_types() {
            // builtin names are distinct
            let name = ty.name().clone();
            table.order.push(name.clone());
            table.types.insert(name, ty);
        }
        table
    }

    /// Register a type. Redefinition is an error.
    pub fn add(&mut self, ty: DataType) -> TypeResult<()> {
        if self.types.contains_key(ty.name()) {
            return Err(TypeError::TypeAlreadyDefined(ty.name().clone()));
        }
        debug!("Registering type '{}' ({})", ty.name(), ty.kind());
        self.order.push(ty.name().clone());
        self.types.insert(ty.name().clone(), ty);
        Ok(())
    }

    pub fn get(&self, name: &FullName) -> Option<&DataType> {
        self.types.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &FullName) -> Option<&mut DataType> {
        self.types.get_mut(name)
    }

    pub fn contains(&self, name: &FullName) -> bool {
        self.types.contains_key(name)
    }

    /// Types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &DataType> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check the whole table for definition cycles.
    ///
    /// Members naming unknown types are skipped here; resolution reports
    /// them as [`TypeError::UnknownType`].
    pub fn detect_cycles(&self) -> TypeResult<()> {
        let mut done = FxHashSet::default();
        for name in &self.order {
            let mut path = Vec::new();
            self.visit(name, &mut path, &mut done)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &FullName,
        path: &mut Vec<FullName>,
        done: &mut FxHashSet<FullName>,
    ) -> TypeResult<()> {
        if done.contains(name) {
            return Ok(());
        }
        if let Some(pos) = path.iter().position(|n| n == name) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(name.clone());
            return Err(TypeError::DefinitionCycle { path: cycle });
        }
        let Some(ty) = self.types.get(name) else {
            return Ok(());
        };

        path.push(name.clone());
        for member in ty.members() {
            if let Some(member_type) = member.member_type() {
                self.visit(member_type, path, done)?;
            }
        }
        path.pop();
        done.insert(name.clone());
        Ok(())
    }

    /// Resolve (and memoize) the quantum size of `name`.
    pub fn resolve_qsize(&mut self, name: &FullName) -> TypeResult<QSize> {
        resolve::resolve_qsize(name, self)
    }

    /// Resolve (and memoize) the classical size of `name`.
    pub fn resolve_size(&mut self, name: &FullName) -> TypeResult<Size> {
        resolve::resolve_size(name, self)
    }

    /// Validate the table and pre-compute every size and qsize.
    ///
    /// Types that legitimately have no classical width (those holding `str`)
    /// keep an unset [`Size`].
    pub fn resolve_all(&mut self) -> TypeResult<()> {
        self.detect_cycles()?;
        let names = self.order.clone();
        for name in &names {
            self.resolve_qsize(name)?;
            match self.resolve_size(name) {
                Ok(_) | Err(TypeError::UnsizedType(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
