//! Function table.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use hhat_types::{FullName, TypeTable};

use crate::block::BlockIR;
use crate::error::{IrError, IrResult};

/// A typed function argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FnArg {
    pub name: String,
    pub type_name: FullName,
}

impl FnArg {
    pub fn new(name: impl Into<String>, type_name: impl Into<FullName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Function signature. Overloads differ by return type or argument types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FnHeader {
    pub name: FullName,
    pub ret_type: FullName,
    pub args: Vec<FnArg>,
}

impl FnHeader {
    pub fn new(name: impl Into<FullName>, ret_type: impl Into<FullName>, args: Vec<FnArg>) -> Self {
        Self {
            name: name.into(),
            ret_type: ret_type.into(),
            args,
        }
    }
}

impl fmt::Display for FnHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<_> = self
            .args
            .iter()
            .map(|a| format!("{}:{}", a.name, a.type_name))
            .collect();
        write!(f, "{}({}) {}", self.name, args.join(" "), self.ret_type)
    }
}

/// Function bodies keyed by header, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FnTable {
    fns: FxHashMap<FnHeader, BlockIR>,
    order: Vec<FnHeader>,
}

impl FnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function body.
    pub fn add(&mut self, header: FnHeader, body: BlockIR) -> IrResult<()> {
        if self.fns.contains_key(&header) {
            return Err(IrError::FunctionAlreadyDefined(header.to_string()));
        }
        debug!("Registering function '{}'", header);
        self.order.push(header.clone());
        self.fns.insert(header, body);
        Ok(())
    }

    pub fn get(&self, header: &FnHeader) -> Option<&BlockIR> {
        self.fns.get(header)
    }

    /// All overloads sharing `name`.
    pub fn overloads<'a>(&'a self, name: &'a FullName) -> impl Iterator<Item = &'a FnHeader> + 'a {
        self.order.iter().filter(move |h| &h.name == name)
    }

    pub fn headers(&self) -> impl Iterator<Item = &FnHeader> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check that every signature refers to registered types.
    pub fn validate(&self, types: &TypeTable) -> IrResult<()> {
        for header in &self.order {
            let referenced =
                std::iter::once(&header.ret_type).chain(header.args.iter().map(|a| &a.type_name));
            for type_name in referenced {
                if !types.contains(type_name) {
                    return Err(IrError::UnknownFnType {
                        function: header.name.clone(),
                        type_name: type_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
