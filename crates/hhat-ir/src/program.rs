//! Whole-program IR.

use hhat_types::TypeTable;

use crate::block::BlockIR;
use crate::error::IrResult;
use crate::function::FnTable;

/// The IR handed over by the front end: types, functions and the main block.
#[derive(Debug, Clone)]
pub struct Ir {
    types: TypeTable,
    fns: FnTable,
    main: BlockIR,
}

impl Ir {
    pub fn new(types: TypeTable, fns: FnTable, main: BlockIR) -> Self {
        Self { types, fns, main }
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Mutable access for size resolution, which memoizes into the table.
    pub fn types_mut(&mut self) -> &mut TypeTable {
        &mut self.types
    }

    pub fn fns(&self) -> &FnTable {
        &self.fns
    }

    pub fn main(&self) -> &BlockIR {
        &self.main
    }

    /// Reject type cycles and dangling function signatures, then resolve
    /// every type size.
    pub fn validate(&mut self) -> IrResult<()> {
        self.types.resolve_all()?;
        self.fns.validate(&self.types)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;
    use crate::instruction::InstrIR;
    use hhat_types::{DataType, DataTypeKind, Member, TypeError};

    #[test]
    fn test_validate_rejects_cycles() {
        let mut types = TypeTable::with_builtins();
        types
            .add(
                DataType::new("loop", DataTypeKind::Single)
                    .with_member(Member::single("loop"))
                    .unwrap(),
            )
            .unwrap();
        let mut ir = Ir::new(types, FnTable::new(), BlockIR::from_instrs([]));

        assert!(matches!(
            ir.validate(),
            Err(IrError::Type(TypeError::DefinitionCycle { .. }))
        ));
    }

    #[test]
    fn test_validate_ok() {
        let main = BlockIR::from_instrs([InstrIR::call("@redim", [])]);
        let mut ir = Ir::new(TypeTable::with_builtins(), FnTable::new(), main);
        ir.validate().unwrap();
        assert_eq!(ir.main().instructions().len(), 1);
    }
}
