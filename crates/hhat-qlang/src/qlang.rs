//! Target-independent lowering contract.

use hhat_ir::{BlockFlag, BlockIR, BlockItem, InstrIR};

use crate::error::{QLangError, QLangResult};

/// A low-level quantum language that one quantum variable's block is
/// lowered into.
///
/// Implementations read the variable's allocation once, at construction,
/// so every call sees the same register layout.
pub trait LowLevelQLang {
    /// Header and register declarations.
    fn init_program(&self) -> Vec<String>;

    /// Statements for one instruction, including its argument preparation.
    fn gen_instr(&self, instr: &InstrIR) -> QLangResult<Vec<String>>;

    /// Closing measurement.
    fn end_program(&self) -> Vec<String>;

    /// Append the statements of a plain instruction block, inlining nested
    /// instruction blocks in order. Control flow, closures and calls have no
    /// straight-line form and are rejected.
    fn gen_block(&self, block: &BlockIR, code: &mut String) -> QLangResult<()> {
        if block.flag() != BlockFlag::InstrBlock {
            return Err(QLangError::UnsupportedBlock(block.flag()));
        }
        for item in block.items() {
            match item {
                BlockItem::Instr(instr) => {
                    for line in self.gen_instr(instr)? {
                        code.push_str(&line);
                        code.push('\n');
                    }
                }
                BlockItem::Block(inner) => self.gen_block(inner, code)?,
            }
        }
        Ok(())
    }

    /// The whole program, one statement per line with a trailing newline.
    ///
    /// Output depends only on the block and the allocation the lowering was
    /// built from.
    fn gen_program(&self, block: &BlockIR) -> QLangResult<String> {
        let mut code = String::new();
        for line in self.init_program() {
            code.push_str(&line);
            code.push('\n');
        }
        self.gen_block(block, &mut code)?;
        for line in self.end_program() {
            code.push_str(&line);
            code.push('\n');
        }
        Ok(code)
    }
}
