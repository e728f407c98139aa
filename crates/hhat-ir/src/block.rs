//! Instruction blocks.

use serde::{Deserialize, Serialize};

use crate::instruction::InstrIR;

/// What a block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockFlag {
    InstrBlock,
    ControlFlow,
    Closure,
    Call,
}

/// An element of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockItem {
    Instr(InstrIR),
    Block(BlockIR),
}

/// Ordered sequence of instructions and nested blocks.
///
/// Blocks are assembled with [`BlockBuilder`] and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockIR {
    flag: BlockFlag,
    items: Vec<BlockItem>,
}

impl BlockIR {
    pub fn builder(flag: BlockFlag) -> BlockBuilder {
        BlockBuilder {
            flag,
            items: Vec::new(),
        }
    }

    /// An instruction block holding `instrs` in order.
    pub fn from_instrs(instrs: impl IntoIterator<Item = InstrIR>) -> Self {
        Self {
            flag: BlockFlag::InstrBlock,
            items: instrs.into_iter().map(BlockItem::Instr).collect(),
        }
    }

    pub fn flag(&self) -> BlockFlag {
        self.flag
    }

    pub fn items(&self) -> &[BlockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every instruction, nested blocks included, in program order.
    pub fn instructions(&self) -> Vec<&InstrIR> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a InstrIR>) {
        for item in &self.items {
            match item {
                BlockItem::Instr(instr) => out.push(instr),
                BlockItem::Block(block) => block.collect_into(out),
            }
        }
    }
}

/// Builder for [`BlockIR`].
#[derive(Debug)]
pub struct BlockBuilder {
    flag: BlockFlag,
    items: Vec<BlockItem>,
}

impl BlockBuilder {
    pub fn instr(mut self, instr: InstrIR) -> Self {
        self.items.push(BlockItem::Instr(instr));
        self
    }

    pub fn block(mut self, block: BlockIR) -> Self {
        self.items.push(BlockItem::Block(block));
        self
    }

    pub fn build(self) -> BlockIR {
        BlockIR {
            flag: self.flag,
            items: self.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_order() {
        let body = BlockIR::builder(BlockFlag::Closure)
            .instr(InstrIR::call("@not", []))
            .build();
        let block = BlockIR::builder(BlockFlag::InstrBlock)
            .instr(InstrIR::call("@redim", []))
            .block(body)
            .instr(InstrIR::call("@sync", []))
            .build();

        assert_eq!(block.len(), 3);
        let names: Vec<_> = block
            .instructions()
            .iter()
            .map(|i| i.name().to_string())
            .collect();
        assert_eq!(names, vec!["@redim", "@not", "@sync"]);
    }

    #[test]
    fn test_from_instrs() {
        let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);
        assert_eq!(block.flag(), BlockFlag::InstrBlock);
        assert!(!block.is_empty());
    }
}
