//! Byte-exact program output.

use hhat_ir::{BlockFlag, BlockIR, CoreLiteral, InstrIR};
use hhat_mem::IndexManager;
use hhat_qlang::{LowLevelQLang, NoFallback, OpenQasm2, QLangError};
use hhat_types::FullName;

fn lower(block: &BlockIR, num_idxs: usize) -> String {
    let var = FullName::local("@v");
    let mut idx = IndexManager::new(5);
    idx.request(&var, num_idxs).unwrap();
    OpenQasm2::new(var, &idx, &NoFallback)
        .unwrap()
        .gen_program(block)
        .unwrap()
}

#[test]
fn test_single_redim() {
    let block = BlockIR::from_instrs([InstrIR::call("@redim", [])]);
    assert_eq!(
        lower(&block, 1),
        "OPENQASM 2.0;\n\
         include \"qelib1.inc\";\n\
         qreg q[1];\n\
         creg c[1];\n\
         h q[0];\n\
         measure q -> c;\n"
    );
}

#[test]
fn test_bell_pair() {
    let block = BlockIR::from_instrs([InstrIR::call("@redim", []), InstrIR::call("@sync", [])]);
    // @redim acts on every slot, so the "bell" here is H on both then CX
    assert_eq!(
        lower(&block, 2),
        "OPENQASM 2.0;\n\
         include \"qelib1.inc\";\n\
         qreg q[2];\n\
         creg c[2];\n\
         h q[0];\n\
         h q[1];\n\
         cx q[0], q[1];\n\
         measure q -> c;\n"
    );
}

#[test]
fn test_literal_then_nested_block() {
    let inner = BlockIR::from_instrs([InstrIR::call("@not", [])]);
    let block = BlockIR::builder(BlockFlag::InstrBlock)
        .instr(InstrIR::call("@redim", [CoreLiteral::quantum(1, "@u2").into()]))
        .block(inner)
        .build();

    assert_eq!(
        lower(&block, 2),
        "OPENQASM 2.0;\n\
         include \"qelib1.inc\";\n\
         qreg q[2];\n\
         creg c[2];\n\
         x q[0];\n\
         h q[0];\n\
         h q[1];\n\
         x q[0];\n\
         x q[1];\n\
         measure q -> c;\n"
    );
}

#[test]
fn test_empty_block() {
    assert_eq!(
        lower(&BlockIR::from_instrs([]), 3),
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[3];\ncreg c[3];\nmeasure q -> c;\n"
    );
}

#[test]
fn test_non_instruction_blocks_rejected() {
    let var = FullName::local("@v");
    let mut idx = IndexManager::new(5);
    idx.request(&var, 2).unwrap();
    let qlang = OpenQasm2::new(var, &idx, &NoFallback).unwrap();

    for flag in [BlockFlag::ControlFlow, BlockFlag::Closure, BlockFlag::Call] {
        let inner = BlockIR::builder(flag)
            .instr(InstrIR::call("@not", []))
            .build();
        let nested = BlockIR::builder(BlockFlag::InstrBlock)
            .instr(InstrIR::call("@redim", []))
            .block(inner.clone())
            .build();

        assert_eq!(
            qlang.gen_program(&nested),
            Err(QLangError::UnsupportedBlock(flag))
        );
        assert_eq!(
            qlang.gen_program(&inner),
            Err(QLangError::UnsupportedBlock(flag))
        );
    }
}
