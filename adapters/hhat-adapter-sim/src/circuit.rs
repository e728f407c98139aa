//! Flattened circuit representation produced by the parser.

use crate::error::{SimError, SimResult};

/// Gates understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    Id,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    U1(f64),
    U2(f64, f64),
    U3(f64, f64, f64),
    CX,
    CZ,
    Swap,
    CCX,
}

impl Gate {
    /// Build a gate from its `qelib1.inc` name and evaluated parameters.
    pub fn from_name(name: &str, params: &[f64]) -> SimResult<Self> {
        let expected = match name {
            "id" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" => 0,
            "cx" | "CX" | "cz" | "swap" | "ccx" => 0,
            "rx" | "ry" | "rz" | "u1" => 1,
            "u2" => 2,
            "u3" | "u" | "U" => 3,
            other => return Err(SimError::UnknownGate(other.to_string())),
        };
        if params.len() != expected {
            return Err(SimError::WrongParameterCount {
                gate: name.to_string(),
                expected,
                got: params.len(),
            });
        }

        let gate = match name {
            "id" => Gate::Id,
            "x" => Gate::X,
            "y" => Gate::Y,
            "z" => Gate::Z,
            "h" => Gate::H,
            "s" => Gate::S,
            "sdg" => Gate::Sdg,
            "t" => Gate::T,
            "tdg" => Gate::Tdg,
            "rx" => Gate::Rx(params[0]),
            "ry" => Gate::Ry(params[0]),
            "rz" => Gate::Rz(params[0]),
            "u1" => Gate::U1(params[0]),
            "u2" => Gate::U2(params[0], params[1]),
            "u3" | "u" | "U" => Gate::U3(params[0], params[1], params[2]),
            "cx" | "CX" => Gate::CX,
            "cz" => Gate::CZ,
            "swap" => Gate::Swap,
            "ccx" => Gate::CCX,
            other => return Err(SimError::UnknownGate(other.to_string())),
        };
        Ok(gate)
    }

    pub fn num_qubits(&self) -> usize {
        match self {
            Gate::CX | Gate::CZ | Gate::Swap => 2,
            Gate::CCX => 3,
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gate::Id => "id",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::U1(_) => "u1",
            Gate::U2(..) => "u2",
            Gate::U3(..) => "u3",
            Gate::CX => "cx",
            Gate::CZ => "cz",
            Gate::Swap => "swap",
            Gate::CCX => "ccx",
        }
    }
}

/// One operation on absolute qubit/clbit positions.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Gate { gate: Gate, qubits: Vec<usize> },
    Reset(usize),
    Barrier,
    Measure { qubit: usize, clbit: usize },
}

/// A parsed program with all registers flattened into one qubit and one
/// clbit index space, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub ops: Vec<Op>,
}

impl Circuit {
    /// `(qubit, clbit)` pairs in program order.
    pub fn measurements(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            Op::Measure { qubit, clbit } => Some((*qubit, *clbit)),
            _ => None,
        })
    }

    pub fn gate_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Gate { .. }))
            .count()
    }
}
