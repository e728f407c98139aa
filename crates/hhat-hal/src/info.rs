//! Static backend descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of execution target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Simulator,
    Emulator,
    Qpu,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Simulator => write!(f, "simulator"),
            DeviceType::Emulator => write!(f, "emulator"),
            DeviceType::Qpu => write!(f, "qpu"),
        }
    }
}

/// Computational paradigm a backend supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paradigm {
    /// Gate-based quantum computation.
    Digital,
    /// Analog (pulse/Hamiltonian) quantum computation.
    Analog,
    Classical,
}

/// Immutable description of an execution target, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name.
    pub name: String,
    /// Backend version.
    pub version: String,
    /// Maximum number of qubits.
    pub max_qubits: u32,
    /// Device type.
    pub device_type: DeviceType,
    /// Supported paradigms.
    pub paradigms: Vec<Paradigm>,
}

impl BackendInfo {
    /// Descriptor for a local digital simulator.
    pub fn simulator(name: impl Into<String>, max_qubits: u32) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            max_qubits,
            device_type: DeviceType::Simulator,
            paradigms: vec![Paradigm::Digital],
        }
    }

    pub fn supports(&self, paradigm: Paradigm) -> bool {
        self.paradigms.contains(&paradigm)
    }

    pub fn is_simulator(&self) -> bool {
        self.device_type == DeviceType::Simulator
    }
}

impl Default for BackendInfo {
    fn default() -> Self {
        Self::simulator("simulator", 20)
    }
}
