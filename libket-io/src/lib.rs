//! Circuit-description loader: a small TOML document naming the qubit count
//! and a gate list becomes a ready-to-run [`Circuit`].
//!
//! ```toml
//! qubits = 2
//! shots = 1024
//!
//! [[gates]]
//! name = "h"
//! targets = [0]
//!
//! [[gates]]
//! name = "cnot"
//! targets = [0, 1]
//! ```

use libket_core::Circuit;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read circuit file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse circuit document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("circuit needs at least one qubit")]
    NoQubits,

    #[error("gate {index}: unknown gate '{name}'")]
    UnknownGate { index: usize, name: String },

    #[error("gate {index} ({name}): expected {expected} target(s), got {got}")]
    WrongArity {
        index: usize,
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("gate {index} ({name}): missing required angle parameter")]
    MissingParam { index: usize, name: String },

    #[error("gate {index} ({name}): qubit {qubit} out of range for {num_qubits} qubits")]
    QubitOutOfRange {
        index: usize,
        name: String,
        qubit: usize,
        num_qubits: usize,
    },

    #[error("gate {index} ({name}): basis state {state} out of range for {num_qubits} qubits")]
    BasisOutOfRange {
        index: usize,
        name: String,
        state: usize,
        num_qubits: usize,
    },
}

#[derive(Debug, Deserialize)]
pub struct CircuitDocument {
    pub qubits: usize,
    #[serde(default)]
    pub shots: Option<usize>,
    #[serde(default)]
    pub gates: Vec<GateRecord>,
}

#[derive(Debug, Deserialize)]
pub struct GateRecord {
    pub name: String,
    #[serde(default)]
    pub targets: Vec<usize>,
    #[serde(default)]
    pub param: Option<f64>,
}

impl CircuitDocument {
    pub fn parse(text: &str) -> Result<CircuitDocument, LoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Validates the document and records every gate into a fresh circuit.
    pub fn build(&self) -> Result<Circuit, LoadError> {
        if self.qubits == 0 {
            return Err(LoadError::NoQubits);
        }

        let mut circuit = Circuit::new(self.qubits);

        for (index, record) in self.gates.iter().enumerate() {
            self.apply_record(&mut circuit, index, record)?;
        }
        Ok(circuit)
    }

    fn apply_record(
        &self,
        circuit: &mut Circuit,
        index: usize,
        record: &GateRecord,
    ) -> Result<(), LoadError> {
        let name = record.name.to_ascii_lowercase();

        let arity = |expected: usize| -> Result<(), LoadError> {
            if record.targets.len() != expected {
                return Err(LoadError::WrongArity {
                    index,
                    name: record.name.clone(),
                    expected,
                    got: record.targets.len(),
                });
            }
            for &qubit in &record.targets {
                if qubit >= self.qubits {
                    return Err(LoadError::QubitOutOfRange {
                        index,
                        name: record.name.clone(),
                        qubit,
                        num_qubits: self.qubits,
                    });
                }
            }
            Ok(())
        };

        let angle = || -> Result<f64, LoadError> {
            record.param.ok_or_else(|| LoadError::MissingParam {
                index,
                name: record.name.clone(),
            })
        };

        match name.as_str() {
            "h" => {
                arity(1)?;
                circuit.h(record.targets[0]);
            }
            "x" => {
                arity(1)?;
                circuit.x(record.targets[0]);
            }
            "y" => {
                arity(1)?;
                circuit.y(record.targets[0]);
            }
            "z" => {
                arity(1)?;
                circuit.z(record.targets[0]);
            }
            "p" | "phase" => {
                arity(1)?;
                let theta = angle()?;
                circuit.p(record.targets[0], theta);
            }
            "rx" => {
                arity(1)?;
                let theta = angle()?;
                circuit.rx(record.targets[0], theta);
            }
            "ry" => {
                arity(1)?;
                let theta = angle()?;
                circuit.ry(record.targets[0], theta);
            }
            "rz" => {
                arity(1)?;
                let theta = angle()?;
                circuit.rz(record.targets[0], theta);
            }
            "cnot" | "cx" => {
                arity(2)?;
                circuit.cnot(record.targets[0], record.targets[1]);
            }
            "cp" | "cphase" => {
                arity(2)?;
                let theta = angle()?;
                circuit.cp(record.targets[0], record.targets[1], theta);
            }
            // The oracle target is a basis-state index, not a qubit, so it
            // skips the per-qubit bounds check.
            "oracle" | "phase_flip" => {
                let state = match (record.targets.as_slice(), record.param) {
                    ([state], _) => *state,
                    ([], Some(p)) => p as usize,
                    _ => {
                        return Err(LoadError::WrongArity {
                            index,
                            name: record.name.clone(),
                            expected: 1,
                            got: record.targets.len(),
                        })
                    }
                };
                if state >= 1 << self.qubits {
                    return Err(LoadError::BasisOutOfRange {
                        index,
                        name: record.name.clone(),
                        state,
                        num_qubits: self.qubits,
                    });
                }
                circuit.phase_flip(state);
            }
            "diffusion" => {
                circuit.diffusion();
            }
            "normalize" => {
                circuit.normalize();
            }
            "measure" | "m" => {
                arity(1)?;
                circuit.measure(record.targets[0]);
            }
            "barrier" => {
                circuit.barrier();
            }
            _ => {
                return Err(LoadError::UnknownGate {
                    index,
                    name: record.name.clone(),
                });
            }
        }
        Ok(())
    }
}

pub fn load_str(text: &str) -> Result<Circuit, LoadError> {
    CircuitDocument::parse(text)?.build()
}

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Circuit, LoadError> {
    let text = std::fs::read_to_string(path)?;
    load_str(&text)
}
