use crate::engine::error::KetResult;
use crate::engine::gates;
use crate::engine::kernel::grover_iterations;
use crate::engine::runtime::Runtime;
use crate::engine::state::State;
use crate::{format_amplitude, format_probability};
use core::fmt;
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    P(usize, f64),
    Rx(usize, f64),
    Ry(usize, f64),
    Rz(usize, f64),
    Cnot(usize, usize),
    Cp(usize, usize, f64),
    PhaseFlip(usize),
    Diffusion,
    Normalize,
    Measure(usize),
    Barrier,
}

impl GateOp {
    pub fn name(&self) -> &'static str {
        match self {
            GateOp::H(_) => "H",
            GateOp::X(_) => "X",
            GateOp::Y(_) => "Y",
            GateOp::Z(_) => "Z",
            GateOp::P(_, _) => "P",
            GateOp::Rx(_, _) => "Rx",
            GateOp::Ry(_, _) => "Ry",
            GateOp::Rz(_, _) => "Rz",
            GateOp::Cnot(_, _) => "CNOT",
            GateOp::Cp(_, _, _) => "CP",
            GateOp::PhaseFlip(_) => "ORACLE",
            GateOp::Diffusion => "DIFFUSION",
            GateOp::Normalize => "NORMALIZE",
            GateOp::Measure(_) => "M",
            GateOp::Barrier => "BARRIER",
        }
    }

    pub fn targets(&self) -> Vec<usize> {
        match self {
            GateOp::H(t)
            | GateOp::X(t)
            | GateOp::Y(t)
            | GateOp::Z(t)
            | GateOp::P(t, _)
            | GateOp::Rx(t, _)
            | GateOp::Ry(t, _)
            | GateOp::Rz(t, _)
            | GateOp::Measure(t) => vec![*t],
            GateOp::Cnot(c, t) | GateOp::Cp(c, t, _) => vec![*c, *t],
            GateOp::PhaseFlip(_) | GateOp::Diffusion | GateOp::Normalize | GateOp::Barrier => {
                vec![]
            }
        }
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, GateOp::Measure(_))
    }
}

/// Recorded gate history over `num_qubits` qubits. Operations are replayed
/// through the engine kernels on demand and the resulting state is cached
/// until the history changes.
#[derive(Debug)]
pub struct Circuit {
    num_qubits: usize,
    ops: Vec<GateOp>,
    computed: Option<State>,
    outcomes: Vec<(usize, u8)>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Circuit {
        Circuit {
            num_qubits,
            ops: Vec::new(),
            computed: None,
            outcomes: Vec::new(),
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_gates(&self) -> usize {
        self.ops.len()
    }

    pub fn operations(&self) -> &[GateOp] {
        &self.ops
    }

    pub fn is_computed(&self) -> bool {
        self.computed.is_some()
    }

    /// Measurement outcomes `(qubit, bit)` recorded during the last replay.
    pub fn measurements(&self) -> &[(usize, u8)] {
        &self.outcomes
    }

    fn push(&mut self, op: GateOp) -> &mut Self {
        self.ops.push(op);
        self.computed = None;
        self
    }

    pub fn h(&mut self, target: usize) -> &mut Self {
        self.push(GateOp::H(target))
    }

    pub fn x(&mut self, target: usize) -> &mut Self {
        self.push(GateOp::X(target))
    }

    pub fn y(&mut self, target: usize) -> &mut Self {
        self.push(GateOp::Y(target))
    }

    pub fn z(&mut self, target: usize) -> &mut Self {
        self.push(GateOp::Z(target))
    }

    pub fn p(&mut self, target: usize, theta: f64) -> &mut Self {
        self.push(GateOp::P(target, theta))
    }

    pub fn rx(&mut self, target: usize, theta: f64) -> &mut Self {
        self.push(GateOp::Rx(target, theta))
    }

    pub fn ry(&mut self, target: usize, theta: f64) -> &mut Self {
        self.push(GateOp::Ry(target, theta))
    }

    pub fn rz(&mut self, target: usize, theta: f64) -> &mut Self {
        self.push(GateOp::Rz(target, theta))
    }

    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(GateOp::Cnot(control, target))
    }

    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.cnot(control, target)
    }

    pub fn cp(&mut self, control: usize, target: usize, theta: f64) -> &mut Self {
        self.push(GateOp::Cp(control, target, theta))
    }

    pub fn phase_flip(&mut self, index: usize) -> &mut Self {
        self.push(GateOp::PhaseFlip(index))
    }

    pub fn diffusion(&mut self) -> &mut Self {
        self.push(GateOp::Diffusion)
    }

    pub fn normalize(&mut self) -> &mut Self {
        self.push(GateOp::Normalize)
    }

    pub fn measure(&mut self, qubit: usize) -> &mut Self {
        self.push(GateOp::Measure(qubit))
    }

    pub fn measure_all(&mut self) -> &mut Self {
        for q in 0..self.num_qubits {
            self.measure(q);
        }
        self
    }

    pub fn barrier(&mut self) -> &mut Self {
        self.push(GateOp::Barrier)
    }

    pub fn reset(&mut self) -> &mut Self {
        self.ops.clear();
        self.outcomes.clear();
        self.computed = None;
        self
    }

    /// Grover search for one marked basis state: uniform superposition, then
    /// the optimal number of oracle + diffusion rounds.
    pub fn grover_search(&mut self, marked: usize) -> &mut Self {
        for q in 0..self.num_qubits {
            self.h(q);
        }
        for _ in 0..grover_iterations(self.num_qubits) {
            self.phase_flip(marked);
            self.diffusion();
            self.normalize();
        }
        self
    }

    pub fn qft(&mut self) -> &mut Self {
        let n = self.num_qubits;
        for i in 0..n {
            self.h(i);
            for j in i + 1..n {
                let angle = PI / (1usize << (j - i)) as f64;
                self.cp(j, i, angle);
            }
        }
        self
    }

    /// Exact reverse of [`Circuit::qft`]: conjugated rotations in reverse
    /// order, so `qft` followed by `inverse_qft` is the identity.
    pub fn inverse_qft(&mut self) -> &mut Self {
        let n = self.num_qubits;
        for i in (0..n).rev() {
            for j in (i + 1..n).rev() {
                let angle = -PI / (1usize << (j - i)) as f64;
                self.cp(j, i, angle);
            }
            self.h(i);
        }
        self
    }

    /// Bernstein-Vazirani circuit over `num_qubits - 1` input qubits plus the
    /// ancilla on the highest qubit. After the final Hadamards the input
    /// register holds the hidden string.
    pub fn bernstein_vazirani(&mut self, hidden: usize) -> &mut Self {
        assert!(
            self.num_qubits >= 2,
            "Bernstein-Vazirani needs one input qubit and one ancilla"
        );
        let n = self.num_qubits - 1;
        let ancilla = n;

        self.x(ancilla).h(ancilla);
        for q in 0..n {
            self.h(q);
        }
        self.barrier();
        for q in 0..n {
            if (hidden >> q) & 1 == 1 {
                self.cnot(q, ancilla);
            }
        }
        self.barrier();
        for q in 0..n {
            self.h(q);
        }
        self
    }

    pub fn ghz(&mut self) -> &mut Self {
        assert!(self.num_qubits >= 2, "GHZ needs at least two qubits");
        self.h(0);
        for q in 0..self.num_qubits - 1 {
            self.cnot(q, q + 1);
        }
        self
    }

    /// Adjacent-pair cancellation over the recorded history: self-inverse
    /// gates (H, X, Y, Z, CNOT) applied twice in a row on the same qubits
    /// are dropped. Returns the number of removed operations. This is the
    /// only rewriting done anywhere; kernels never second-guess the history.
    pub fn optimize(&mut self) -> usize {
        let before = self.ops.len();
        let mut i = 0;
        while self.ops.len() >= 2 && i < self.ops.len() - 1 {
            let cancels = match (self.ops[i], self.ops[i + 1]) {
                (GateOp::H(a), GateOp::H(b))
                | (GateOp::X(a), GateOp::X(b))
                | (GateOp::Y(a), GateOp::Y(b))
                | (GateOp::Z(a), GateOp::Z(b)) => a == b,
                (GateOp::Cnot(c1, t1), GateOp::Cnot(c2, t2)) => c1 == c2 && t1 == t2,
                _ => false,
            };

            if cancels {
                self.ops.drain(i..i + 2);
                i = 0;
            } else {
                i += 1;
            }
        }

        let removed = before - self.ops.len();
        if removed > 0 {
            debug!(removed, remaining = self.ops.len(), "circuit optimized");
            self.computed = None;
        }
        removed
    }

    pub fn compute_with(&mut self, rt: &Runtime) -> KetResult<&State> {
        self.compute_with_rng(rt, &mut rand::rng())
    }

    pub fn compute_with_rng<R: Rng>(&mut self, rt: &Runtime, rng: &mut R) -> KetResult<&State> {
        if self.computed.is_none() {
            let (state, outcomes) = self.replay(rt, rng)?;
            self.computed = Some(state);
            self.outcomes = outcomes;
        }
        Ok(self.computed.as_ref().expect("state cached above"))
    }

    fn replay<R: Rng>(&self, rt: &Runtime, rng: &mut R) -> KetResult<(State, Vec<(usize, u8)>)> {
        let mut state = State::new(self.num_qubits)?;
        let mut outcomes = Vec::new();

        for op in &self.ops {
            match op {
                GateOp::H(t) => rt.apply_1q(&mut state, &gates::HADAMARD, *t)?,
                GateOp::X(t) => rt.apply_1q(&mut state, &gates::PAULI_X, *t)?,
                GateOp::Y(t) => rt.apply_1q(&mut state, &gates::PAULI_Y, *t)?,
                GateOp::Z(t) => rt.apply_1q(&mut state, &gates::PAULI_Z, *t)?,
                GateOp::P(t, theta) => rt.apply_1q(&mut state, &gates::p_matrix(*theta), *t)?,
                GateOp::Rx(t, theta) => rt.apply_1q(&mut state, &gates::rx_matrix(*theta), *t)?,
                GateOp::Ry(t, theta) => rt.apply_1q(&mut state, &gates::ry_matrix(*theta), *t)?,
                GateOp::Rz(t, theta) => rt.apply_1q(&mut state, &gates::rz_matrix(*theta), *t)?,
                GateOp::Cnot(c, t) => rt.apply_2q(&mut state, &gates::CNOT, *c, *t)?,
                GateOp::Cp(c, t, theta) => {
                    rt.apply_2q(&mut state, &gates::cp_matrix(*theta), *c, *t)?
                }
                GateOp::PhaseFlip(k) => rt.phase_flip(&mut state, *k)?,
                GateOp::Diffusion => rt.diffusion(&mut state)?,
                GateOp::Normalize => rt.normalize(&mut state)?,
                GateOp::Measure(q) => {
                    let outcome = rt.measure(&mut state, *q, rng)?;
                    outcomes.push((*q, outcome));
                }
                GateOp::Barrier => {}
            }
        }

        Ok((state, outcomes))
    }

    pub fn probability(&mut self, rt: &Runtime, index: usize) -> KetResult<f64> {
        Ok(self.compute_with(rt)?.probability(index))
    }

    pub fn probabilities(&mut self, rt: &Runtime) -> KetResult<Vec<f64>> {
        let state = self.compute_with(rt)?;
        Ok((0..state.size()).map(|i| state.probability(i)).collect())
    }

    pub fn most_likely_state(&mut self, rt: &Runtime) -> KetResult<usize> {
        let state = self.compute_with(rt)?;
        let mut best = 0;
        let mut best_prob = 0.0;
        for i in 0..state.size() {
            let p = state.probability(i);
            if p > best_prob {
                best_prob = p;
                best = i;
            }
        }
        Ok(best)
    }

    pub fn print_probabilities(&mut self, rt: &Runtime) -> KetResult<()> {
        let probabilities = self.probabilities(rt)?;
        println!("Probabilities:");
        for (i, p) in probabilities.iter().enumerate() {
            if *p > 1e-10 {
                println!(
                    "  |{:0width$b}>: {}",
                    i,
                    format_probability(*p),
                    width = self.num_qubits
                );
            }
        }
        Ok(())
    }

    /// Samples the computed distribution `shots` times; returns per-basis
    /// counts. The state itself is not collapsed.
    pub fn run_shots<R: Rng>(
        &mut self,
        rt: &Runtime,
        shots: usize,
        rng: &mut R,
    ) -> KetResult<Vec<u32>> {
        let probabilities = self.probabilities(rt)?;
        let mut counts = vec![0u32; probabilities.len()];

        for _ in 0..shots {
            let draw = rng.random::<f64>();
            let mut cumulative = 0.0;
            for (i, p) in probabilities.iter().enumerate() {
                cumulative += p;
                if draw < cumulative {
                    counts[i] += 1;
                    break;
                }
            }
        }
        Ok(counts)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit ({} qubits, {} operations)",
            self.num_qubits,
            self.ops.len()
        )?;
        for (i, op) in self.ops.iter().enumerate() {
            match op {
                GateOp::P(t, theta) | GateOp::Rx(t, theta) | GateOp::Ry(t, theta)
                | GateOp::Rz(t, theta) => {
                    writeln!(f, "  {}: {}({:.4}) on q{}", i, op.name(), theta, t)?
                }
                GateOp::Cp(c, t, theta) => {
                    writeln!(f, "  {}: CP({:.4}) on q{}, q{}", i, theta, c, t)?
                }
                GateOp::PhaseFlip(k) => writeln!(f, "  {}: ORACLE |{}>", i, k)?,
                GateOp::Diffusion | GateOp::Normalize | GateOp::Barrier => {
                    writeln!(f, "  {}: {}", i, op.name())?
                }
                _ => writeln!(f, "  {}: {} on {:?}", i, op.name(), op.targets())?,
            }
        }

        if let Some(state) = &self.computed {
            writeln!(f, "State:")?;
            for i in 0..state.size() {
                let amp = state.amplitudes()[i];
                if amp.re.abs() > 1e-10 || amp.im.abs() > 1e-10 {
                    writeln!(
                        f,
                        "  |{:0width$b}>: {}",
                        i,
                        format_amplitude(&amp),
                        width = self.num_qubits
                    )?;
                }
            }
        } else {
            writeln!(f, "State: (not computed)")?;
        }
        Ok(())
    }
}
