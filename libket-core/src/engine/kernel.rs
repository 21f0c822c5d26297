use crate::engine::error::{KetError, KetResult};
use crate::engine::runtime::{Runtime, SendPtr, SharedPtr};
use crate::engine::state::State;
use crate::maths::simd;
use crate::vector_ops;
use crate::{complex, Complex, Matrix};
use rand::Rng;
use std::f64::consts::FRAC_PI_4;
use tracing::warn;

const NORM_EPSILON: f64 = 1e-12;

/// Optimal Grover round count: `floor((pi/4) * sqrt(2^n))`.
pub fn grover_iterations(num_qubits: usize) -> usize {
    let n = (1u64 << num_qubits) as f64;
    (FRAC_PI_4 * n.sqrt()).floor() as usize
}

/// Extracts the 2x2 block a controlled kernel applies when the control bit is
/// set: either the matrix itself (2x2) or the lower-right block of a full
/// 4x4 controlled gate.
fn controlled_block(gate: &Matrix<Complex<f64>>) -> KetResult<[Complex<f64>; 4]> {
    match (gate.rows, gate.cols) {
        (2, 2) => Ok([
            gate.get(0, 0),
            gate.get(0, 1),
            gate.get(1, 0),
            gate.get(1, 1),
        ]),
        (4, 4) => Ok([
            gate.get(2, 2),
            gate.get(2, 3),
            gate.get(3, 2),
            gate.get(3, 3),
        ]),
        (rows, cols) => Err(KetError::InvalidArgument(format!(
            "2-qubit kernel needs a 2x2 block or 4x4 matrix, got {}x{}",
            rows, cols
        ))),
    }
}

impl Runtime {
    /// Applies a 2x2 gate to `target`, visiting every amplitude pair
    /// `(i, i | 2^target)` exactly once. Reads `primary`, writes `scratch`,
    /// commits by swapping.
    pub fn apply_1q(
        &self,
        state: &mut State,
        gate: &Matrix<Complex<f64>>,
        target: usize,
    ) -> KetResult<()> {
        if gate.rows != 2 || gate.cols != 2 {
            return Err(KetError::InvalidArgument(format!(
                "1-qubit kernel needs a 2x2 matrix, got {}x{}",
                gate.rows, gate.cols
            )));
        }
        let n = state.num_qubits();
        if target >= n {
            return Err(KetError::OutOfRange {
                what: "target qubit",
                index: target,
                size: n,
            });
        }

        let block = 1usize << (target + 1);
        let num_blocks = state.size() / block;
        let g = [
            gate.get(0, 0),
            gate.get(0, 1),
            gate.get(1, 0),
            gate.get(1, 1),
        ];
        let use_simd = self.uses_simd();

        let (primary, scratch) = state.buffers_mut();
        vector_ops::copy_many(primary, scratch);
        let src = SharedPtr(primary.as_ptr());
        let dst = SendPtr(scratch.as_mut_ptr());

        // Blocks are the partitioning unit so a pair never splits across two
        // workers; consecutive pairs share cache lines for low targets.
        self.dispatch(num_blocks, move |_tid, start_block, end_block| {
            let (src, dst) = (src, dst);
            let start = start_block * block;
            let end = end_block * block;
            unsafe {
                if use_simd {
                    simd::transform_pairs(src.0, dst.0, &g, target, start, end);
                } else {
                    simd::transform_pairs_scalar(src.0, dst.0, &g, target, start, end);
                }
            }
        })?;

        state.swap_buffers();
        Ok(())
    }

    /// Controlled single-qubit transform: pairs `(i, i | 2^target)` with the
    /// control bit set are rewritten by the controlled block, everything else
    /// rides along unchanged via the prelude copy.
    pub fn apply_2q(
        &self,
        state: &mut State,
        gate: &Matrix<Complex<f64>>,
        control: usize,
        target: usize,
    ) -> KetResult<()> {
        let n = state.num_qubits();
        if control >= n {
            return Err(KetError::OutOfRange {
                what: "control qubit",
                index: control,
                size: n,
            });
        }
        if target >= n {
            return Err(KetError::OutOfRange {
                what: "target qubit",
                index: target,
                size: n,
            });
        }
        if control == target {
            return Err(KetError::InvalidArgument(
                "control and target qubits must differ".into(),
            ));
        }

        let g = controlled_block(gate)?;
        let c_bit = 1usize << control;
        let t_bit = 1usize << target;

        let (primary, scratch) = state.buffers_mut();
        vector_ops::copy_many(primary, scratch);
        let src = SharedPtr(primary.as_ptr());
        let dst = SendPtr(scratch.as_mut_ptr());

        self.dispatch(state.size(), move |_tid, start, end| unsafe {
            let (src, dst) = (src, dst);
            for i in start..end {
                if i & c_bit != 0 && i & t_bit == 0 {
                    let v0 = *src.0.add(i);
                    let v1 = *src.0.add(i | t_bit);
                    *dst.0.add(i) = g[0] * v0 + g[1] * v1;
                    *dst.0.add(i | t_bit) = g[2] * v0 + g[3] * v1;
                }
            }
        })?;

        state.swap_buffers();
        Ok(())
    }

    /// Negates the amplitude of one basis state (the Grover oracle step).
    pub fn phase_flip(&self, state: &mut State, index: usize) -> KetResult<()> {
        if index >= state.size() {
            return Err(KetError::OutOfRange {
                what: "basis state",
                index,
                size: state.size(),
            });
        }

        let (primary, scratch) = state.buffers_mut();
        vector_ops::copy_many(primary, scratch);
        scratch[index] = -scratch[index];
        state.swap_buffers();
        Ok(())
    }

    /// Inversion about the mean: `new[i] = 2*mean - old[i]`. Two phases with
    /// a barrier between: a parallel amplitude sum, then a parallel rewrite.
    pub fn diffusion(&self, state: &mut State) -> KetResult<()> {
        let size = state.size();
        let sum = self.sum_amplitudes(state)?;
        let two_mean = complex!(2.0 * sum.re / size as f64, 2.0 * sum.im / size as f64);

        let (primary, scratch) = state.buffers_mut();
        let src = SharedPtr(primary.as_ptr());
        let dst = SendPtr(scratch.as_mut_ptr());

        self.dispatch(size, move |_tid, start, end| unsafe {
            let (src, dst) = (src, dst);
            let src = std::slice::from_raw_parts(src.0.add(start), end - start);
            let dst = std::slice::from_raw_parts_mut(dst.0.add(start), end - start);
            for i in 0..src.len() {
                dst[i] = two_mean - src[i];
            }
        })?;

        state.swap_buffers();
        Ok(())
    }

    /// Rescales the state to unit L2 norm. In-place (no swap): no amplitude
    /// is read after it has been written. A near-zero norm is a diagnostic,
    /// not an error; the state is left untouched.
    pub fn normalize(&self, state: &mut State) -> KetResult<()> {
        let total = self.norm_sq_total(state)?;

        if total <= NORM_EPSILON {
            warn!(norm_sq = total, "normalize skipped: state norm is degenerate");
            return Ok(());
        }
        if total == 1.0 {
            return Ok(());
        }

        let inv_norm = 1.0 / total.sqrt();
        let primary = state.primary_mut();
        let size = primary.len();
        let dst = SendPtr(primary.as_mut_ptr());

        self.dispatch(size, move |_tid, start, end| unsafe {
            let dst = dst;
            let span = std::slice::from_raw_parts_mut(dst.0.add(start), end - start);
            vector_ops::scale_many(span, inv_norm);
        })
    }

    /// Projective measurement of one qubit: draws an outcome from the
    /// marginal distribution, zeroes the incompatible amplitudes, and
    /// renormalizes.
    pub fn measure<R: Rng>(&self, state: &mut State, qubit: usize, rng: &mut R) -> KetResult<u8> {
        let n = state.num_qubits();
        if qubit >= n {
            return Err(KetError::OutOfRange {
                what: "target qubit",
                index: qubit,
                size: n,
            });
        }

        let bit = 1usize << qubit;
        let mut prob_zero = 0.0;
        for (i, amp) in state.amplitudes().iter().enumerate() {
            if i & bit == 0 {
                prob_zero += amp.norm_sq();
            }
        }

        let outcome: u8 = if rng.random::<f64>() <= prob_zero { 0 } else { 1 };
        let keep_set = outcome == 1;
        for (i, amp) in state.primary_mut().iter_mut().enumerate() {
            if ((i & bit) != 0) != keep_set {
                *amp = Complex::zero();
            }
        }

        self.normalize(state)?;
        Ok(outcome)
    }
}
