use crate::engine::error::KetResult;
use crate::engine::runtime::{Runtime, SendPtr, SharedPtr};
use crate::engine::state::State;
use crate::vector_ops;
use crate::{complex, Complex};

/// Per-worker accumulator slot, padded to a full cache line so neighbouring
/// workers never share one.
#[repr(align(64))]
#[derive(Clone, Copy, Default)]
struct PartialSum {
    re: f64,
    im: f64,
}

impl Runtime {
    /// Parallel sum of all amplitudes: each worker folds its range into a
    /// private slot, the slots are combined serially after the barrier.
    pub fn sum_amplitudes(&self, state: &State) -> KetResult<Complex<f64>> {
        let workers = self.workers();
        let mut partials = vec![PartialSum::default(); workers];
        let src = SharedPtr(state.amplitudes().as_ptr());
        let slots = SendPtr(partials.as_mut_ptr());

        self.dispatch(state.size(), move |tid, start, end| unsafe {
            let (src, slots) = (src, slots);
            let span = std::slice::from_raw_parts(src.0.add(start), end - start);
            let sum = vector_ops::sum_many(span);
            *slots.0.add(tid) = PartialSum {
                re: sum.re,
                im: sum.im,
            };
        })?;

        let mut total = Complex::zero();
        for partial in &partials {
            total += complex!(partial.re, partial.im);
        }
        Ok(total)
    }

    /// Parallel squared L2 norm, same two-phase shape as [`Runtime::sum_amplitudes`].
    pub fn norm_sq_total(&self, state: &State) -> KetResult<f64> {
        let workers = self.workers();
        let mut partials = vec![PartialSum::default(); workers];
        let src = SharedPtr(state.amplitudes().as_ptr());
        let slots = SendPtr(partials.as_mut_ptr());

        self.dispatch(state.size(), move |tid, start, end| unsafe {
            let (src, slots) = (src, slots);
            let span = std::slice::from_raw_parts(src.0.add(start), end - start);
            (*slots.0.add(tid)).re = vector_ops::norm_sq_sum_many(span);
        })?;

        Ok(partials.iter().map(|p| p.re).sum())
    }
}
