use crate::engine::error::KetResult;
use crate::engine::pool::{get_thread_work_range, WorkerPool};
use core::fmt;
use rayon::prelude::*;
use std::sync::Arc;

/// Raw pointer wrapper so partitioned workers can reach into the amplitude
/// buffers. Sound only under the kernel discipline: ranges are disjoint for
/// writes, and the dispatching kernel holds the state borrow until the
/// barrier.
#[derive(Clone, Copy)]
pub(crate) struct SendPtr<T>(pub *mut T);

unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

#[derive(Clone, Copy)]
pub(crate) struct SharedPtr<T>(pub *const T);

unsafe impl<T> Send for SharedPtr<T> {}
unsafe impl<T> Sync for SharedPtr<T> {}

enum Backend {
    Pool(Arc<WorkerPool>),
    Rayon,
}

/// Engine handle: owns the scheduler and the kernel configuration. All gate
/// kernels are methods on this type; calls on one state must stay serial,
/// which the `&mut State` receivers enforce.
pub struct Runtime {
    backend: Backend,
    simd: bool,
}

impl Runtime {
    /// Default engine: thread-pool backend sized to the machine.
    pub fn new() -> KetResult<Runtime> {
        Ok(Runtime {
            backend: Backend::Pool(Arc::new(WorkerPool::with_default_size()?)),
            simd: false,
        })
    }

    pub fn with_pool(pool: Arc<WorkerPool>) -> Runtime {
        Runtime {
            backend: Backend::Pool(pool),
            simd: false,
        }
    }

    /// Alternative backend running the same kernels on the rayon global pool.
    pub fn rayon() -> Runtime {
        Runtime {
            backend: Backend::Rayon,
            simd: false,
        }
    }

    pub fn simd(mut self) -> Runtime {
        self.simd = true;
        self
    }

    pub fn uses_simd(&self) -> bool {
        self.simd
    }

    pub(crate) fn workers(&self) -> usize {
        match &self.backend {
            Backend::Pool(pool) => pool.num_threads(),
            Backend::Rayon => rayon::current_num_threads(),
        }
    }

    /// Fans `worker(tid, start, end)` out over `[0, total)`, one contiguous
    /// range per worker, and blocks until every range is done. Ranges are
    /// disjoint, so workers may write "their" span of a shared buffer without
    /// further coordination.
    pub(crate) fn dispatch<F>(&self, total: usize, worker: F) -> KetResult<()>
    where
        F: Fn(usize, usize, usize) + Send + Sync + 'static,
    {
        match &self.backend {
            Backend::Pool(pool) => {
                let threads = pool.num_threads();
                let worker = Arc::new(worker);
                let mut submit_error = None;

                for tid in 0..threads {
                    let (start, end) = get_thread_work_range(total, threads, tid);
                    let worker = Arc::clone(&worker);
                    if let Err(e) = pool.enqueue(Box::new(move || (*worker)(tid, start, end))) {
                        submit_error = Some(e);
                        break;
                    }
                }

                // Already-queued ranges still hold pointers into the caller's
                // buffers; the barrier must complete before an error can
                // propagate.
                pool.wait();

                match submit_error {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
            Backend::Rayon => {
                let threads = rayon::current_num_threads();
                (0..threads).into_par_iter().for_each(|tid| {
                    let (start, end) = get_thread_work_range(total, threads, tid);
                    worker(tid, start, end);
                });
                Ok(())
            }
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match &self.backend {
            Backend::Pool(pool) => format!("pool x{}", pool.num_threads()),
            Backend::Rayon => "rayon".to_string(),
        };
        if self.simd {
            write!(f, "Runtime[{}+simd]", backend)
        } else {
            write!(f, "Runtime[{}]", backend)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn dispatch_covers_all_indices() {
        let rt = Runtime::new().unwrap();
        let total = 1003;
        let hits = Arc::new((0..total).map(|_| AtomicUsize::new(0)).collect::<Vec<_>>());

        let shared = Arc::clone(&hits);
        rt.dispatch(total, move |_tid, start, end| {
            for i in start..end {
                shared[i].fetch_add(1, Ordering::SeqCst);
            }
        })
        .unwrap();

        assert!(hits.iter().all(|h| h.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn rayon_backend_dispatches() {
        let rt = Runtime::rayon();
        let total = 64;
        let hits = Arc::new(AtomicUsize::new(0));

        let shared = Arc::clone(&hits);
        rt.dispatch(total, move |_tid, start, end| {
            shared.fetch_add(end - start, Ordering::SeqCst);
        })
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), total);
    }

    #[test]
    fn display_names_the_backend() {
        assert!(Runtime::rayon().simd().to_string().contains("rayon+simd"));
    }
}
