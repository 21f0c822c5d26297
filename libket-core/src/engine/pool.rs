use crate::engine::error::{KetError, KetResult};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::debug;

pub const DEFAULT_QUEUE_CAPACITY: usize = 128;
pub const MAX_POOL_THREADS: usize = 4;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Deterministic range partitioning: splits `[0, total)` into `num_threads`
/// contiguous chunks; the last thread absorbs the remainder.
pub fn get_thread_work_range(total: usize, num_threads: usize, thread_id: usize) -> (usize, usize) {
    let chunk = total / num_threads;
    let start = thread_id * chunk;
    let end = if thread_id == num_threads - 1 {
        total
    } else {
        start + chunk
    };
    (start, end)
}

struct QueueState {
    slots: Vec<Option<Task>>,
    head: usize,
    tail: usize,
    pending: usize,
    active: usize,
    shutdown: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    notify: Condvar,
    all_done: Condvar,
    capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A worker that panicked mid-task poisons the mutex; the queue
        // bookkeeping itself is still consistent, so recover and continue.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fixed pool of worker threads over a bounded FIFO task queue. Submitters
/// fan work out with [`WorkerPool::enqueue`] and rendezvous on
/// [`WorkerPool::wait`]; tasks are dequeued in FIFO order but complete in
/// unspecified order.
pub struct WorkerPool {
    shared: Arc<Shared>,
    num_threads: usize,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(num_threads: usize, queue_capacity: usize) -> KetResult<WorkerPool> {
        if num_threads == 0 || queue_capacity == 0 {
            return Err(KetError::InvalidArgument(
                "worker pool needs at least one thread and one queue slot".into(),
            ));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                slots: (0..queue_capacity).map(|_| None).collect(),
                head: 0,
                tail: 0,
                pending: 0,
                active: 0,
                shutdown: false,
            }),
            notify: Condvar::new(),
            all_done: Condvar::new(),
            capacity: queue_capacity,
        });

        let mut workers = Vec::with_capacity(num_threads);
        for tid in 0..num_threads {
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("ket-worker-{}", tid))
                .spawn(move || worker_loop(shared))
                .map_err(|e| KetError::ResourceExhausted(format!("worker thread: {}", e)))?;
            workers.push(handle);
        }

        debug!(num_threads, queue_capacity, "worker pool started");

        Ok(WorkerPool {
            shared,
            num_threads,
            workers,
        })
    }

    /// Pool sized to the machine: `min(available cores, 4)` workers and the
    /// default queue depth.
    pub fn with_default_size() -> KetResult<WorkerPool> {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        WorkerPool::new(cores.min(MAX_POOL_THREADS), DEFAULT_QUEUE_CAPACITY)
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Appends a task to the queue. Rejects with [`KetError::QueueFull`]
    /// rather than blocking when the queue is saturated; callers may `wait`
    /// for the backlog to drain and retry, or create the pool with a larger
    /// queue.
    pub fn enqueue(&self, task: Task) -> KetResult<()> {
        let mut q = self.shared.lock();

        if q.pending == self.shared.capacity {
            return Err(KetError::QueueFull {
                capacity: self.shared.capacity,
            });
        }

        let tail = q.tail;
        q.slots[tail] = Some(task);
        q.tail = (tail + 1) % self.shared.capacity;
        q.pending += 1;
        q.active += 1;

        // Each enqueued task becomes individually available, and several
        // workers may be parked at once.
        self.shared.notify.notify_all();
        Ok(())
    }

    /// Barrier: blocks until every submitted task has finished.
    pub fn wait(&self) {
        let mut q = self.shared.lock();
        while q.pending > 0 || q.active > 0 {
            q = self
                .shared
                .all_done
                .wait(q)
                .unwrap_or_else(|e| e.into_inner());
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut q = self.shared.lock();
            q.shutdown = true;
            self.shared.notify.notify_all();
        }

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }

        debug!("worker pool stopped");
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let task = {
            let mut q = shared.lock();

            while q.pending == 0 && !q.shutdown {
                q = shared.notify.wait(q).unwrap_or_else(|e| e.into_inner());
            }

            // Drain queued tasks before exiting so shutdown never strands
            // submitted work.
            if q.shutdown && q.pending == 0 {
                break;
            }

            let head = q.head;
            let task = q.slots[head].take();
            q.head = (head + 1) % shared.capacity;
            q.pending -= 1;
            task
        };

        if let Some(task) = task {
            task();
        }

        let mut q = shared.lock();
        q.active -= 1;
        if q.active == 0 && q.pending == 0 {
            shared.all_done.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn work_ranges_cover_everything_exactly_once() {
        for (total, threads) in [(16usize, 4usize), (17, 4), (5, 8), (1000, 3), (3, 3)] {
            let mut covered = vec![0u32; total];
            let mut previous_end = 0;
            for tid in 0..threads {
                let (start, end) = get_thread_work_range(total, threads, tid);
                assert!(start <= end);
                if tid == 0 {
                    assert_eq!(start, 0);
                }
                assert_eq!(start, previous_end);
                previous_end = end;
                for slot in covered[start..end].iter_mut() {
                    *slot += 1;
                }
            }
            assert_eq!(previous_end, total);
            assert!(covered.iter().all(|&c| c == 1), "total={}", total);
        }
    }

    #[test]
    fn no_empty_ranges_when_enough_work() {
        let threads = 4;
        for tid in 0..threads {
            let (start, end) = get_thread_work_range(threads, threads, tid);
            assert!(end > start);
        }
    }

    #[test]
    fn runs_all_tasks_and_wait_returns() {
        let pool = WorkerPool::new(4, 64).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            let counter = Arc::clone(&counter);
            pool.enqueue(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 50);

        // The barrier is reusable across submission rounds.
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            pool.enqueue(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 60);
    }

    #[test]
    fn saturated_queue_rejects() {
        let pool = WorkerPool::new(1, 1).unwrap();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        pool.enqueue(Box::new(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        }))
        .unwrap();

        // First task is now active and off the queue.
        started_rx.recv().unwrap();

        pool.enqueue(Box::new(|| {})).unwrap();
        let err = pool.enqueue(Box::new(|| {}));
        assert_eq!(err.unwrap_err(), KetError::QueueFull { capacity: 1 });

        release_tx.send(()).unwrap();
        pool.wait();
    }

    #[test]
    fn shutdown_drains_queued_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(2, 32).unwrap();
            for _ in 0..16 {
                let counter = Arc::clone(&counter);
                pool.enqueue(Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
            }
            // Dropped without an explicit wait.
        }
        assert_eq!(counter.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn rejects_degenerate_configuration() {
        assert!(WorkerPool::new(0, 8).is_err());
        assert!(WorkerPool::new(2, 0).is_err());
    }
}
