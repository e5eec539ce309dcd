//! Fixed-size worker pool with a FIFO task queue.
//!
//! Created once per render and reused for every row: the render loop
//! enqueues one task per pixel, then blocks in [`ThreadPool::wait`] until
//! the row has drained.

use std::collections::VecDeque;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    tasks: VecDeque<Task>,
    /// Tasks queued or currently running
    pending: usize,
    terminate: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    /// Signalled when a task is queued or on termination
    work_available: Condvar,
    /// Signalled when `pending` drops to zero
    all_done: Condvar,
}

pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawn `workers` threads; 0 means one per hardware thread.
    pub fn new(workers: usize) -> io::Result<Self> {
        let count = if workers == 0 {
            num_cpus::get()
        } else {
            workers
        };

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                pending: 0,
                terminate: false,
            }),
            work_available: Condvar::new(),
            all_done: Condvar::new(),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(count),
        };

        for index in 0..count {
            let shared = pool.shared.clone();
            // On failure the pool drops here, stopping the workers already spawned
            let handle = thread::Builder::new()
                .name(format!("glint-worker-{}", index))
                .spawn(move || worker_loop(&shared))?;
            pool.workers.push(handle);
        }

        log::debug!("Started thread pool with {} workers", count);
        Ok(pool)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task for execution on some worker.
    pub fn execute<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut queue = self.shared.queue.lock();
        queue.tasks.push_back(Box::new(task));
        queue.pending += 1;
        drop(queue);

        self.shared.work_available.notify_one();
    }

    /// Block until every queued task has finished.
    pub fn wait(&self) {
        let mut queue = self.shared.queue.lock();
        while queue.pending > 0 {
            self.shared.all_done.wait(&mut queue);
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(task) = queue.tasks.pop_front() {
                    break task;
                }
                if queue.terminate {
                    return;
                }
                shared.work_available.wait(&mut queue);
            }
        };

        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::error!(
                "Task panicked on {}",
                thread::current().name().unwrap_or("worker")
            );
        }

        let mut queue = shared.queue.lock();
        queue.pending -= 1;
        if queue.pending == 0 {
            shared.all_done.notify_all();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.queue.lock().terminate = true;
        self.shared.work_available.notify_all();

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Worker thread exited abnormally");
            }
        }
    }
}
