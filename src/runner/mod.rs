//! Runners implement threading strategies for Servers.
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use log::error;

use threadpool::ThreadPool;

mod threadpool;

/// Runs each job inline, on the calling thread. A panicking job is
/// logged and does not unwind into the caller.
pub struct SimpleRunner;

impl SimpleRunner {
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
            error!("job panicked");
        }
    }
}

/// Spawns a new thread for each job.
pub struct ThreadRunner {
    threads: Vec<thread::JoinHandle<()>>,
}

impl Default for ThreadRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadRunner {
    pub fn new() -> Self {
        Self { threads: vec![] }
    }

    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.reap();
        self.threads.push(thread::spawn(f));
    }

    /// Join threads that are done.
    fn reap(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) =
            self.threads.drain(..).partition(|t| t.is_finished());
        self.threads = running;
        for thread in done {
            join(thread);
        }
    }
}

fn join(thread: thread::JoinHandle<()>) {
    if let Err(e) = thread.join() {
        error!("Error joining thread: {:?}", e);
    }
}

impl Drop for ThreadRunner {
    fn drop(&mut self) {
        for thread in self.threads.drain(..) {
            join(thread);
        }
    }
}

/// Runs jobs on a fixed pool of worker threads.
pub struct ThreadPoolRunner {
    threadpool: ThreadPool,
}

impl ThreadPoolRunner {
    pub fn new(pool_size: usize) -> Self {
        Self {
            threadpool: ThreadPool::new(pool_size),
        }
    }
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.threadpool.execute(f) {
            error!("thread pool error: {}", e);
        }
    }
}

pub enum Runner {
    Simple(SimpleRunner),
    Thread(ThreadRunner),
    ThreadPool(ThreadPoolRunner),
}

impl Runner {
    pub fn run<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Self::Simple(runner) => runner.run(f),
            Self::Thread(runner) => runner.run(f),
            Self::ThreadPool(runner) => runner.run(f),
        }
    }

    /// Create a new runner using the specified number of threads.
    /// 0 is infinite, a new thread will be created for each job.
    /// 1 runs in the main thread.
    /// Any other number creates a thread pool of the specified size.
    pub fn new(n_threads: usize) -> Self {
        match n_threads {
            0 => Self::Thread(ThreadRunner::new()),
            1 => Self::Simple(SimpleRunner),
            n => Self::ThreadPool(ThreadPoolRunner::new(n)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn run_jobs(n_threads: usize, n_jobs: usize) -> usize {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut runner = Runner::new(n_threads);
            for _ in 0..n_jobs {
                let counter = counter.clone();
                runner.run(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            // Dropping the runner waits for outstanding jobs.
        }
        counter.load(Ordering::SeqCst)
    }

    #[test]
    fn test_simple_runner() {
        assert_eq!(run_jobs(1, 5), 5);
    }

    #[test]
    fn test_thread_runner() {
        assert_eq!(run_jobs(0, 20), 20);
    }

    #[test]
    fn test_thread_pool_runner() {
        assert_eq!(run_jobs(4, 50), 50);
    }

    #[test]
    fn test_simple_runner_survives_panic() {
        let mut runner = Runner::new(1);
        runner.run(|| panic!("boom"));
        assert_eq!(run_jobs(1, 1), 1);
    }

    #[test]
    fn test_thread_pool_survives_panic() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut runner = Runner::new(2);
            for i in 0..10 {
                let counter = counter.clone();
                runner.run(move || {
                    if i % 2 == 0 {
                        panic!("job {} failed", i);
                    }
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }
}
