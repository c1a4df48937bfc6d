use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;

/// Outcome of one task, tagged with its submission index so callers can
/// tie failures back to their inputs.
#[derive(Debug)]
pub struct TaskReport<R> {
    pub index: usize,
    pub result: anyhow::Result<R>,
}

/// Fixed-size worker pool over an mpsc work queue.
///
/// Tasks are fully independent: workers share nothing but the queue
/// itself, and every task produces its own report. One task failing, or
/// even panicking, never takes the rest of the batch with it.
pub struct TaskPool {
    workers: usize,
}

impl TaskPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// One worker per available core.
    pub fn with_available_parallelism() -> Self {
        Self::new(
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` over every task and collect the reports, in submission
    /// order. The queue is filled up front and closed, so workers drain
    /// it and exit; no coordination beyond the queue is needed.
    pub fn run<T, R, F>(&self, tasks: Vec<T>, work: F) -> Vec<TaskReport<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> anyhow::Result<R> + Sync,
    {
        let total = tasks.len();
        if total == 0 {
            return Vec::new();
        }

        let (task_tx, task_rx) = mpsc::channel();
        for entry in tasks.into_iter().enumerate() {
            // Receiver outlives this loop, send cannot fail.
            let _ = task_tx.send(entry);
        }
        drop(task_tx);
        let task_rx = Mutex::new(task_rx);

        let (report_tx, report_rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..self.workers.min(total) {
                let report_tx = report_tx.clone();
                let task_rx = &task_rx;
                let work = &work;
                scope.spawn(move || {
                    loop {
                        // The queue is already closed, so recv never
                        // blocks: it hands out the next task or reports
                        // the queue empty.
                        let next = match task_rx.lock() {
                            Ok(rx) => rx.recv().ok(),
                            Err(_) => None,
                        };
                        let Some((index, task)) = next else {
                            break;
                        };

                        let result = panic::catch_unwind(AssertUnwindSafe(|| work(task)))
                            .unwrap_or_else(|_| Err(anyhow::anyhow!("task panicked")));
                        let _ = report_tx.send(TaskReport { index, result });
                    }
                });
            }
            drop(report_tx);
        });

        let mut reports: Vec<TaskReport<R>> = report_rx.iter().collect();
        reports.sort_by_key(|r| r.index);
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_come_back_in_submission_order() {
        let pool = TaskPool::new(4);
        let reports = pool.run((0..20).collect(), |n: usize| Ok(n * 2));

        assert_eq!(reports.len(), 20);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(report.index, i);
            assert_eq!(*report.result.as_ref().unwrap(), i * 2);
        }
    }

    #[test]
    fn one_failure_does_not_drop_the_rest() {
        let pool = TaskPool::new(3);
        let reports = pool.run((0..10).collect(), |n: usize| {
            if n == 4 {
                anyhow::bail!("task {n} went wrong");
            }
            Ok(n)
        });

        assert_eq!(reports.len(), 10);
        assert!(reports[4].result.is_err());
        assert_eq!(reports.iter().filter(|r| r.result.is_ok()).count(), 9);
    }

    #[test]
    fn a_panicking_task_is_reported_not_fatal() {
        let pool = TaskPool::new(2);
        let reports = pool.run(vec![1usize, 2, 3], |n| {
            if n == 2 {
                panic!("boom");
            }
            Ok(n)
        });

        assert_eq!(reports.len(), 3);
        assert!(reports[1].result.is_err());
        assert!(reports[0].result.is_ok() && reports[2].result.is_ok());
    }

    #[test]
    fn more_workers_than_tasks_is_fine() {
        let pool = TaskPool::new(16);
        let reports = pool.run(vec![7usize], Ok);
        assert_eq!(reports.len(), 1);
    }
}
