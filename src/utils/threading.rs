use crate::error::{FilterError, FilterResult};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crossbeam_channel::bounded;
use std::thread;
use tracing::debug;

/// A unit of work that owns private state and can absorb another worker's
/// state once all jobs are done.
pub trait Worker: Send + Clone {
    type Job: Send;

    fn process(&mut self, job: Self::Job) -> FilterResult<()>;

    fn merge_worker(&mut self, other: Self);
}

/// Feeds `jobs` through a bounded channel to `num_threads` clones of
/// `prototype`, then folds every worker into one.
///
/// Workers never share state while running; the fold happens only after all
/// of them have been joined. The first job error aborts the run.
pub fn run_pool<W, I>(prototype: W, jobs: I, num_threads: usize) -> FilterResult<W>
where
    W: Worker,
    I: IntoIterator<Item = W::Job>,
{
    let num_threads = num_threads.max(1);
    let (tx, rx) = bounded::<W::Job>(num_threads * 2);

    let workers = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| {
                let rx = rx.clone();
                let mut worker = prototype.clone();
                scope.spawn(move || -> FilterResult<W> {
                    while let Ok(job) = rx.recv() {
                        worker.process(job)?;
                    }
                    Ok(worker)
                })
            })
            .collect();
        drop(rx);

        for job in jobs {
            // Every receiver is gone only when all workers have failed.
            if tx.send(job).is_err() {
                break;
            }
        }
        drop(tx);

        let mut workers = Vec::with_capacity(num_threads);
        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(worker)) => workers.push(worker),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    first_error.get_or_insert(FilterError::WorkerPanicked);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(workers),
        }
    })?;

    merge_workers(prototype, workers)
}

fn merge_workers<W: Worker>(mut main: W, workers: Vec<W>) -> FilterResult<W> {
    let merge_progress = ProgressBarBuilder::new("Merging partial results")
        .with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .with_tick()
        .build();

    let total = workers.len();
    for (idx, worker) in workers.into_iter().enumerate() {
        merge_progress.set_message(format!("Merging worker {} of {}", idx + 1, total));
        main.merge_worker(worker);
        merge_progress.inc(1);
    }
    merge_progress.finish_and_clear();
    debug!("merged {} workers", total);

    Ok(main)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct Summer {
        total: u64,
        seen: usize,
    }

    impl Worker for Summer {
        type Job = u64;

        fn process(&mut self, job: u64) -> FilterResult<()> {
            if job == 0 {
                return Err(FilterError::InvalidParameter("zero".to_string()));
            }
            self.total += job;
            self.seen += 1;
            Ok(())
        }

        fn merge_worker(&mut self, other: Self) {
            self.total += other.total;
            self.seen += other.seen;
        }
    }

    #[test]
    fn test_pool_merges_all_workers() {
        let merged = run_pool(Summer::default(), 1..=100u64, 4).unwrap();
        assert_eq!(merged.total, 5050);
        assert_eq!(merged.seen, 100);
    }

    #[test]
    fn test_pool_reports_job_errors() {
        let result = run_pool(Summer::default(), vec![1, 0, 2], 2);
        assert!(matches!(result, Err(FilterError::InvalidParameter(_))));
    }
}
