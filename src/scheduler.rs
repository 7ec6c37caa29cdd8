//! Fans a revision stream out across pages. The core classifier has no
//! internal concurrency; this is glue that owns one [`Reconstructor`]
//! per `page_id` behind a [`DashMap`] and dispatches revisions onto a
//! [`ThreadPool`]. A given page's revisions still run strictly serially —
//! the dispatch just routes each revision to the one instance already
//! owned for that page, creating it on first sight, so independent pages
//! proceed concurrently while a single page's history replays in order.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use threadpool::ThreadPool;
use tracing::warn;

use crate::action::Action;
use crate::checkpoint::CheckpointBlob;
use crate::config::ReconstructConfig;
use crate::errors::ReconstructError;
use crate::reconstructor::Reconstructor;
use crate::revision::Revision;

pub type ProcessResult = Result<(CheckpointBlob, Vec<Action>), ReconstructError>;
pub type ResultSink = dyn Fn(Revision, ProcessResult) + Send + Sync;

pub struct ReconstructorPool {
    pages: Arc<DashMap<String, Arc<Mutex<Reconstructor>>>>,
    pool: ThreadPool,
    config: ReconstructConfig,
}

impl ReconstructorPool {
    pub fn new(config: ReconstructConfig) -> Self {
        Self::with_workers(num_cpus::get().max(1), config)
    }

    pub fn with_workers(workers: usize, config: ReconstructConfig) -> Self {
        Self {
            pages: Arc::new(DashMap::new()),
            pool: ThreadPool::new(workers.max(1)),
            config,
        }
    }

    /// Route `rev` to the `Reconstructor` owned for its `page_id` (creating
    /// one on first sight), running it on the pool's worker threads. `on_done`
    /// is invoked from a worker thread once processing completes.
    pub fn submit(&self, rev: Revision, on_done: Arc<ResultSink>) {
        let entry = self
            .pages
            .entry(rev.page_id.clone())
            .or_insert_with(|| {
                Arc::new(Mutex::new(Reconstructor::new(
                    rev.page_id.clone(),
                    rev.page_title.clone(),
                    self.config.clone(),
                )))
            })
            .clone();

        self.pool.execute(move || {
            let result = match entry.lock() {
                Ok(mut guard) => guard.process(&rev),
                Err(_) => {
                    warn!(page_id = %rev.page_id, "reconstructor mutex poisoned");
                    Err(ReconstructError::InvariantViolation(
                        "reconstructor mutex poisoned by a prior panic".to_string(),
                    ))
                }
            };
            on_done(rev, result);
        });
    }

    /// Block until every submitted revision has finished processing.
    pub fn join(&self) {
        self.pool.join();
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
