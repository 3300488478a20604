use crate::extract::Extract;
use crate::fetch::{fetch, unavailable};
use crate::metrics::Metric;
use crate::registry::Registry;
use crate::source::PageSource;
use crate::tui::Progress;
use crate::{Error, Result};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Tickers handled by a single worker, by default.
pub const DEFAULT_PARTITION: usize = 100;

/// Split `[0, len)` into consecutive ranges of `size`; the last range may be shorter.
///
/// The ranges are disjoint and together cover every index exactly once.
pub fn partition(len: usize, size: usize) -> Result<Vec<Range<usize>>> {
    if size == 0 {
        return Err(Error::Partition);
    }
    Ok((0..len)
        .step_by(size)
        .map(|start| start..usize::min(start + size, len))
        .collect())
}

/// Counts from a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub tickers: usize,
    pub workers: usize,
    pub failures: usize,
}

/// Values collected for one ticker by a worker.
#[derive(Debug)]
struct Fetched {
    symbol: String,
    values: Vec<String>,
    retrieved: bool,
}

/// Runs the fetcher over a registry, one tokio task per partition.
///
/// Each task owns the symbols of its chunk and returns its own results; nothing is shared
/// between tasks except the read-only source, extractor and metric list. The registry is only
/// written once every task has been joined.
pub struct Runner {
    source: Arc<dyn PageSource>,
    extractor: Arc<dyn Extract>,
    metrics: Arc<[Metric]>,
    partition: usize,
    progress: Progress,
}

impl Runner {
    pub fn new(
        source: Arc<dyn PageSource>,
        extractor: Arc<dyn Extract>,
        metrics: Vec<Metric>,
        partition: usize,
    ) -> Self {
        Self {
            source,
            extractor,
            metrics: metrics.into(),
            partition,
            progress: Progress::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Fetch every symbol in `registry` and fill its entry.
    ///
    /// Returns once all workers have finished. A symbol whose page cannot be retrieved, or whose
    /// worker panicked, is filled with `"N/A"` for every metric.
    pub async fn run(&self, registry: &mut Registry) -> Result<Summary> {
        let time = std::time::Instant::now();
        let width = self.metrics.len();
        let symbols = registry.symbols();
        let chunks = partition(symbols.len(), self.partition)?;

        info!(
            "fetching key statistics for {} tickers across {} workers ...",
            symbols.len(),
            chunks.len()
        );

        // spawn every worker before joining any of them
        let mut tasks = Vec::with_capacity(chunks.len());
        for (worker, range) in chunks.iter().enumerate() {
            let chunk = symbols[range.clone()].to_vec();
            let metrics = self.metrics.clone();
            let source = self.source.clone();
            let extractor = self.extractor.clone();
            let progress = self.progress.clone();
            tasks.push(tokio::spawn(async move {
                work(worker, chunk, metrics, source, extractor, progress).await
            }));
        }

        // barrier: wait for every worker
        let mut summary = Summary {
            tickers: symbols.len(),
            workers: chunks.len(),
            failures: 0,
        };
        let mut results = Vec::with_capacity(symbols.len());
        for (range, task) in chunks.into_iter().zip(tasks) {
            match task.await {
                Ok(fetched) => results.extend(fetched),
                Err(err) => {
                    error!("worker for tickers {range:?} failed, error({err})");
                    results.extend(symbols[range].iter().map(|symbol| Fetched {
                        symbol: symbol.clone(),
                        values: unavailable(width),
                        retrieved: false,
                    }));
                }
            }
        }
        self.progress.finish();

        for fetched in results {
            if !fetched.retrieved {
                summary.failures += 1;
            }
            registry.fill(&fetched.symbol, fetched.values)?;
        }

        info!(
            "workers complete; {} of {} tickers retrieved. {}",
            summary.tickers - summary.failures,
            summary.tickers,
            crate::time_elapsed(time)
        );

        Ok(summary)
    }
}

async fn work(
    worker: usize,
    chunk: Vec<String>,
    metrics: Arc<[Metric]>,
    source: Arc<dyn PageSource>,
    extractor: Arc<dyn Extract>,
    progress: Progress,
) -> Vec<Fetched> {
    trace!("worker {worker} started with {} tickers", chunk.len());

    let mut fetched = Vec::with_capacity(chunk.len());
    for symbol in chunk {
        let (values, retrieved) =
            match fetch(&symbol, &metrics, source.as_ref(), &extractor).await {
                Ok(values) => {
                    progress.success();
                    (values, true)
                }
                Err(err) => {
                    error!("failed to fetch key statistics for [{symbol}], error({err})");
                    progress.failure();
                    (unavailable(metrics.len()), false)
                }
            };
        fetched.push(Fetched {
            symbol,
            values,
            retrieved,
        });
    }

    debug!("worker {worker} finished");
    fetched
}
