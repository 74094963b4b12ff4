//! Identifier batching for `in`-filter queries
//!
//! Graph caps how many values an `in` clause may carry (empirically around 15
//! values or ~3000 characters, enforced inconsistently). Large identifier sets
//! are split into contiguous batches, each sent as its own request; a failed
//! batch is recorded and the run carries on with the rest.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;
use serde::Serialize;

use crate::error::{BatchError, Result};

/// Smallest accepted batch size
pub const MIN_BATCH_SIZE: usize = 1;

/// Largest accepted batch size
pub const MAX_BATCH_SIZE: usize = 20;

/// Batch size used when none is configured
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// A batch size within `MIN_BATCH_SIZE..=MAX_BATCH_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    pub fn new(size: usize) -> std::result::Result<Self, BatchError> {
        if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(BatchError::InvalidBatchSize {
                min: MIN_BATCH_SIZE,
                max: MAX_BATCH_SIZE,
                actual: size,
            })
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Half this size, or `None` once batches are single identifiers
    pub fn halved(&self) -> Option<Self> {
        (self.0 > MIN_BATCH_SIZE).then(|| Self((self.0 / 2).max(MIN_BATCH_SIZE)))
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(DEFAULT_BATCH_SIZE)
    }
}

/// Split identifiers into contiguous batches of at most `size`.
///
/// Order is preserved and duplicates are kept; only the last batch may be short.
pub fn partition_into_batches(ids: &[String], size: BatchSize) -> Vec<Vec<String>> {
    ids.chunks(size.get()).map(<[String]>::to_vec).collect()
}

/// Build `property in ('a','b')`, escaping single quotes per OData rules
pub fn in_filter(property: &str, values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect();
    format!("{} in ({})", property, quoted.join(","))
}

/// A batch whose request failed
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Position of the batch in the partition
    pub index: usize,
    pub ids: Vec<String>,
    pub error: String,
    /// The error was a filter-size rejection, so a smaller batch may succeed
    pub retryable: bool,
}

/// Per-batch outcome counts, in batch order
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub index: usize,
    pub size: usize,
    pub returned: usize,
    pub failed: bool,
}

/// Merged result of a batched query
#[derive(Debug)]
pub struct BatchReport<T> {
    /// Items from successful batches, in batch order
    pub items: Vec<T>,
    pub failures: Vec<BatchFailure>,
    pub outcomes: Vec<BatchOutcome>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Fold another report in, renumbering its batches after ours
    pub fn merge(&mut self, other: BatchReport<T>) {
        let offset = self.outcomes.len();
        self.items.extend(other.items);
        self.failures.extend(other.failures.into_iter().map(|mut f| {
            f.index += offset;
            f
        }));
        self.outcomes.extend(other.outcomes.into_iter().map(|mut o| {
            o.index += offset;
            o
        }));
    }
}

type BatchFuture<T> = Pin<Box<dyn Future<Output = (usize, Result<Vec<T>>)> + Send>>;

/// Run one query per batch with up to `max_concurrent` in flight.
///
/// A failed batch never aborts its siblings. Results are collected privately
/// per batch and merged in batch order once all requests are done, so the
/// output does not depend on completion order.
///
/// `on_batch_done` is called once per finished batch (progress reporting).
pub async fn run_batches<T, F, Fut>(
    batches: Vec<Vec<String>>,
    fetch_batch: F,
    max_concurrent: usize,
    mut on_batch_done: impl FnMut(),
) -> BatchReport<T>
where
    T: Send + 'static,
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    let total = batches.len();
    if total == 0 {
        return BatchReport::default();
    }

    debug!(
        "Running {} batches with max {} concurrent",
        total, max_concurrent
    );

    let mut results: Vec<Option<Result<Vec<T>>>> = (0..total).map(|_| None).collect();
    let mut futures: FuturesUnordered<BatchFuture<T>> = FuturesUnordered::new();
    let mut pending = batches.iter().cloned().enumerate();

    let make_future = |index: usize, ids: Vec<String>, f: &F| -> BatchFuture<T> {
        let fut = f(ids);
        Box::pin(async move { (index, fut.await) })
    };

    for (index, ids) in pending.by_ref().take(max_concurrent.max(1)) {
        futures.push(make_future(index, ids, &fetch_batch));
    }

    while let Some((index, result)) = futures.next().await {
        match &result {
            Ok(items) => debug!("Batch {} returned {} items", index, items.len()),
            Err(e) => debug!("Batch {} failed: {}", index, e),
        }
        results[index] = Some(result);
        on_batch_done();

        if let Some((next, ids)) = pending.next() {
            futures.push(make_future(next, ids, &fetch_batch));
        }
    }

    let mut report = BatchReport::default();
    for (index, (ids, result)) in batches.into_iter().zip(results).enumerate() {
        let size = ids.len();
        let Some(result) = result else {
            continue;
        };
        match result {
            Ok(items) => {
                report.outcomes.push(BatchOutcome {
                    index,
                    size,
                    returned: items.len(),
                    failed: false,
                });
                report.items.extend(items);
            }
            Err(err) => {
                let retryable = matches!(&err, crate::error::Error::Api(api) if api.is_filter_limit());
                report.outcomes.push(BatchOutcome {
                    index,
                    size,
                    returned: 0,
                    failed: true,
                });
                report.failures.push(BatchFailure {
                    index,
                    ids,
                    error: err.to_string(),
                    retryable,
                });
            }
        }
    }

    debug!(
        "Batched query finished: {} items, {} failed batches",
        report.items.len(),
        report.failures.len()
    );
    report
}
