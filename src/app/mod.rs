pub mod ports;
pub mod plugins_use_case;
pub mod themes_use_case;
pub mod uncategorized_use_case;

use crate::error::Result;
use crate::storage::WriteOutcome;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Counts of what one pass did to the notes on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub pass: &'static str,
    pub created: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl PassSummary {
    pub fn new(pass: &'static str) -> Self {
        Self {
            pass,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Created => self.created += 1,
            WriteOutcome::Replaced => self.replaced += 1,
            WriteOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.replaced + self.skipped
    }
}

/// Run `enrich` over `items` with at most `concurrency` in flight, then
/// hand each result to `write` in the original item order.
///
/// The first error, from either side, aborts the outstanding tasks and is
/// returned. Everything written before it stays written.
pub(crate) async fn for_each_ordered<T, R, F, Fut, W>(
    items: Vec<T>,
    concurrency: usize,
    enrich: F,
    mut write: W,
) -> Result<()>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R>> + Send + 'static,
    W: FnMut(R) -> Result<()>,
{
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let handles: Vec<_> = items
        .into_iter()
        .map(|item| {
            let semaphore = semaphore.clone();
            let fut = enrich(item);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                fut.await
            })
        })
        .collect();

    let mut pending = handles.into_iter();
    while let Some(handle) = pending.next() {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(join_err.into()),
        };
        if let Err(e) = result.and_then(&mut write) {
            for handle in pending {
                handle.abort();
            }
            return Err(e);
        }
    }
    Ok(())
}
