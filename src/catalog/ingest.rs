//! Batched catalog ingestion.
//!
//! Building records are indexed concurrently with their own retrieval: a
//! producer streams paginated records into a bounded channel, the batcher
//! groups whatever has arrived, and the consumer performs one bulk index
//! write per batch. Pagination and index writes therefore overlap instead
//! of running back to back.

use tokio::sync::mpsc;
use tracing::debug;

use crate::batch::batch_up;
use crate::catalog::BuildingIndex;
use crate::directory::Building;
use crate::error::{Result, UpstreamError};
use crate::sources::DirectorySource;

const PRODUCER_BUFFER: usize = 10_000;

/// Stream every building out of `source` into `index`, batching writes.
/// Returns the number of buildings indexed.
pub async fn build_catalog(
    index: &BuildingIndex,
    source: &dyn DirectorySource,
) -> Result<usize> {
    let (tx, rx) = mpsc::channel::<Building>(PRODUCER_BUFFER);
    let (batch_tx, mut batch_rx) = mpsc::channel::<Vec<Building>>(1);

    let producer = async move {
        source
            .for_each_building(Box::new(move |building| {
                let tx = tx.clone();
                Box::pin(async move {
                    tx.send(building).await.map_err(|_| {
                        UpstreamError::Paging("building channel closed".to_string()).into()
                    })
                })
            }))
            .await
    };

    let batcher = async {
        batch_up(rx, batch_tx).await;
        Ok::<(), crate::error::UsherError>(())
    };

    let consumer = async {
        let mut indexed = 0usize;
        while let Some(batch) = batch_rx.recv().await {
            debug!(batch = batch.len(), "indexing building batch");
            index.bulk_index(&batch)?;
            indexed += batch.len();
        }
        Ok::<usize, crate::error::UsherError>(indexed)
    };

    // try_join drops the other two stages on the first failure, so a failed
    // index write cannot leave the producer blocked on a full channel
    let (_, _, indexed) = tokio::try_join!(producer, batcher, consumer)?;
    Ok(indexed)
}
