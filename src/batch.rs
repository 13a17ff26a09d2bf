//! Order-preserving micro-batching over mpsc channels.

use tokio::sync::mpsc::{error::TryRecvError, Receiver, Sender};

/// Batch values from `values` into non-empty `Vec`s on `batches`.
///
/// Values currently sitting in the channel are drained greedily into the
/// batch in progress; when the channel momentarily has nothing ready and the
/// batch is non-empty, the batch is emitted immediately rather than waiting
/// for more values. Only an empty batch blocks, waiting for the first value
/// of the next batch. Batch sizes therefore adapt to producer speed instead
/// of a fixed count or timer.
///
/// Global order is preserved: the concatenation of all emitted batches
/// equals the input sequence.
///
/// Returns once `values` is closed and fully drained, flushing a pending
/// non-empty batch first. The output channel closes only when every
/// `Sender` handle is dropped, so its lifecycle stays with the caller.
pub async fn batch_up<T>(mut values: Receiver<T>, batches: Sender<Vec<T>>) {
    loop {
        let mut batch = Vec::new();
        loop {
            match values.try_recv() {
                Ok(v) => batch.push(v),
                Err(TryRecvError::Empty) => {
                    if !batch.is_empty() {
                        break;
                    }
                    match values.recv().await {
                        Some(v) => batch.push(v),
                        None => return,
                    }
                }
                Err(TryRecvError::Disconnected) => {
                    if !batch.is_empty() {
                        let _ = batches.send(batch).await;
                    }
                    return;
                }
            }
        }
        if batches.send(batch).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_order_preserved_and_batches_form() {
        let (tx, rx) = mpsc::channel(10);
        let (batch_tx, mut batch_rx) = mpsc::channel::<Vec<i32>>(1);

        let producer = tokio::spawn(async move {
            for i in 0..100 {
                tx.send(i).await.unwrap();
            }
        });

        let consumer = tokio::spawn(async move {
            let mut seen = Vec::new();
            let mut biggest = 0;
            while let Some(batch) = batch_rx.recv().await {
                assert!(!batch.is_empty());
                biggest = biggest.max(batch.len());
                seen.extend(batch);
            }
            (seen, biggest)
        });

        batch_up(rx, batch_tx).await;
        producer.await.unwrap();
        let (seen, biggest) = consumer.await.unwrap();

        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        // the input channel is buffered and the output is not, so at least
        // one batch must have picked up more than one value
        assert!(biggest > 1, "largest batch was {biggest}");
    }

    #[tokio::test]
    async fn test_closed_empty_input() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        let (batch_tx, mut batch_rx) = mpsc::channel(1);
        drop(tx);

        batch_up(rx, batch_tx).await;
        assert!(batch_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_final_batch_flushed() {
        let (tx, rx) = mpsc::channel(10);
        let (batch_tx, mut batch_rx) = mpsc::channel(4);

        for i in 0..3 {
            tx.send(i).await.unwrap();
        }
        drop(tx);

        batch_up(rx, batch_tx).await;

        let batch = batch_rx.recv().await.expect("pending batch flushed");
        assert_eq!(batch, vec![0, 1, 2]);
        assert!(batch_rx.recv().await.is_none());
    }
}
