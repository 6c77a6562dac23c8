use super::*;
use futures::StreamExt;
use tracing::debug;

const MERGED_CHANNEL_CAPACITY: usize = 16;

fn receiver_stream(
    mut rx: mpsc::Receiver<ReceivedBundle>,
) -> impl futures::Stream<Item = ReceivedBundle> + Unpin {
    futures::stream::poll_fn(move |cx| rx.poll_recv(cx))
}

/// Fans any number of receivers into a single receiver.
///
/// Every bundle sent on any input is delivered exactly once, in order per
/// input, with no ordering between inputs. The returned receiver closes once
/// every input has closed; with no inputs it is closed from the start.
///
/// Must be called from within a Tokio runtime.
pub fn join_receivers(
    inputs: impl IntoIterator<Item = mpsc::Receiver<ReceivedBundle>>,
) -> mpsc::Receiver<ReceivedBundle> {
    let (tx, rx) = mpsc::channel(MERGED_CHANNEL_CAPACITY);

    let mut merged = futures::stream::select_all(inputs.into_iter().map(receiver_stream));
    if merged.is_empty() {
        return rx;
    }

    tokio::spawn(async move {
        while let Some(bundle) = merged.next().await {
            if tx.send(bundle).await.is_err() {
                debug!("Merged receiver dropped, discarding remaining inputs");
                break;
            }
        }
    });
    rx
}

/// Merges two receivers into one.
pub fn merge(
    a: mpsc::Receiver<ReceivedBundle>,
    b: mpsc::Receiver<ReceivedBundle>,
) -> mpsc::Receiver<ReceivedBundle> {
    join_receivers([a, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_bpv7::prelude::{
        BlockControlFlags, BundleControlFlags, CanonicalBlock, CreationTimestamp, PrimaryBlock,
    };
    use std::collections::HashMap;

    fn envelope(input: u64, seq: u64) -> ReceivedBundle {
        let bundle = Bundle::new(
            PrimaryBlock::new(
                BundleControlFlags::default(),
                "dtn:sink".parse().unwrap(),
                "dtn:source".parse().unwrap(),
                CreationTimestamp::new(None, seq),
                1_000_000,
            ),
            vec![
                CanonicalBlock::new_bundle_age_block(1, BlockControlFlags::default(), 0),
                CanonicalBlock::new_payload_block(BlockControlFlags::default(), *b"x"),
            ],
        )
        .unwrap();
        ReceivedBundle::new(
            bundle,
            Eid::Ipn {
                node_number: input,
                service_number: 0,
            },
        )
    }

    fn producer(input: u64, count: u64) -> mpsc::Receiver<ReceivedBundle> {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            for seq in 0..count {
                tx.send(envelope(input, seq)).await.unwrap();
            }
        });
        rx
    }

    async fn drain(mut rx: mpsc::Receiver<ReceivedBundle>) -> HashMap<u64, Vec<u64>> {
        let mut seen: HashMap<u64, Vec<u64>> = HashMap::new();
        while let Some(envelope) = rx.recv().await {
            let Eid::Ipn { node_number, .. } = envelope.receiver else {
                panic!("unexpected receiver {}", envelope.receiver);
            };
            seen.entry(node_number)
                .or_default()
                .push(envelope.bundle.primary.timestamp.sequence_number);
        }
        seen
    }

    #[tokio::test]
    async fn merge_two() {
        let seen = drain(merge(producer(1, 1000), producer(2, 4000))).await;

        assert_eq!(seen.values().map(Vec::len).sum::<usize>(), 5000);
        assert_eq!(seen[&1], (0..1000).collect::<Vec<_>>());
        assert_eq!(seen[&2], (0..4000).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn join_many() {
        for (inputs, per_input) in [(1, 100), (3, 250), (16, 64), (64, 10)] {
            let seen = drain(join_receivers(
                (0..inputs).map(|input| producer(input, per_input)),
            ))
            .await;

            assert_eq!(seen.len() as u64, inputs);
            for sequence in seen.values() {
                assert_eq!(*sequence, (0..per_input).collect::<Vec<_>>());
            }
        }
    }

    #[tokio::test]
    async fn join_none() {
        let mut rx = join_receivers(Vec::new());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn early_close() {
        let (closed_tx, closed_rx) = mpsc::channel(1);
        drop(closed_tx);

        let (tx, rx) = mpsc::channel(1);
        let mut merged = merge(closed_rx, rx);

        // The closed input must not end the merged stream
        tokio::task::yield_now().await;
        tx.send(envelope(7, 0)).await.unwrap();
        let envelope = merged.recv().await.unwrap();
        assert_eq!(envelope.bundle.primary.timestamp.sequence_number, 0);

        drop(tx);
        assert!(merged.recv().await.is_none());
    }
}
