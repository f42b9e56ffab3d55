use crate::NodeKey;
use anyhow::Error;
use log::debug;
use tokio::sync::broadcast;

/// One document mutation record. Mutations are delivered in batches on
/// the host's own scheduling; consumers must stay idempotent under
/// batching and coalescing.
#[derive(Debug, Clone)]
pub enum DomUpdate {
    InsertElement {
        parent: NodeKey,
        node: NodeKey,
        tag: String,
        pos: usize,
    },
    InsertText {
        parent: NodeKey,
        node: NodeKey,
        text: String,
        pos: usize,
    },
    SetAttr {
        node: NodeKey,
        name: String,
        value: String,
    },
    RemoveNode {
        node: NodeKey,
    },
}

/// Observer of the document mutation stream.
pub trait DomSubscriber {
    fn apply_update(&mut self, update: DomUpdate) -> Result<(), Error>;
}

/// Handle on the document's change feed. Dropping it unsubscribes.
pub struct DomFeed {
    receiver: broadcast::Receiver<Vec<DomUpdate>>,
}

impl DomFeed {
    pub(crate) fn new(receiver: broadcast::Receiver<Vec<DomUpdate>>) -> Self {
        Self { receiver }
    }

    /// Drain every pending batch without blocking.
    ///
    /// A lagged receiver skips to the oldest retained batch; a closed
    /// channel ends the stream (the document is gone, so there is
    /// nothing left to observe).
    pub fn drain(&mut self) -> Vec<Vec<DomUpdate>> {
        use tokio::sync::broadcast::error::TryRecvError;
        let mut batches = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => batches.push(batch),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("dom feed lagged, skipped {skipped} batches");
                }
                Err(TryRecvError::Closed) => break,
            }
        }
        batches
    }
}

/// Drain the feed into a subscriber, one record at a time.
pub fn pump_feed(feed: &mut DomFeed, subscriber: &mut impl DomSubscriber) -> Result<(), Error> {
    for batch in feed.drain() {
        for update in batch {
            subscriber.apply_update(update)?;
        }
    }
    Ok(())
}
