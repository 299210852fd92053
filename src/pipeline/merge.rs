//! Fan-in of producer streams.

use std::sync::mpsc::{sync_channel, Receiver};
use std::thread::{self, JoinHandle};
use tracing::trace;

/// A merged stream plus the forwarding threads feeding it.
pub struct Merged<T> {
    pub receiver: Receiver<T>,
    pub forwarders: Vec<JoinHandle<()>>,
}

/// Merge `streams` into a single receiver.
///
/// One forwarder thread per input moves records onto a shared bounded
/// channel of `capacity` slots (0 = rendezvous). Each forwarder owns a clone
/// of the sender, so the merged receiver disconnects only after every input
/// has been drained and closed. Records from one input keep their order; no
/// order is imposed across inputs.
///
/// A forwarder stops early if the merged receiver is dropped.
pub fn merge<T: Send + 'static>(streams: Vec<Receiver<T>>, capacity: usize) -> Merged<T> {
    let (sender, receiver) = sync_channel(capacity);
    let forwarders = streams
        .into_iter()
        .enumerate()
        .map(|(index, stream)| {
            let sender = sender.clone();
            thread::spawn(move || {
                let mut forwarded = 0usize;
                for item in stream {
                    if sender.send(item).is_err() {
                        trace!(stream = index, "merged receiver dropped, forwarder exiting");
                        return;
                    }
                    forwarded += 1;
                }
                trace!(stream = index, forwarded, "producer stream drained");
            })
        })
        .collect();
    // Only the forwarders' clones keep the channel open from here on.
    drop(sender);

    Merged {
        receiver,
        forwarders,
    }
}
