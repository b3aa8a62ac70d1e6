use super::snapshot::{DecodedImage, HistorySnapshot};
use super::RedrawTicket;
use crate::draw::SurfaceError;
use tokio::sync::mpsc;

/// Result of one asynchronous snapshot decode.
#[derive(Debug)]
pub struct DecodeCompletion {
    pub ticket: RedrawTicket,
    pub result: Result<DecodedImage, SurfaceError>,
}

/// Decodes history snapshots off the drawing thread.
///
/// Each request runs on the runtime's blocking pool and replies on a channel
/// owned by the decoder; completions arrive in whatever order the decodes
/// finish, so callers match them against the ticket they are waiting for.
pub struct SnapshotDecoder {
    runtime: tokio::runtime::Handle,
    completion_tx: mpsc::UnboundedSender<DecodeCompletion>,
    completion_rx: mpsc::UnboundedReceiver<DecodeCompletion>,
}

impl SnapshotDecoder {
    pub fn new(runtime: &tokio::runtime::Handle) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            runtime: runtime.clone(),
            completion_tx,
            completion_rx,
        }
    }

    /// Starts decoding `snapshot`; the completion carries `ticket`.
    pub fn request(&self, ticket: RedrawTicket, snapshot: HistorySnapshot) {
        let tx = self.completion_tx.clone();
        self.runtime.spawn_blocking(move || {
            let result = DecodedImage::decode(snapshot.as_bytes());
            if tx.send(DecodeCompletion { ticket, result }).is_err() {
                log::debug!("Decoder dropped before redraw {ticket} finished");
            }
        });
    }

    /// Returns a finished decode without waiting, if any.
    pub fn try_next(&mut self) -> Option<DecodeCompletion> {
        self.completion_rx.try_recv().ok()
    }

    /// Waits for the next finished decode.
    ///
    /// The decoder keeps a sender of its own, so this only returns `None`
    /// if the channel has been closed.
    pub async fn next(&mut self) -> Option<DecodeCompletion> {
        self.completion_rx.recv().await
    }
}

impl std::fmt::Debug for SnapshotDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotDecoder").finish_non_exhaustive()
    }
}
