use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::models::error::EngineError;

/// One item of an engine's output sequence: a per-frame energy level,
/// or the single terminal failure of a session that could not start.
pub type LevelItem = Result<i32, EngineError>;

/// Receiving half of an engine's live level sequence.
///
/// Single producer (the engine's worker thread), strict FIFO in
/// capture/playback frame order, exactly one item per frame. The
/// stream completes when the worker exits — `recv` then returns `None`
/// and the iterator ends. At most one `Err` item is ever delivered,
/// and it is terminal.
///
/// Dropping the stream is unsubscription: the worker notices at its
/// next per-frame emission and winds the session down cooperatively.
///
/// Consumption happens on whatever thread the caller chooses; a UI
/// must drain on (or marshal to) its own main context before
/// rendering.
pub struct LevelStream {
    rx: Receiver<LevelItem>,
}

impl LevelStream {
    pub(crate) fn channel() -> (Sender<LevelItem>, LevelStream) {
        let (tx, rx) = unbounded();
        (tx, LevelStream { rx })
    }

    /// Block until the next item, or `None` once the session has
    /// completed.
    pub fn recv(&self) -> Option<LevelItem> {
        self.rx.recv().ok()
    }

    /// Non-blocking poll. `None` means nothing is pending right now
    /// *or* the stream has completed; use [`recv`](Self::recv) to
    /// distinguish completion.
    pub fn try_recv(&self) -> Option<LevelItem> {
        self.rx.try_recv().ok()
    }
}

impl Iterator for LevelStream {
    type Item = LevelItem;

    fn next(&mut self) -> Option<LevelItem> {
        self.recv()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_when_sender_drops() {
        let (tx, stream) = LevelStream::channel();
        tx.send(Ok(42)).unwrap();
        tx.send(Ok(7)).unwrap();
        drop(tx);

        let items: Vec<LevelItem> = stream.collect();
        assert_eq!(items, vec![Ok(42), Ok(7)]);
    }

    #[test]
    fn dropped_stream_rejects_further_sends() {
        let (tx, stream) = LevelStream::channel();
        drop(stream);
        assert!(tx.send(Ok(1)).is_err());
    }

    #[test]
    fn try_recv_does_not_block() {
        let (tx, stream) = LevelStream::channel();
        assert!(stream.try_recv().is_none());
        tx.send(Ok(3)).unwrap();
        assert_eq!(stream.try_recv(), Some(Ok(3)));
    }
}
