//! Snapshot-based undo/redo.
//!
//! History is raster-only: every completed mutation pushes a PNG of the whole
//! surface. Undo and redo move snapshots between two stacks and hand back the
//! snapshot to repaint; repaints are identified by a [`RedrawTicket`] so late
//! decodes can be recognized and dropped.

mod decoder;
mod snapshot;

pub use decoder::{DecodeCompletion, SnapshotDecoder};
pub use snapshot::{DecodedImage, HistorySnapshot};

use std::fmt;

/// Identifies one redraw request. Later requests carry larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RedrawTicket(pub u64);

impl fmt::Display for RedrawTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Linear two-stack history.
///
/// The undo stack always holds at least the initial snapshot, and its top is
/// the state currently shown.
#[derive(Debug)]
pub struct HistoryManager {
    undo_stack: Vec<HistorySnapshot>,
    redo_stack: Vec<HistorySnapshot>,
    max_snapshots: usize,
    last_ticket: u64,
}

impl HistoryManager {
    /// Starts history from `initial`. A `max_snapshots` of 0 means unbounded.
    pub fn new(initial: HistorySnapshot, max_snapshots: usize) -> Self {
        Self {
            undo_stack: vec![initial],
            redo_stack: Vec::new(),
            max_snapshots,
            last_ticket: 0,
        }
    }

    /// Records a completed mutation and forgets anything that was undone.
    pub fn push(&mut self, snapshot: HistorySnapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();

        if self.max_snapshots > 0 && self.undo_stack.len() > self.max_snapshots {
            let excess = self.undo_stack.len() - self.max_snapshots.max(1);
            self.undo_stack.drain(..excess);
            log::debug!("History capped at {} snapshots", self.max_snapshots);
        }
    }

    /// Steps back one state, returning the snapshot to repaint.
    ///
    /// The initial state can't be undone; at the floor this returns `None`
    /// and changes nothing.
    pub fn undo(&mut self) -> Option<HistorySnapshot> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let undone = self.undo_stack.pop()?;
        self.redo_stack.push(undone);
        self.undo_stack.last().cloned()
    }

    /// Re-applies the most recently undone state.
    pub fn redo(&mut self) -> Option<HistorySnapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(snapshot.clone());
        Some(snapshot)
    }

    /// The snapshot matching what should be on screen.
    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.undo_stack.last()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Issues the ticket for a new redraw request.
    pub fn next_ticket(&mut self) -> RedrawTicket {
        self.last_ticket += 1;
        RedrawTicket(self.last_ticket)
    }

    /// The most recently issued ticket.
    pub fn latest_ticket(&self) -> RedrawTicket {
        RedrawTicket(self.last_ticket)
    }
}
