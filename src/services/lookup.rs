//! Background media lookups
//!
//! Each lookup runs on its own thread and reports back through a channel
//! that the app polls on every tick. Only the most recent lookup is kept;
//! starting another one or cancelling drops the previous receiver, so a
//! late answer for an experiment the user already left is discarded.

use super::resolver::{MediaResolver, Resolution};
use crate::model::{media_key, ExperimentId, MediaState};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// An outstanding lookup
struct PendingLookup {
    ticket: u64,
    experiment: ExperimentId,
    receiver: Receiver<Resolution>,
    started: Instant,
}

/// Lookup runner owned by the app
pub struct MediaLookup {
    resolver: Arc<dyn MediaResolver>,
    pending: Option<PendingLookup>,
    next_ticket: u64,
}

impl MediaLookup {
    pub fn new(resolver: Arc<dyn MediaResolver>) -> Self {
        Self {
            resolver,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Start resolving media for an experiment, replacing any outstanding lookup
    pub fn spawn(&mut self, experiment: &ExperimentId) -> MediaState {
        self.next_ticket += 1;
        let ticket = self.next_ticket;

        let (tx, rx) = mpsc::channel();
        let resolver = Arc::clone(&self.resolver);
        let id = experiment.clone();
        thread::spawn(move || {
            let resolution = resolver.resolve(&id);
            // Receiver is gone when the lookup went stale
            let _ = tx.send(resolution);
        });

        tracing::debug!(ticket, %experiment, "media lookup started");
        self.pending = Some(PendingLookup {
            ticket,
            experiment: experiment.clone(),
            receiver: rx,
            started: Instant::now(),
        });

        MediaState::Loading {
            key: media_key(experiment),
        }
    }

    /// Drop the outstanding lookup, if any
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(ticket = pending.ticket, experiment = %pending.experiment, "media lookup discarded");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished lookup to `media`. Returns true when `media` changed.
    ///
    /// Results for any experiment other than `current` are dropped.
    pub fn poll(&mut self, current: Option<&ExperimentId>, media: &mut MediaState) -> bool {
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };

        if current != Some(&pending.experiment) {
            self.cancel();
            return false;
        }

        let outcome = match pending.receiver.try_recv() {
            Ok(resolution) => resolution,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!(ticket = pending.ticket, "media lookup worker exited without answer");
                Resolution::NotFound
            }
        };

        tracing::info!(
            ticket = pending.ticket,
            experiment = %pending.experiment,
            found = matches!(outcome, Resolution::Found(_)),
            elapsed_ms = pending.started.elapsed().as_millis() as u64,
            "media lookup finished"
        );

        *media = match outcome {
            Resolution::Found(url) => MediaState::Ready { url },
            Resolution::NotFound => MediaState::NotFound {
                key: media_key(&pending.experiment),
            },
        };
        self.pending = None;
        true
    }
}
