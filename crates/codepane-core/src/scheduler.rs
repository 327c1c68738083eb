//! Highlight scheduling: debounce, supersession and stale-result detection.
//!
//! The scheduler is a small, tick-driven state machine. Time is passed in explicitly, so a host
//! can drive it from a real timer (see [`HighlightScheduler::next_deadline`]) and tests can drive
//! it with synthetic instants.
//!
//! ```text
//!            schedule            poll(now >= deadline)        complete(current)
//!   Idle ─────────────▶ Pending ─────────────────────▶ Running ─────────────────▶ Idle
//!                        ▲  │ schedule: timer reset            │ schedule
//!                        └──┘                                  ▼
//!                                                   Running(superseded) + Pending
//! ```
//!
//! Cancelling a pending request is synchronous: its timer is simply replaced and never fires.
//! A running pass cannot be interrupted; it is marked superseded and its completion is reported
//! as [`Completion::Stale`] by generation check.

use crate::highlight::HighlightRequest;
use std::time::{Duration, Instant};

/// Default debounce interval between the last edit and a highlighting pass.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Monotonic identifier of a highlight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A highlighting pass handed out by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightJob {
    /// What to highlight.
    pub request: HighlightRequest,
    /// Generation the result must match to be applied.
    pub generation: Generation,
}

/// Observable scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending or running.
    Idle,
    /// A request is waiting for its debounce deadline.
    Pending,
    /// A pass is in flight and is still current.
    Running,
    /// A pass is in flight but a newer request exists (pending or already due).
    Superseded,
}

/// Result of [`HighlightScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A new pending request was created.
    Scheduled(Generation),
    /// The snapshot equals the latest request; nothing was scheduled.
    Unchanged,
}

/// Result of [`HighlightScheduler::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belongs to the latest request and should be applied.
    Current,
    /// The result raced a newer request and must be discarded.
    Stale,
}

#[derive(Debug, Clone)]
struct PendingRequest {
    request: HighlightRequest,
    generation: Generation,
    deadline: Instant,
}

/// Debouncing scheduler for one buffer.
#[derive(Debug, Clone)]
pub struct HighlightScheduler {
    debounce: Duration,
    generation: Generation,
    pending: Option<PendingRequest>,
    running: Option<Generation>,
    /// Snapshot of the most recent request (pending, running or finished).
    latest: Option<HighlightRequest>,
}

impl HighlightScheduler {
    /// Create a scheduler with the given debounce interval.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            generation: Generation::default(),
            pending: None,
            running: None,
            latest: None,
        }
    }

    /// Debounce interval.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Generation of the latest request.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Returns `true` if `generation` is the latest request.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        match (&self.pending, self.running) {
            (None, None) => SchedulerState::Idle,
            (Some(_), None) => SchedulerState::Pending,
            (None, Some(running)) if self.is_current(running) => SchedulerState::Running,
            _ => SchedulerState::Superseded,
        }
    }

    /// Returns `true` while a request is pending or a pass is in flight.
    pub fn is_busy(&self) -> bool {
        self.state() != SchedulerState::Idle
    }

    /// When the pending request becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Request a debounced pass for `request`.
    pub fn schedule(&mut self, request: HighlightRequest, now: Instant) -> ScheduleOutcome {
        self.schedule_at(request, now + self.debounce)
    }

    /// Request a pass that is due immediately (theme/language change, document load).
    pub fn schedule_now(&mut self, request: HighlightRequest, now: Instant) -> ScheduleOutcome {
        self.schedule_at(request, now)
    }

    fn schedule_at(&mut self, request: HighlightRequest, deadline: Instant) -> ScheduleOutcome {
        if self.latest.as_ref() == Some(&request) {
            if let Some(pending) = &mut self.pending {
                // Same snapshot: never push an already armed timer further out than asked.
                pending.deadline = pending.deadline.min(deadline);
            }
            tracing::trace!(generation = self.generation.0, "Highlight request unchanged");
            return ScheduleOutcome::Unchanged;
        }

        if let Some(cancelled) = self.pending.take() {
            tracing::trace!(generation = cancelled.generation.0, "Cancelled pending highlight");
        }
        if let Some(running) = self.running {
            tracing::trace!(generation = running.0, "Running highlight superseded");
        }

        self.generation = self.generation.next();
        self.latest = Some(request.clone());
        self.pending = Some(PendingRequest {
            request,
            generation: self.generation,
            deadline,
        });
        ScheduleOutcome::Scheduled(self.generation)
    }

    /// Hand out the pending request once its deadline has passed.
    ///
    /// At most one pass is in flight: while a pass is running the pending request waits, even
    /// if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<HighlightJob> {
        if self.running.is_some() {
            return None;
        }
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.running = Some(pending.generation);
        tracing::trace!(generation = pending.generation.0, "Highlight pass started");
        Some(HighlightJob {
            request: pending.request,
            generation: pending.generation,
        })
    }

    /// Report that the pass for `generation` finished.
    pub fn complete(&mut self, generation: Generation) -> Completion {
        if self.running == Some(generation) {
            self.running = None;
        }
        if self.is_current(generation) && self.pending.is_none() {
            Completion::Current
        } else {
            tracing::trace!(
                generation = generation.0,
                current = self.generation.0,
                "Discarding stale highlight result"
            );
            Completion::Stale
        }
    }

    /// Drop pending work and forget the latest snapshot (e.g. a new document was loaded).
    ///
    /// A running pass is not interrupted; bumping the generation makes its result stale.
    pub fn reset(&mut self) {
        self.pending = None;
        self.latest = None;
        self.generation = self.generation.next();
    }
}

impl Default for HighlightScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
