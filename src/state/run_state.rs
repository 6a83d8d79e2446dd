//! Run phase definitions for a single harvest

use crate::HarvestError;
use std::fmt;

/// Represents the current phase of a harvest run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Run has been created but nothing has been fetched
    NotStarted,

    /// Fetching the first page to discover the page count
    ProbingPageCount,

    /// Fetching and parsing every listing page
    FetchingPages,

    /// Writing the aggregated records to the output file
    Writing,

    /// Output written, run complete
    Done,

    /// An error aborted the run
    Failed,
}

impl RunState {
    /// Returns true if the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns the phase that follows this one on success
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::ProbingPageCount),
            Self::ProbingPageCount => Some(Self::FetchingPages),
            Self::FetchingPages => Some(Self::Writing),
            Self::Writing => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns true if moving from `self` to `to` is allowed
    pub fn can_transition_to(&self, to: RunState) -> bool {
        if to == Self::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::ProbingPageCount => "probing_page_count",
            Self::FetchingPages => "fetching_pages",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the phase of a run and rejects out-of-order transitions
#[derive(Debug)]
pub struct RunTracker {
    state: RunState,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Moves the run to `to`
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::InvalidTransition` if `to` does not directly
    /// follow the current phase.
    pub fn advance(&mut self, to: RunState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!("Run state: {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Marks the run as failed unless it already finished
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!("Run state: {} -> {}", self.state, RunState::Failed);
            self.state = RunState::Failed;
        }
    }
}
