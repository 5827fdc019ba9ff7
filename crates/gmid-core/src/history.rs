use crate::device::DeviceParameters;
use crate::sweep::SweepResult;

pub const DEFAULT_HISTORY_DEPTH: usize = 4;

/// A retained sweep tagged with the exact parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub params: DeviceParameters,
    pub result: SweepResult,
}

/// Session-scoped result state: the current sweep plus a bounded,
/// most-recent-first ring of superseded sweeps for overlay comparison.
/// No hidden globals; callers own the session and pass it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub current: Option<HistoryEntry>,
    pub history: Vec<HistoryEntry>,
    pub depth: usize,
    pub last_params: Option<DeviceParameters>,
}

impl Session {
    pub fn new(depth: usize) -> Session {
        Session {
            current: None,
            history: Vec::new(),
            depth: depth.max(1),
            last_params: None,
        }
    }

    /// Accept a new successful result as current. The previous current
    /// (if any) moves to the head of history and the tail is truncated
    /// to the configured depth, oldest first.
    ///
    /// An empty result is the "no data" signal and leaves the session
    /// untouched; the return value says whether the commit happened.
    pub fn commit(&mut self, params: DeviceParameters, result: SweepResult) -> bool {
        if result.is_empty() {
            return false;
        }
        if let Some(previous) = self.current.take() {
            self.history.insert(0, previous);
            self.history.truncate(self.depth);
        }
        self.last_params = Some(params.clone());
        self.current = Some(HistoryEntry { params, result });
        true
    }

    /// History entries labeled by recency rank: rank 1 is the most
    /// recently superseded sweep, increasing with age.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, entry)| (index + 1, entry))
    }

    /// Change detection for run-on-change front ends.
    pub fn params_changed(&self, params: &DeviceParameters) -> bool {
        self.last_params.as_ref() != Some(params)
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.history.clear();
        self.last_params = None;
    }
}

pub fn debug_dump_session(session: &Session) {
    println!(
        "session: current={} history={} depth={}",
        session.current.is_some(),
        session.history.len(),
        session.depth
    );
}
