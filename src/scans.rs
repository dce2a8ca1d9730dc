//! Scan states and the dump indexing derived from them.
//!
//! The archive segments an observation into contiguous scans, each tagged
//! with a pointing state and a target. The per-state dump-index lists are
//! computed once, eagerly, when the observation context is built; they are
//! never recomputed.

use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

use crate::element::ScanElementFactory;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error(
        "Unknown scan state label {0:?}; expected one of \"scan\", \"track\", \"slew\", \"stop\""
    )]
    UnknownState(String),
}

/// What the telescope's pointing was doing during one segment of the
/// observation. This is a closed set; anything else coming out of the
/// archive is an error, not a fifth state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// Scanning across the sky.
    Scan,
    /// Tracking a target.
    Track,
    /// Slewing towards a target.
    Slew,
    /// Not moving, not tracking.
    Stop,
}

impl ScanState {
    pub const ALL: [ScanState; 4] = [
        ScanState::Scan,
        ScanState::Track,
        ScanState::Slew,
        ScanState::Stop,
    ];

    /// The archive's label for this state.
    pub fn label(self) -> &'static str {
        match self {
            ScanState::Scan => "scan",
            ScanState::Track => "track",
            ScanState::Slew => "slew",
            ScanState::Stop => "stop",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ScanState {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<ScanState, ScanError> {
        match s {
            "scan" => Ok(ScanState::Scan),
            "track" => Ok(ScanState::Track),
            "slew" => Ok(ScanState::Slew),
            "stop" => Ok(ScanState::Stop),
            _ => Err(ScanError::UnknownState(s.to_string())),
        }
    }
}

/// One contiguous segment of the observation, as reported by the archive.
/// Created once at load time; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ScanTuple {
    /// The dump indices belonging to this segment, ascending.
    pub dumps: Vec<usize>,
    pub state: ScanState,
    /// The archive's sequence number of this segment.
    pub index: usize,
    /// A free-form descriptor of the target being observed.
    pub target: String,
}

/// The dump indices of every scan state.
#[derive(Debug, Clone, Default)]
pub struct ScanStateIndices {
    scan_dumps: Vec<usize>,
    track_dumps: Vec<usize>,
    slew_dumps: Vec<usize>,
    stop_dumps: Vec<usize>,
}

impl ScanStateIndices {
    /// Aggregates the dumps of all tuples sharing a state, in tuple order,
    /// i.e. ascending in time. A state with no matching tuples gets an
    /// empty list.
    pub fn new(scan_tuples: &[ScanTuple]) -> ScanStateIndices {
        let mut indices = ScanStateIndices::default();
        for tuple in scan_tuples {
            indices
                .dumps_mut(tuple.state)
                .extend_from_slice(&tuple.dumps);
        }
        for state in ScanState::ALL {
            debug!("{} dumps in state {state}", indices.dumps(state).len());
        }
        indices
    }

    pub fn dumps(&self, state: ScanState) -> &[usize] {
        match state {
            ScanState::Scan => &self.scan_dumps,
            ScanState::Track => &self.track_dumps,
            ScanState::Slew => &self.slew_dumps,
            ScanState::Stop => &self.stop_dumps,
        }
    }

    fn dumps_mut(&mut self, state: ScanState) -> &mut Vec<usize> {
        match state {
            ScanState::Scan => &mut self.scan_dumps,
            ScanState::Track => &mut self.track_dumps,
            ScanState::Slew => &mut self.slew_dumps,
            ScanState::Stop => &mut self.stop_dumps,
        }
    }

    /// A factory that views data through `state` only.
    pub fn factory(&self, state: ScanState) -> ScanElementFactory {
        ScanElementFactory::new(self.dumps(state).to_vec())
    }
}
