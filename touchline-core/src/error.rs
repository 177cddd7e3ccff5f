//! Error taxonomy for trajectory analysis

use crate::model::ActorId;
use thiserror::Error;

/// Errors raised by the analysis stages
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A trajectory violated the caller's contract (empty, unordered, bad rate)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No vehicle sample near the given ball frame
    ///
    /// Recovered by the contact detector, which skips the ball sample.
    #[error("no vehicle samples around frame {frame}")]
    NoCandidates { frame: u32 },

    /// A metadata property did not have the expected shape
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    /// A touch was attributed to an actor nobody drives
    #[error("{0} is not mapped to a player")]
    UnknownActor(ActorId),
}
