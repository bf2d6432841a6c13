//! Match snapshots: the persistence record.
//!
//! The core defines which fields a save must carry (board, opponent
//! memory, oracle RNG checkpoint, configuration, and the terminal
//! result if any) and encodes them to an opaque byte blob. Where the
//! blob is stored is the persistence layer's business.

use serde::{Deserialize, Serialize};

use crate::ai::AiMemory;
use crate::board::BoardState;
use crate::core::{EngineError, MatchConfig, MatchRngState};
use crate::engine::MatchResult;

/// Everything needed to resume a match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// The configuration the match started with.
    pub config: MatchConfig,
    /// Full board state including history.
    pub board: BoardState,
    /// Opponent weights, window, and exploration RNG.
    pub ai: AiMemory,
    /// Oracle RNG checkpoint.
    pub oracle: MatchRngState,
    /// Terminal result, if the match already ended.
    pub result: Option<MatchResult>,
}

impl MatchSnapshot {
    /// Encode to an opaque blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        bincode::serialize(self)
            .map_err(|e| EngineError::InternalInvariant(format!("snapshot encode failed: {e}")))
    }

    /// Decode a blob produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        bincode::deserialize(bytes)
            .map_err(|e| EngineError::Configuration(format!("snapshot blob: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::MatchSession;

    #[test]
    fn test_blob_roundtrip() {
        let session = MatchSession::start(MatchConfig::default()).unwrap();
        let snapshot = session.snapshot();

        let bytes = snapshot.to_bytes().unwrap();
        let back = MatchSnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(back.board, snapshot.board);
        assert_eq!(back.ai, snapshot.ai);
        assert_eq!(back.oracle, snapshot.oracle);
        assert_eq!(back.result, snapshot.result);
    }

    #[test]
    fn test_garbage_blob_is_rejected() {
        assert!(matches!(
            MatchSnapshot::from_bytes(&[0xde, 0xad, 0xbe, 0xef]),
            Err(EngineError::Configuration(_))
        ));
    }
}
