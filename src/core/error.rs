//! Error types for the match engine.
//!
//! Two layers:
//! - `RejectReason`: a legality failure. Recoverable, reported to the
//!   caller, consumes no turn and mutates no state.
//! - `EngineError`: everything the engine surface can return, including
//!   rejections, post-termination submissions, configuration failures,
//!   and fatal consistency violations.

use thiserror::Error;

use super::player::PlayerId;
use crate::board::Position;
use crate::engine::ActionKind;

/// Why an action was refused.
///
/// A rejected action does not consume the active player's turn; the
/// same player may retry with a different action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The card is not in the acting player's hand.
    #[error("card is not in {player}'s hand")]
    CardNotInHand { player: PlayerId },

    /// The target position already holds an opponent card.
    #[error("{position} is occupied by the opponent")]
    PositionOccupiedByOpponent { position: Position },

    /// The target position is not reachable from the marker's position.
    #[error("{to} is not reachable from {from}")]
    NotReachable { from: Position, to: Position },

    /// Balance is already at equilibrium; meditation has nothing to adjust.
    #[error("yin-yang balance is already at equilibrium")]
    AlreadyBalanced,

    /// Applying the effect would push balance outside the configured bound.
    #[error("balance {attempted} is outside the bound of +/-{bound}")]
    BalanceOutOfBounds { attempted: i64, bound: i64 },

    /// Study requires balance within the configured threshold.
    #[error("balance {balance} exceeds the study threshold {threshold}")]
    StudyThresholdUnmet { balance: i64, threshold: i64 },

    /// No hexagram is currently derivable from the board.
    #[error("no hexagram is in play")]
    HexagramUndefined,

    /// The named position does not hold a hexagram-contributing card.
    #[error("{position} does not contribute to the hexagram in play")]
    NotContributing { position: Position },

    /// The acting player cannot pay the configured transformation cost.
    #[error("insufficient {resource} to pay a cost of {cost}")]
    InsufficientResource { resource: &'static str, cost: i64 },

    /// Dao-xing may not drop below zero.
    #[error("dao-xing cannot go below zero")]
    DaoXingUnderflow,

    /// The submitting player is not the active player.
    #[error("it is not {player}'s turn")]
    OutOfTurn { player: PlayerId },

    /// The per-turn action budget is spent.
    #[error("{player} has no action remaining this turn")]
    NoActionBudget { player: PlayerId },
}

/// All errors returned by the engine surface.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Malformed line or trigram data. Fatal to catalog construction;
    /// never expected at runtime once the catalog validates at startup.
    #[error("invalid hexagram specification: {0}")]
    InvalidHexagramSpec(String),

    /// Legality failure. Recoverable; no state change, no turn consumed.
    #[error("action rejected: {0}")]
    ActionRejected(#[from] RejectReason),

    /// An action was submitted after the match terminated.
    #[error("the match is already over")]
    MatchAlreadyOver,

    /// Out-of-range tuning value. Fails fast at match start.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A consistency guarantee was broken. Fatal, never defaulted over.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl EngineError {
    /// Build a configuration error for an out-of-range field.
    pub(crate) fn config_range(field: &str, detail: impl std::fmt::Display) -> Self {
        EngineError::Configuration(format!("{field}: {detail}"))
    }
}

/// Marker carried on rejections so callers can tell which action failed
/// without re-parsing the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Which action kind was attempted.
    pub kind: ActionKind,
    /// Why it was refused.
    pub reason: RejectReason,
}
