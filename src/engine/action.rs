//! Action representation and history records.
//!
//! Actions are concrete verbs rather than opaque templates: the seven
//! kinds the rules understand, each carrying the data its legality
//! check needs. `ActionRecord` is the append-only history entry and the
//! single source of truth for history queries and opponent memory.

use serde::{Deserialize, Serialize};

use crate::board::{CardId, Position};
use crate::core::PlayerId;
use crate::hexagram::{HexagramId, LineSet};
use crate::oracle::Divination;

/// A complete game action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Place a card from hand onto a position.
    Play { card: CardId, position: Position },
    /// Step the player's marker to an adjacent position.
    Move { to: Position },
    /// Shift yin-yang balance one step toward equilibrium.
    Meditate,
    /// Convert settled balance into dao-xing progress.
    Study,
    /// Do nothing; the turn is spent.
    Pass,
    /// Transform the hexagram in play by flipping the chosen lines.
    Biangua { source: Position, changing: LineSet },
    /// Consult the oracle for a hexagram draw.
    Divine,
}

impl Action {
    /// The kind of this action.
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Action::Play { .. } => ActionKind::Play,
            Action::Move { .. } => ActionKind::Move,
            Action::Meditate => ActionKind::Meditate,
            Action::Study => ActionKind::Study,
            Action::Pass => ActionKind::Pass,
            Action::Biangua { .. } => ActionKind::Biangua,
            Action::Divine => ActionKind::Divine,
        }
    }
}

/// The seven action kinds, used for scoring weights and tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Play,
    Move,
    Meditate,
    Study,
    Pass,
    Biangua,
    Divine,
}

impl ActionKind {
    /// Fixed exploitation tie-break order, best first.
    pub const PRIORITY: [ActionKind; 7] = [
        ActionKind::Study,
        ActionKind::Biangua,
        ActionKind::Play,
        ActionKind::Move,
        ActionKind::Meditate,
        ActionKind::Divine,
        ActionKind::Pass,
    ];

    /// Position in the tie-break order (0 = highest priority).
    #[must_use]
    pub fn priority_rank(self) -> usize {
        // PRIORITY covers every kind.
        Self::PRIORITY.iter().position(|&k| k == self).unwrap_or(usize::MAX)
    }

    /// Lowercase verb name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Play => "play",
            ActionKind::Move => "move",
            ActionKind::Meditate => "meditate",
            ActionKind::Study => "study",
            ActionKind::Pass => "pass",
            ActionKind::Biangua => "biangua",
            ActionKind::Divine => "divine",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra payload an applied action leaves in its history record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionNote {
    /// Nothing beyond the action itself.
    #[default]
    None,
    /// A divination outcome.
    Divined(Divination),
    /// A completed transformation.
    Transformed { from: HexagramId, to: HexagramId },
}

/// A recorded, applied action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,
    /// The action taken.
    pub action: Action,
    /// Turn number when the action was applied.
    pub turn: u32,
    /// Outcome payload, if the action produced one.
    pub note: ActionNote,
}

impl ActionRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, note: ActionNote) -> Self {
        Self {
            player,
            action,
            turn,
            note,
        }
    }
}
