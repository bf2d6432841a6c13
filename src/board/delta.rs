//! State deltas: the single mutation vocabulary for `BoardState`.
//!
//! The action engine never touches fields directly; it compiles an
//! action's effect into a delta batch and hands it to
//! `BoardState::apply`, which validates the whole batch before
//! committing any of it. A rejected batch leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::board::card::CardId;
use crate::board::position::Position;
use crate::core::PlayerId;
use crate::engine::ActionRecord;
use crate::hexagram::Trigram;

/// One atomic unit of board mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateDelta {
    /// Move a card from its owner's hand onto an empty position.
    PlaceCard { card: CardId, position: Position },
    /// Remove the card at a position from the match.
    RemoveCard { position: Position },
    /// Relocate a player's marker.
    MoveMarker { player: PlayerId, to: Position },
    /// Adjust a player's dao-xing; may not take it below zero.
    AdjustDaoXing { player: PlayerId, delta: i64 },
    /// Adjust a player's balance; must stay within the bound.
    AdjustBalance { player: PlayerId, delta: i64 },
    /// Rewrite the trigram carried by a placed card.
    RewriteTrigram { position: Position, trigram: Trigram },
    /// Append an entry to the match history.
    AppendHistory { record: ActionRecord },
}
