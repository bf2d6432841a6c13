//! Structured match events for the observability layer.
//!
//! The core emits one `MatchEvent` per applied action: who acted, what
//! they did, and the state changes that resulted. These are plain data
//! records; formatting and output belong to the host. Each event is
//! also mirrored as a `tracing` debug event at the emission site.

use serde::{Deserialize, Serialize};

use super::action::ActionKind;
use crate::board::{CardId, Position};
use crate::core::PlayerId;
use crate::hexagram::HexagramId;
use crate::oracle::Divination;

/// One observable consequence of an applied action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// A card left a hand for a position.
    CardPlaced { card: CardId, position: Position },
    /// A card left the match.
    CardDiscarded { card: CardId, position: Position },
    /// A card's trigram was rewritten in place.
    CardTransformed { card: CardId, position: Position },
    /// A marker stepped between positions.
    MarkerMoved {
        player: PlayerId,
        from: Position,
        to: Position,
    },
    /// Dao-xing changed.
    DaoXingChanged { player: PlayerId, from: i64, to: i64 },
    /// Balance changed.
    BalanceChanged { player: PlayerId, from: i64, to: i64 },
    /// The hexagram in play changed.
    HexagramChanged {
        from: Option<HexagramId>,
        to: Option<HexagramId>,
    },
    /// The oracle produced a reading.
    Divined(Divination),
}

/// The record emitted for every applied action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Turn the action was applied on.
    pub turn: u32,
    /// Who acted.
    pub actor: PlayerId,
    /// What kind of action.
    pub kind: ActionKind,
    /// Everything that changed, in application order.
    pub changes: Vec<StateChange>,
}
