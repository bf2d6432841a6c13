//! Per-match board state.
//!
//! ## PlayerState
//!
//! Dao-xing progress, bounded yin-yang balance, the hand (draw order),
//! the marker position, and the per-turn action budget.
//!
//! ## BoardState
//!
//! Both player states, the eleven-slot placement map, and the
//! append-only action history. The hexagram in play is always derived
//! from the placements, never stored, so it can never go stale.
//!
//! All mutation funnels through `apply`, which stages the delta batch
//! on a copy and swaps it in only if every delta validates: a rejected
//! action leaves the state bit-for-bit unchanged.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use super::delta::StateDelta;
use super::position::{HexagramGroup, Position, Realm};
use crate::core::{PlayerId, PlayerPair, RejectReason};
use crate::engine::ActionRecord;
use crate::hexagram::{Hexagram, HexagramCatalog};

/// One party's resources and holdings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cultivation progress. Non-negative; only explicit costs lower it.
    pub dao_xing: i64,
    /// Yin-yang balance in `[-bound, bound]`.
    pub balance: i64,
    /// Cards in hand, in draw order.
    hand: Vec<Card>,
    /// Where the player's marker stands.
    pub marker: Position,
    /// Actions left this turn.
    pub actions_remaining: u32,
}

impl PlayerState {
    fn new(hand: Vec<Card>) -> Self {
        Self {
            dao_xing: 0,
            balance: 0,
            hand,
            marker: Position::Realm(Realm::Earth),
            actions_remaining: 1,
        }
    }

    /// Cards in hand, in draw order.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Find a held card by id.
    #[must_use]
    pub fn hand_card(&self, id: CardId) -> Option<Card> {
        self.hand.iter().copied().find(|c| c.id == id)
    }
}

/// The full mutable state of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    players: PlayerPair<PlayerState>,
    placements: FxHashMap<Position, Card>,
    history: Vector<ActionRecord>,
    turn_number: u32,
    active_player: PlayerId,
    balance_bound: i64,
}

impl BoardState {
    /// Create the state for a fresh match: full hands, empty board,
    /// both markers in the earth realm, Player 1 to act.
    #[must_use]
    pub fn new(hands: PlayerPair<Vec<Card>>, balance_bound: i64) -> Self {
        Self {
            players: PlayerPair::new(|p| PlayerState::new(hands[p].clone())),
            placements: FxHashMap::default(),
            history: Vector::new(),
            turn_number: 1,
            active_player: PlayerId::First,
            balance_bound,
        }
    }

    // === Read accessors ===

    /// A player's state.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    /// The card at a position, if any.
    #[must_use]
    pub fn placement(&self, position: Position) -> Option<Card> {
        self.placements.get(&position).copied()
    }

    /// Iterate occupied positions.
    pub fn placements(&self) -> impl Iterator<Item = (Position, Card)> + '_ {
        self.placements.iter().map(|(&p, &c)| (p, c))
    }

    /// The append-only action history.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Current turn number (1-based; one player action per turn).
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// The configured balance bound.
    #[must_use]
    pub fn balance_bound(&self) -> i64 {
        self.balance_bound
    }

    /// The two hexagram-contributing placements, when the board has
    /// exactly one card in the outer group and one in the inner group.
    #[must_use]
    pub fn contributors(&self) -> Option<((Position, Card), (Position, Card))> {
        let mut outer = None;
        let mut inner = None;

        for (position, card) in self.placements() {
            match position.hexagram_group() {
                Some(HexagramGroup::Outer) => {
                    if outer.replace((position, card)).is_some() {
                        return None;
                    }
                }
                Some(HexagramGroup::Inner) => {
                    if inner.replace((position, card)).is_some() {
                        return None;
                    }
                }
                None => {}
            }
        }

        Some((outer?, inner?))
    }

    /// The hexagram in play, derived from the contributing cards.
    ///
    /// Undefined unless exactly one card occupies each group.
    #[must_use]
    pub fn current_hexagram(&self, catalog: &HexagramCatalog) -> Option<Hexagram> {
        let ((_, outer_card), (_, inner_card)) = self.contributors()?;
        Some(catalog.by_trigrams(outer_card.trigram, inner_card.trigram))
    }

    // === Mutation ===

    /// Apply a delta batch atomically.
    ///
    /// The batch is staged on a copy; any invariant violation rejects
    /// the whole batch and leaves `self` unchanged.
    pub fn apply(&mut self, deltas: &[StateDelta]) -> Result<(), RejectReason> {
        let mut staged = self.clone();
        for delta in deltas {
            staged.apply_one(*delta)?;
        }
        *self = staged;
        Ok(())
    }

    fn apply_one(&mut self, delta: StateDelta) -> Result<(), RejectReason> {
        match delta {
            StateDelta::PlaceCard { card, position } => {
                if self.placement(position).is_some() {
                    return Err(RejectReason::PositionOccupiedByOpponent { position });
                }
                let owner = self.card_owner(card)?;
                let hand = &mut self.players[owner].hand;
                // Checked by card_owner above.
                let index = hand
                    .iter()
                    .position(|c| c.id == card)
                    .ok_or(RejectReason::CardNotInHand { player: owner })?;
                let card = hand.remove(index);
                self.placements.insert(position, card);
                Ok(())
            }
            StateDelta::RemoveCard { position } => {
                self.placements
                    .remove(&position)
                    .map(|_| ())
                    .ok_or(RejectReason::NotContributing { position })
            }
            StateDelta::MoveMarker { player, to } => {
                self.players[player].marker = to;
                Ok(())
            }
            StateDelta::AdjustDaoXing { player, delta } => {
                let next = self.players[player].dao_xing + delta;
                if next < 0 {
                    return Err(RejectReason::DaoXingUnderflow);
                }
                self.players[player].dao_xing = next;
                Ok(())
            }
            StateDelta::AdjustBalance { player, delta } => {
                let next = self.players[player].balance + delta;
                if next.abs() > self.balance_bound {
                    return Err(RejectReason::BalanceOutOfBounds {
                        attempted: next,
                        bound: self.balance_bound,
                    });
                }
                self.players[player].balance = next;
                Ok(())
            }
            StateDelta::RewriteTrigram { position, trigram } => {
                match self.placements.get_mut(&position) {
                    Some(card) => {
                        card.trigram = trigram;
                        Ok(())
                    }
                    None => Err(RejectReason::NotContributing { position }),
                }
            }
            StateDelta::AppendHistory { record } => {
                self.history.push_back(record);
                Ok(())
            }
        }
    }

    fn card_owner(&self, card: CardId) -> Result<PlayerId, RejectReason> {
        for player in PlayerId::both() {
            if self.players[player].hand_card(card).is_some() {
                return Ok(player);
            }
        }
        Err(RejectReason::CardNotInHand {
            player: self.active_player,
        })
    }

    /// Spend the active player's action for this turn.
    pub(crate) fn spend_action(&mut self) {
        let active = self.active_player;
        self.players[active].actions_remaining =
            self.players[active].actions_remaining.saturating_sub(1);
    }

    /// Hand the turn to the other player and refresh their budget.
    pub(crate) fn advance_turn(&mut self) {
        self.active_player = self.active_player.opponent();
        self.turn_number += 1;
        let active = self.active_player;
        self.players[active].actions_remaining = 1;
    }
}
