//! The action engine: legality, effects, and termination.
//!
//! One discrete action is validated and applied at a time. Legality is
//! checked up front (`check`, a pure dry-run usable for enumeration);
//! effects are compiled into a delta batch and committed atomically by
//! `BoardState::apply`. A rejected action never mutates state and never
//! consumes a turn.
//!
//! Termination is checked after every applied action: dao-xing reaching
//! the win threshold, balance reaching an extreme, or the turn ceiling.

use smallvec::SmallVec;
use tracing::debug;

use super::action::{Action, ActionNote, ActionRecord};
use super::event::{MatchEvent, StateChange};
use crate::board::{BoardState, Position, StateDelta};
use crate::core::{CostSource, MatchConfig, PlayerId, RejectReason};
use crate::hexagram::{HexagramCatalog, LineSet};
use crate::oracle::DivinationOracle;

/// Why a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TerminationReason {
    /// A player's dao-xing reached the configured win threshold.
    DaoXingThreshold,
    /// A player's balance reached the configured extreme.
    BalanceExtreme,
    /// A player conceded voluntarily.
    Concession,
    /// The configured turn ceiling was reached.
    TurnLimit,
}

/// Terminal outcome of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchResult {
    /// The winning party, or `None` for a draw.
    pub winner: Option<PlayerId>,
    /// What ended the match.
    pub reason: TerminationReason,
}

impl MatchResult {
    /// Check whether a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == Some(player)
    }
}

/// Validates and applies actions against a `BoardState`.
pub struct ActionEngine {
    config: MatchConfig,
    catalog: HexagramCatalog,
    oracle: DivinationOracle,
}

impl ActionEngine {
    /// Create an engine over a validated configuration.
    #[must_use]
    pub fn new(config: MatchConfig, oracle: DivinationOracle) -> Self {
        Self {
            config,
            catalog: HexagramCatalog::new(),
            oracle,
        }
    }

    /// The hexagram catalog.
    #[must_use]
    pub fn catalog(&self) -> &HexagramCatalog {
        &self.catalog
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The oracle, for state capture.
    #[must_use]
    pub fn oracle(&self) -> &DivinationOracle {
        &self.oracle
    }

    // === Legality ===

    /// Dry-run legality check. Pure: no state change, no oracle draw.
    pub fn check(
        &self,
        board: &BoardState,
        player: PlayerId,
        action: Action,
    ) -> Result<(), RejectReason> {
        match action {
            Action::Play { card, position } => {
                let held = board
                    .player(player)
                    .hand_card(card)
                    .ok_or(RejectReason::CardNotInHand { player })?;
                if let Some(occupant) = board.placement(position) {
                    if occupant.owner != player {
                        return Err(RejectReason::PositionOccupiedByOpponent { position });
                    }
                }
                let next = board.player(player).balance + held.balance_shift();
                if next.abs() > self.config.balance_bound {
                    return Err(RejectReason::BalanceOutOfBounds {
                        attempted: next,
                        bound: self.config.balance_bound,
                    });
                }
                Ok(())
            }
            Action::Move { to } => {
                let from = board.player(player).marker;
                if from.adjacent(to) {
                    Ok(())
                } else {
                    Err(RejectReason::NotReachable { from, to })
                }
            }
            Action::Meditate => {
                if board.player(player).balance == 0 {
                    Err(RejectReason::AlreadyBalanced)
                } else {
                    Ok(())
                }
            }
            Action::Study => {
                let balance = board.player(player).balance;
                let threshold = self.config.study_balance_threshold;
                if balance.abs() > threshold {
                    Err(RejectReason::StudyThresholdUnmet { balance, threshold })
                } else {
                    Ok(())
                }
            }
            Action::Pass | Action::Divine => Ok(()),
            Action::Biangua { source, .. } => {
                let Some(((outer, _), (inner, _))) = board.contributors() else {
                    return Err(RejectReason::HexagramUndefined);
                };
                if source != outer && source != inner {
                    return Err(RejectReason::NotContributing { position: source });
                }
                let cost = self.config.biangua_cost;
                match self.config.biangua_cost_source {
                    CostSource::DaoXing => {
                        if board.player(player).dao_xing < cost {
                            return Err(RejectReason::InsufficientResource {
                                resource: "dao-xing",
                                cost,
                            });
                        }
                    }
                    CostSource::Balance => {
                        if (board.player(player).balance - cost).abs() > self.config.balance_bound {
                            return Err(RejectReason::InsufficientResource {
                                resource: "balance",
                                cost,
                            });
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Enumerate every legal action for a player, grouped in fixed
    /// priority order so enumeration is deterministic.
    ///
    /// For biangua only the six single-line transformations per
    /// contributing slot are enumerated; richer changing-line sets stay
    /// available to direct submission.
    #[must_use]
    pub fn legal_actions(&self, board: &BoardState, player: PlayerId) -> Vec<Action> {
        let mut actions = Vec::new();

        if self.check(board, player, Action::Study).is_ok() {
            actions.push(Action::Study);
        }

        if let Some(((outer, _), (inner, _))) = board.contributors() {
            for source in [outer, inner] {
                for index in 0..6 {
                    let action = Action::Biangua {
                        source,
                        changing: LineSet::single(index),
                    };
                    if self.check(board, player, action).is_ok() {
                        actions.push(action);
                    }
                }
            }
        }

        for card in board.player(player).hand() {
            for position in Position::ALL {
                let action = Action::Play {
                    card: card.id,
                    position,
                };
                if self.check(board, player, action).is_ok() {
                    actions.push(action);
                }
            }
        }

        for to in board.player(player).marker.neighbors() {
            let action = Action::Move { to };
            if self.check(board, player, action).is_ok() {
                actions.push(action);
            }
        }

        if self.check(board, player, Action::Meditate).is_ok() {
            actions.push(Action::Meditate);
        }

        actions.push(Action::Divine);
        actions.push(Action::Pass);

        actions
    }

    // === Application ===

    /// Validate and apply one action, returning the emitted event.
    ///
    /// On rejection the board is untouched and the caller keeps the
    /// turn.
    pub fn apply(
        &mut self,
        board: &mut BoardState,
        player: PlayerId,
        action: Action,
    ) -> Result<MatchEvent, RejectReason> {
        self.check(board, player, action)?;

        let turn = board.turn_number();
        let hexagram_before = board.current_hexagram(&self.catalog).map(|h| h.id());
        let mut deltas: SmallVec<[StateDelta; 6]> = SmallVec::new();
        let mut changes: Vec<StateChange> = Vec::new();
        let mut note = ActionNote::None;

        match action {
            Action::Play { card, position } => {
                let held = board
                    .player(player)
                    .hand_card(card)
                    .ok_or(RejectReason::CardNotInHand { player })?;

                if let Some(displaced) = board.placement(position) {
                    deltas.push(StateDelta::RemoveCard { position });
                    changes.push(StateChange::CardDiscarded {
                        card: displaced.id,
                        position,
                    });
                }

                deltas.push(StateDelta::PlaceCard { card, position });
                changes.push(StateChange::CardPlaced { card, position });

                let before = board.player(player).balance;
                let shift = held.balance_shift();
                deltas.push(StateDelta::AdjustBalance {
                    player,
                    delta: shift,
                });
                changes.push(StateChange::BalanceChanged {
                    player,
                    from: before,
                    to: before + shift,
                });

                if position.trigram() == Some(held.trigram) && self.config.resonance_dao_bonus > 0 {
                    let dao = board.player(player).dao_xing;
                    deltas.push(StateDelta::AdjustDaoXing {
                        player,
                        delta: self.config.resonance_dao_bonus,
                    });
                    changes.push(StateChange::DaoXingChanged {
                        player,
                        from: dao,
                        to: dao + self.config.resonance_dao_bonus,
                    });
                }
            }
            Action::Move { to } => {
                let from = board.player(player).marker;
                deltas.push(StateDelta::MoveMarker { player, to });
                changes.push(StateChange::MarkerMoved { player, from, to });
            }
            Action::Meditate => {
                let before = board.player(player).balance;
                let step = self.config.meditate_step.min(before.abs());
                let delta = if before > 0 { -step } else { step };
                deltas.push(StateDelta::AdjustBalance { player, delta });
                changes.push(StateChange::BalanceChanged {
                    player,
                    from: before,
                    to: before + delta,
                });
            }
            Action::Study => {
                let dao = board.player(player).dao_xing;
                deltas.push(StateDelta::AdjustDaoXing { player, delta: 1 });
                changes.push(StateChange::DaoXingChanged {
                    player,
                    from: dao,
                    to: dao + 1,
                });
            }
            Action::Pass => {}
            Action::Biangua { changing, .. } => {
                let Some(((outer_pos, outer_card), (inner_pos, inner_card))) =
                    board.contributors()
                else {
                    return Err(RejectReason::HexagramUndefined);
                };
                let current = self
                    .catalog
                    .by_trigrams(outer_card.trigram, inner_card.trigram);
                let target = self.catalog.transform(current, changing);

                deltas.push(StateDelta::RewriteTrigram {
                    position: outer_pos,
                    trigram: target.upper(),
                });
                changes.push(StateChange::CardTransformed {
                    card: outer_card.id,
                    position: outer_pos,
                });
                deltas.push(StateDelta::RewriteTrigram {
                    position: inner_pos,
                    trigram: target.lower(),
                });
                changes.push(StateChange::CardTransformed {
                    card: inner_card.id,
                    position: inner_pos,
                });

                let cost = self.config.biangua_cost;
                if cost > 0 {
                    match self.config.biangua_cost_source {
                        CostSource::DaoXing => {
                            let dao = board.player(player).dao_xing;
                            deltas.push(StateDelta::AdjustDaoXing {
                                player,
                                delta: -cost,
                            });
                            changes.push(StateChange::DaoXingChanged {
                                player,
                                from: dao,
                                to: dao - cost,
                            });
                        }
                        CostSource::Balance => {
                            let balance = board.player(player).balance;
                            deltas.push(StateDelta::AdjustBalance {
                                player,
                                delta: -cost,
                            });
                            changes.push(StateChange::BalanceChanged {
                                player,
                                from: balance,
                                to: balance - cost,
                            });
                        }
                    }
                }

                note = ActionNote::Transformed {
                    from: current.id(),
                    to: target.id(),
                };
            }
            Action::Divine => {
                let divination = self
                    .oracle
                    .draw(&self.catalog, board.player(player).dao_xing);
                note = ActionNote::Divined(divination);
                changes.push(StateChange::Divined(divination));
            }
        }

        deltas.push(StateDelta::AppendHistory {
            record: ActionRecord::new(player, action, turn, note),
        });
        board.apply(&deltas)?;

        let hexagram_after = board.current_hexagram(&self.catalog).map(|h| h.id());
        if hexagram_before != hexagram_after {
            changes.push(StateChange::HexagramChanged {
                from: hexagram_before,
                to: hexagram_after,
            });
        }

        debug!(
            turn,
            actor = %player,
            kind = %action.kind(),
            change_count = changes.len(),
            "action applied"
        );

        Ok(MatchEvent {
            turn,
            actor: player,
            kind: action.kind(),
            changes,
        })
    }

    // === Termination ===

    /// Check terminal conditions; runs after every applied action.
    #[must_use]
    pub fn check_termination(&self, board: &BoardState) -> Option<MatchResult> {
        for player in PlayerId::both() {
            if board.player(player).dao_xing >= self.config.dao_xing_win_threshold {
                return Some(MatchResult {
                    winner: Some(player),
                    reason: TerminationReason::DaoXingThreshold,
                });
            }
        }

        for player in PlayerId::both() {
            if board.player(player).balance.abs() >= self.config.balance_bound {
                return Some(MatchResult {
                    winner: Some(player.opponent()),
                    reason: TerminationReason::BalanceExtreme,
                });
            }
        }

        if let Some(limit) = self.config.turn_limit {
            if board.turn_number() >= limit {
                let first = board.player(PlayerId::First).dao_xing;
                let second = board.player(PlayerId::Second).dao_xing;
                let winner = match first.cmp(&second) {
                    std::cmp::Ordering::Greater => Some(PlayerId::First),
                    std::cmp::Ordering::Less => Some(PlayerId::Second),
                    std::cmp::Ordering::Equal => None,
                };
                return Some(MatchResult {
                    winner,
                    reason: TerminationReason::TurnLimit,
                });
            }
        }

        None
    }
}
