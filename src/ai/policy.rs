//! The adaptive opponent policy.
//!
//! Each turn the policy enumerates the legal actions, scores them with
//! a style-dependent heuristic scaled by learned per-action-kind
//! weights, then either explores (uniform pick with probability
//! `exploration_rate`) or exploits (highest score, ties broken by the
//! fixed priority order).
//!
//! Learning is deliberately small: a sliding FIFO window of the last
//! `memory_size` (action kind, outcome signal) pairs feeds a moving
//! average per kind; weights step toward that average by
//! `learning_rate`. Updates iterate kinds in priority order, so the
//! whole policy is deterministic given a seed.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::config::{AiConfig, LearnCadence, StrategyStyle};
use crate::board::BoardState;
use crate::core::{EngineError, MatchRng, MatchRngState, PlayerId};
use crate::engine::{Action, ActionEngine, ActionKind};

/// Serializable policy memory for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiMemory {
    /// Learned per-kind weights.
    pub weights: Vec<(ActionKind, f64)>,
    /// The sliding outcome window, oldest first.
    pub window: Vec<(ActionKind, f64)>,
    /// Exploration RNG checkpoint.
    pub rng: MatchRngState,
}

/// Chooses actions for the non-human party.
#[derive(Clone, Debug)]
pub struct AiPolicy {
    config: AiConfig,
    weights: FxHashMap<ActionKind, f64>,
    window: VecDeque<(ActionKind, f64)>,
    rng: MatchRng,
}

impl AiPolicy {
    /// Create a policy over its own RNG stream.
    #[must_use]
    pub fn new(config: AiConfig, rng: MatchRng) -> Self {
        Self {
            config,
            weights: FxHashMap::default(),
            window: VecDeque::new(),
            rng,
        }
    }

    /// The tuning in effect.
    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// The learned weight for an action kind (1.0 until trained).
    #[must_use]
    pub fn weight(&self, kind: ActionKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(1.0)
    }

    /// Choose an action for `player`.
    ///
    /// An empty legal-action set is a broken engine invariant (`pass`
    /// is always legal) and surfaces as a fatal error, never a default.
    pub fn choose(
        &mut self,
        engine: &ActionEngine,
        board: &BoardState,
        player: PlayerId,
    ) -> Result<Action, EngineError> {
        let actions = engine.legal_actions(board, player);
        if actions.is_empty() {
            return Err(EngineError::InternalInvariant(
                "legal-action set is empty; pass must always be legal".into(),
            ));
        }

        if self.rng.gen_bool(self.config.exploration_rate) {
            let index = self.rng.gen_range_usize(0..actions.len());
            trace!(player = %player, candidates = actions.len(), "explored");
            return Ok(actions[index]);
        }

        let budget = self.config.thinking_budget.min(actions.len());
        let mut best = actions[0];
        let mut best_score = f64::NEG_INFINITY;
        for &action in &actions[..budget] {
            let score = self.score(engine, board, player, action);
            let better = score > best_score
                || (score == best_score
                    && action.kind().priority_rank() < best.kind().priority_rank());
            if better {
                best = action;
                best_score = score;
            }
        }

        trace!(
            player = %player,
            kind = %best.kind(),
            score = best_score,
            candidates = budget,
            "exploited"
        );
        Ok(best)
    }

    /// Score one candidate: style heuristic times learned weight.
    fn score(
        &self,
        engine: &ActionEngine,
        board: &BoardState,
        player: PlayerId,
        action: Action,
    ) -> f64 {
        let (offense, stability) = self.heuristic(engine, board, player, action);
        let raw = match self.config.style {
            StrategyStyle::Aggressive => 0.8 * offense + 0.2 * stability,
            StrategyStyle::Defensive => 0.2 * offense + 0.8 * stability,
            StrategyStyle::Balanced => 0.5 * offense + 0.5 * stability,
        };
        raw * self.weight(action.kind())
    }

    /// (offense, stability) components of a candidate.
    ///
    /// Offense tracks dao-xing progress and opponent disruption;
    /// stability tracks the health of the player's own balance.
    fn heuristic(
        &self,
        engine: &ActionEngine,
        board: &BoardState,
        player: PlayerId,
        action: Action,
    ) -> (f64, f64) {
        let me = board.player(player);
        let config = engine.config();
        let dao_need = 1.0
            - (me.dao_xing as f64 / config.dao_xing_win_threshold as f64).clamp(0.0, 1.0);
        let disorder = (me.balance.abs() as f64 / config.balance_bound as f64).clamp(0.0, 1.0);

        match action {
            Action::Study => (0.8 + 0.4 * dao_need, 0.2),
            Action::Biangua { .. } => {
                // Rewriting the hexagram is disruption; more so when an
                // opponent card contributes to it.
                let disruption = board
                    .contributors()
                    .map(|((_, outer), (_, inner))| {
                        if outer.owner != player || inner.owner != player {
                            0.3
                        } else {
                            0.0
                        }
                    })
                    .unwrap_or(0.0);
                (0.7 + disruption, 0.1)
            }
            Action::Play { card, position } => {
                let held = me.hand_card(card);
                let resonance = match (held, position.trigram()) {
                    (Some(card), Some(trigram)) if card.trigram == trigram => 0.4,
                    _ => 0.0,
                };
                let settles = held
                    .map(|card| {
                        let next = me.balance + card.balance_shift();
                        if next.abs() < me.balance.abs() {
                            0.4
                        } else {
                            -0.1
                        }
                    })
                    .unwrap_or(0.0);
                (0.3 + resonance, 0.2 + settles)
            }
            Action::Move { .. } => (0.1, 0.2),
            Action::Meditate => (0.0, 0.3 + disorder),
            Action::Divine => (0.05 + 0.1 * dao_need, 0.1),
            Action::Pass => (0.0, 0.0),
        }
    }

    /// Record an observed outcome signal for an applied action.
    pub fn observe(&mut self, kind: ActionKind, signal: f64) {
        if self.config.memory_size == 0 {
            return;
        }
        self.window.push_back((kind, signal));
        while self.window.len() > self.config.memory_size {
            self.window.pop_front();
        }
        if self.config.cadence == LearnCadence::PerTurn {
            self.refresh_weights();
        }
    }

    /// Flush pending learning at the end of a match.
    pub fn finish_match(&mut self) {
        if self.config.cadence == LearnCadence::PerMatch {
            self.refresh_weights();
        }
    }

    /// Step each kind's weight toward its windowed mean signal.
    ///
    /// Kinds update in the fixed priority order for reproducibility.
    fn refresh_weights(&mut self) {
        for kind in ActionKind::PRIORITY {
            let signals: Vec<f64> = self
                .window
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|&(_, s)| s)
                .collect();
            if signals.is_empty() {
                continue;
            }
            let mean = signals.iter().sum::<f64>() / signals.len() as f64;
            let target = 1.0 + mean;
            let current = self.weight(kind);
            let next = current + self.config.learning_rate * (target - current);
            self.weights.insert(kind, next.max(0.0));
        }
    }

    /// Capture memory for persistence.
    #[must_use]
    pub fn memory(&self) -> AiMemory {
        let mut weights: Vec<(ActionKind, f64)> = ActionKind::PRIORITY
            .into_iter()
            .filter_map(|kind| self.weights.get(&kind).map(|&w| (kind, w)))
            .collect();
        weights.shrink_to_fit();
        AiMemory {
            weights,
            window: self.window.iter().copied().collect(),
            rng: self.rng.state(),
        }
    }

    /// Rebuild a policy from saved memory.
    #[must_use]
    pub fn from_memory(config: AiConfig, memory: &AiMemory) -> Self {
        Self {
            config,
            weights: memory.weights.iter().copied().collect(),
            window: memory.window.iter().copied().collect(),
            rng: MatchRng::from_state(&memory.rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::deal_hands;
    use crate::core::MatchConfig;
    use crate::oracle::DivinationOracle;

    fn setup(ai: AiConfig) -> (ActionEngine, BoardState, AiPolicy) {
        let config = MatchConfig::default().with_ai(ai);
        let rng = MatchRng::new(config.seed);
        let oracle = DivinationOracle::new(rng.for_context("divination"), config.yang_bias);
        let board = BoardState::new(
            deal_hands(config.cards_per_player, &mut rng.for_context("deal")),
            config.balance_bound,
        );
        let policy = AiPolicy::new(config.ai, rng.for_context("exploration"));
        (ActionEngine::new(config, oracle), board, policy)
    }

    #[test]
    fn test_zero_exploration_is_deterministic() {
        let ai = AiConfig::default().with_exploration(0.0);
        let (engine, board, mut policy) = setup(ai);

        let first = policy.choose(&engine, &board, PlayerId::Second).unwrap();
        for _ in 0..10 {
            let again = policy.choose(&engine, &board, PlayerId::Second).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_full_exploration_reproduces_with_seed() {
        let ai = AiConfig::default().with_exploration(1.0);
        let (engine_a, board_a, mut policy_a) = setup(ai);
        let (engine_b, board_b, mut policy_b) = setup(ai);

        for _ in 0..20 {
            let a = policy_a.choose(&engine_a, &board_a, PlayerId::Second).unwrap();
            let b = policy_b.choose(&engine_b, &board_b, PlayerId::Second).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_exploit_picks_study_from_fresh_board() {
        // On a fresh board study is legal (balance 0) and carries the
        // top combined score for a balanced style.
        let ai = AiConfig::default().with_exploration(0.0);
        let (engine, board, mut policy) = setup(ai);

        let action = policy.choose(&engine, &board, PlayerId::Second).unwrap();
        assert_eq!(action, Action::Study);
    }

    #[test]
    fn test_styles_can_disagree() {
        // With a heavily disordered balance, a defensive opponent
        // meditates while an aggressive one keeps pushing progress.
        let defensive = AiConfig::default()
            .with_style(StrategyStyle::Defensive)
            .with_exploration(0.0);
        let aggressive = AiConfig::default()
            .with_style(StrategyStyle::Aggressive)
            .with_exploration(0.0);

        let (engine, mut board, mut def_policy) = setup(defensive);
        let (_, _, mut agg_policy) = setup(aggressive);

        // Push the AI seat's balance near the bound.
        board
            .apply(&[crate::board::StateDelta::AdjustBalance {
                player: PlayerId::Second,
                delta: 7,
            }])
            .unwrap();

        let defensive_pick = def_policy.choose(&engine, &board, PlayerId::Second).unwrap();
        let aggressive_pick = agg_policy.choose(&engine, &board, PlayerId::Second).unwrap();

        assert_eq!(defensive_pick, Action::Meditate);
        assert_ne!(aggressive_pick, Action::Meditate);
    }

    #[test]
    fn test_memory_is_bounded_fifo() {
        let ai = AiConfig::default().with_memory(3);
        let (_, _, mut policy) = setup(ai);

        for i in 0..5 {
            policy.observe(ActionKind::Study, i as f64);
        }

        let memory = policy.memory();
        assert_eq!(memory.window.len(), 3);
        // Oldest entries evicted first.
        assert_eq!(memory.window[0].1, 2.0);
        assert_eq!(memory.window[2].1, 4.0);
    }

    #[test]
    fn test_learning_moves_weights() {
        let ai = AiConfig::default().with_learning(0.5);
        let (_, _, mut policy) = setup(ai);

        assert_eq!(policy.weight(ActionKind::Study), 1.0);
        policy.observe(ActionKind::Study, 1.0);
        assert!(policy.weight(ActionKind::Study) > 1.0);

        policy.observe(ActionKind::Divine, -1.0);
        assert!(policy.weight(ActionKind::Divine) < 1.0);
    }

    #[test]
    fn test_zero_memory_disables_learning() {
        let ai = AiConfig::default().with_memory(0);
        let (_, _, mut policy) = setup(ai);

        policy.observe(ActionKind::Study, 5.0);
        assert_eq!(policy.weight(ActionKind::Study), 1.0);
        assert!(policy.memory().window.is_empty());
    }

    #[test]
    fn test_per_match_cadence_defers_updates() {
        let ai = AiConfig {
            cadence: LearnCadence::PerMatch,
            ..AiConfig::default()
        };
        let (_, _, mut policy) = setup(ai);

        policy.observe(ActionKind::Study, 1.0);
        assert_eq!(policy.weight(ActionKind::Study), 1.0);

        policy.finish_match();
        assert!(policy.weight(ActionKind::Study) > 1.0);
    }

    #[test]
    fn test_memory_roundtrip() {
        let ai = AiConfig::default();
        let (engine, board, mut policy) = setup(ai);

        policy.observe(ActionKind::Study, 0.5);
        policy.observe(ActionKind::Play, -0.2);
        let saved = policy.memory();

        let mut restored = AiPolicy::from_memory(ai, &saved);
        assert_eq!(restored.memory(), saved);

        // The restored policy behaves identically.
        let a = policy.choose(&engine, &board, PlayerId::Second).unwrap();
        let b = restored.choose(&engine, &board, PlayerId::Second).unwrap();
        assert_eq!(a, b);
    }
}
