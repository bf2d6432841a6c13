//! Match configuration.
//!
//! All tuning lives in an explicit `MatchConfig` record passed into
//! `MatchSession::start`, never read from process-wide state. Numeric
//! costs and thresholds are tunables with defaults, validated fail-fast
//! before the first turn.

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::player::PlayerId;
use crate::ai::AiConfig;

/// Which resource pays the hexagram-transformation cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostSource {
    /// Spend dao-xing (rejected if it would go below zero).
    #[default]
    DaoXing,
    /// Spend yin-yang balance (shifts toward yin; rejected at the bound).
    Balance,
}

/// Coarse difficulty presets for the adaptive opponent.
///
/// A preset only seeds the AI tuning; individual fields can still be
/// overridden afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Wide exploration, shallow candidate evaluation.
    Easy,
    /// Moderate exploration.
    #[default]
    Normal,
    /// Near-greedy play, full candidate evaluation.
    Hard,
}

/// Complete match configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for every random stream in the match (deal, oracle, AI).
    pub seed: u64,

    /// Yin-yang balance is confined to `[-balance_bound, balance_bound]`.
    /// Reaching either end terminates the match.
    pub balance_bound: i64,

    /// Dao-xing level at which a player wins.
    pub dao_xing_win_threshold: i64,

    /// Hard ceiling on turn count. `None` disables the limit.
    pub turn_limit: Option<u32>,

    /// How far one meditation moves balance toward equilibrium.
    pub meditate_step: i64,

    /// Study requires `|balance| <= study_balance_threshold`.
    pub study_balance_threshold: i64,

    /// Units charged for a hexagram transformation.
    pub biangua_cost: i64,

    /// Resource the transformation cost is paid from.
    pub biangua_cost_source: CostSource,

    /// Dao-xing granted for playing a card onto the bagua position
    /// bound to the card's own trigram.
    pub resonance_dao_bonus: i64,

    /// Cards dealt to each hand at match start.
    pub cards_per_player: usize,

    /// Probability that a divined line comes up yang.
    pub yang_bias: f64,

    /// Which seat the adaptive opponent occupies.
    pub ai_seat: PlayerId,

    /// Adaptive opponent tuning.
    pub ai: AiConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            balance_bound: 8,
            dao_xing_win_threshold: 25,
            turn_limit: Some(100),
            meditate_step: 2,
            study_balance_threshold: 2,
            biangua_cost: 1,
            biangua_cost_source: CostSource::default(),
            resonance_dao_bonus: 1,
            cards_per_player: 8,
            yang_bias: 0.5,
            ai_seat: PlayerId::Second,
            ai: AiConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Create a config with the given seed and defaults elsewhere.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the difficulty preset (adjusts AI exploration and budget).
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.ai = self.ai.with_difficulty(difficulty);
        self
    }

    /// Set the yin-yang balance bound.
    #[must_use]
    pub fn with_balance_bound(mut self, bound: i64) -> Self {
        self.balance_bound = bound;
        self
    }

    /// Set the dao-xing win threshold.
    #[must_use]
    pub fn with_win_threshold(mut self, threshold: i64) -> Self {
        self.dao_xing_win_threshold = threshold;
        self
    }

    /// Set or clear the turn limit.
    #[must_use]
    pub fn with_turn_limit(mut self, limit: Option<u32>) -> Self {
        self.turn_limit = limit;
        self
    }

    /// Set the transformation cost and the resource it is paid from.
    #[must_use]
    pub fn with_biangua_cost(mut self, cost: i64, source: CostSource) -> Self {
        self.biangua_cost = cost;
        self.biangua_cost_source = source;
        self
    }

    /// Set the adaptive opponent tuning.
    #[must_use]
    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    /// Validate every tunable, failing fast on the first violation.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.balance_bound <= 0 {
            return Err(EngineError::config_range(
                "balance_bound",
                format!("{} must be positive", self.balance_bound),
            ));
        }
        if self.dao_xing_win_threshold <= 0 {
            return Err(EngineError::config_range(
                "dao_xing_win_threshold",
                format!("{} must be positive", self.dao_xing_win_threshold),
            ));
        }
        if self.meditate_step <= 0 {
            return Err(EngineError::config_range(
                "meditate_step",
                format!("{} must be positive", self.meditate_step),
            ));
        }
        if self.study_balance_threshold < 0 {
            return Err(EngineError::config_range(
                "study_balance_threshold",
                format!("{} must be non-negative", self.study_balance_threshold),
            ));
        }
        if self.biangua_cost < 0 {
            return Err(EngineError::config_range(
                "biangua_cost",
                format!("{} must be non-negative", self.biangua_cost),
            ));
        }
        if self.resonance_dao_bonus < 0 {
            return Err(EngineError::config_range(
                "resonance_dao_bonus",
                format!("{} must be non-negative", self.resonance_dao_bonus),
            ));
        }
        if self.cards_per_player == 0 {
            return Err(EngineError::config_range(
                "cards_per_player",
                "must deal at least one card",
            ));
        }
        if !(0.0..=1.0).contains(&self.yang_bias) {
            return Err(EngineError::config_range(
                "yang_bias",
                format!("{} is outside [0, 1]", self.yang_bias),
            ));
        }
        if self.turn_limit == Some(0) {
            return Err(EngineError::config_range(
                "turn_limit",
                "a zero-turn match can never start",
            ));
        }
        self.ai.validate()
    }
}
