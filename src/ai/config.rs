//! Adaptive opponent tuning.

use serde::{Deserialize, Serialize};

use crate::core::{Difficulty, EngineError};

/// Scoring temperament of the opponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyStyle {
    /// Weights dao-xing progress and opponent disruption.
    Aggressive,
    /// Weights own balance stability.
    Defensive,
    /// Averages both.
    #[default]
    Balanced,
}

/// When learned weights are refreshed from the memory window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnCadence {
    /// After every observed outcome.
    #[default]
    PerTurn,
    /// Once, when the match ends.
    PerMatch,
}

/// Adaptive opponent configuration.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    /// Scoring temperament.
    pub style: StrategyStyle,

    /// Probability of picking uniformly among legal actions instead of
    /// the best-scored one. In `[0, 1]`.
    pub exploration_rate: f64,

    /// Step size for weight updates. In `[0, 1]`.
    pub learning_rate: f64,

    /// Sliding-window length of the (action, outcome) memory. Zero
    /// disables learning.
    pub memory_size: usize,

    /// When weights are refreshed.
    pub cadence: LearnCadence,

    /// Maximum candidate actions scored per turn.
    pub thinking_budget: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            style: StrategyStyle::default(),
            exploration_rate: 0.2,
            learning_rate: 0.1,
            memory_size: 32,
            cadence: LearnCadence::default(),
            thinking_budget: 48,
        }
    }
}

impl AiConfig {
    /// Apply a difficulty preset over exploration and thinking budget.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => {
                self.exploration_rate = 0.5;
                self.thinking_budget = 16;
            }
            Difficulty::Normal => {
                self.exploration_rate = 0.2;
                self.thinking_budget = 48;
            }
            Difficulty::Hard => {
                self.exploration_rate = 0.05;
                self.thinking_budget = 128;
            }
        }
        self
    }

    /// Set the scoring temperament.
    #[must_use]
    pub fn with_style(mut self, style: StrategyStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the exploration rate.
    #[must_use]
    pub fn with_exploration(mut self, rate: f64) -> Self {
        self.exploration_rate = rate;
        self
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learning(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Set the memory window length.
    #[must_use]
    pub fn with_memory(mut self, size: usize) -> Self {
        self.memory_size = size;
        self
    }

    /// Validate all tuning ranges.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(EngineError::config_range(
                "exploration_rate",
                format!("{} is outside [0, 1]", self.exploration_rate),
            ));
        }
        if !(0.0..=1.0).contains(&self.learning_rate) {
            return Err(EngineError::config_range(
                "learning_rate",
                format!("{} is outside [0, 1]", self.learning_rate),
            ));
        }
        if self.thinking_budget == 0 {
            return Err(EngineError::config_range(
                "thinking_budget",
                "must evaluate at least one candidate",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_difficulty_presets() {
        let easy = AiConfig::default().with_difficulty(Difficulty::Easy);
        let hard = AiConfig::default().with_difficulty(Difficulty::Hard);

        assert!(easy.exploration_rate > hard.exploration_rate);
        assert!(easy.thinking_budget < hard.thinking_budget);
        assert!(easy.validate().is_ok());
        assert!(hard.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        assert!(AiConfig::default().with_exploration(1.5).validate().is_err());
        assert!(AiConfig::default().with_exploration(-0.1).validate().is_err());
        assert!(AiConfig::default().with_learning(2.0).validate().is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = AiConfig::default()
            .with_style(StrategyStyle::Aggressive)
            .with_exploration(0.0)
            .with_learning(0.3)
            .with_memory(8);

        assert_eq!(config.style, StrategyStyle::Aggressive);
        assert_eq!(config.exploration_rate, 0.0);
        assert_eq!(config.learning_rate, 0.3);
        assert_eq!(config.memory_size, 8);
    }
}
