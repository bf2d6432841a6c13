//! Core engine types: players, configuration, errors, RNG.
//!
//! This module contains the building blocks shared by every other layer.
//! Tuning is carried in an explicit `MatchConfig` record rather than any
//! process-wide state.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{CostSource, Difficulty, MatchConfig};
pub use error::{EngineError, RejectReason, Rejection};
pub use player::{PlayerId, PlayerPair};
pub use rng::{MatchRng, MatchRngState};
