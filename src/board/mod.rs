//! Board state: positions, cards, player resources, and the atomic
//! delta-commit mutation primitive.
//!
//! ## Key Types
//!
//! - `Position` / `Realm` / `HexagramGroup`: the eleven board slots
//! - `Card` / `CardId`: trigram-bearing pieces
//! - `PlayerState` / `BoardState`: per-match mutable state
//! - `StateDelta`: the only way state changes

pub mod card;
pub mod delta;
pub mod position;
pub mod state;

pub use card::{deal_hands, Card, CardId};
pub use delta::StateDelta;
pub use position::{HexagramGroup, Position, Realm};
pub use state::{BoardState, PlayerState};
