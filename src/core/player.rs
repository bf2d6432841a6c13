//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! A match always has exactly two parties, so player identity is a
//! two-variant enum rather than a numeric id. Which seat is driven by
//! the adaptive opponent is a scheduler concern, not an identity one.
//!
//! ## PlayerPair
//!
//! Per-player data storage backed by a fixed two-slot array with O(1)
//! access, indexable by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two parties in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// The party that acts first.
    First,
    /// The party that acts second.
    Second,
}

impl PlayerId {
    /// Get the opposing party.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::First => PlayerId::Second,
            PlayerId::Second => PlayerId::First,
        }
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::First => 0,
            PlayerId::Second => 1,
        }
    }

    /// Iterate over both player IDs in seat order.
    ///
    /// ```
    /// use tianjibian::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::both().collect();
    /// assert_eq!(players, vec![PlayerId::First, PlayerId::Second]);
    /// ```
    pub fn both() -> impl Iterator<Item = PlayerId> {
        [PlayerId::First, PlayerId::Second].into_iter()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a `[T; 2]` with one entry per party.
///
/// ## Example
///
/// ```
/// use tianjibian::core::{PlayerId, PlayerPair};
///
/// let mut dao: PlayerPair<u32> = PlayerPair::with_value(0);
/// dao[PlayerId::First] = 3;
/// assert_eq!(dao[PlayerId::First], 3);
/// assert_eq!(dao[PlayerId::Second], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create a new pair with values from a factory function.
    ///
    /// The factory receives the `PlayerId` for each slot.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::First), factory(PlayerId::Second)],
        }
    }

    /// Create a new pair with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new pair with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::both().zip(self.data.iter())
    }
}

impl<T> Index<PlayerId> for PlayerPair<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerPair<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::First.opponent(), PlayerId::Second);
        assert_eq!(PlayerId::Second.opponent(), PlayerId::First);
        assert_eq!(PlayerId::First.opponent().opponent(), PlayerId::First);
    }

    #[test]
    fn test_index_and_display() {
        assert_eq!(PlayerId::First.index(), 0);
        assert_eq!(PlayerId::Second.index(), 1);
        assert_eq!(format!("{}", PlayerId::First), "Player 1");
        assert_eq!(format!("{}", PlayerId::Second), "Player 2");
    }

    #[test]
    fn test_pair_new() {
        let pair: PlayerPair<usize> = PlayerPair::new(|p| p.index() * 10);
        assert_eq!(pair[PlayerId::First], 0);
        assert_eq!(pair[PlayerId::Second], 10);
    }

    #[test]
    fn test_pair_mutation() {
        let mut pair: PlayerPair<i32> = PlayerPair::with_value(0);
        pair[PlayerId::First] = 7;
        pair[PlayerId::Second] = -7;
        assert_eq!(pair[PlayerId::First], 7);
        assert_eq!(pair[PlayerId::Second], -7);
    }

    #[test]
    fn test_pair_iter() {
        let pair: PlayerPair<i32> = PlayerPair::new(|p| p.index() as i32);
        let pairs: Vec<_> = pair.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::First, &0), (PlayerId::Second, &1)]);
    }

    #[test]
    fn test_pair_with_default() {
        let pair: PlayerPair<Vec<u8>> = PlayerPair::with_default();
        assert!(pair[PlayerId::First].is_empty());
        assert!(pair[PlayerId::Second].is_empty());
    }

    #[test]
    fn test_serialization() {
        let pair: PlayerPair<i32> = PlayerPair::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&pair).unwrap();
        let deserialized: PlayerPair<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(pair, deserialized);
    }
}
