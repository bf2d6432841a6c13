//! Cards: trigram-bearing pieces dealt once at match setup.
//!
//! A card belongs to exactly one player and carries a trigram affinity.
//! It lives in a hand until played to a position, and is never
//! recreated mid-match. A biangua transformation may rewrite the
//! affinity of a placed card in place.

use serde::{Deserialize, Serialize};

use crate::core::{MatchRng, PlayerId, PlayerPair};
use crate::hexagram::{Polarity, Trigram};

/// Unique card identifier within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A trigram-bearing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Match-unique identity.
    pub id: CardId,
    /// The player the card was dealt to.
    pub owner: PlayerId,
    /// The trigram the card currently carries.
    pub trigram: Trigram,
}

impl Card {
    /// How playing this card shifts its owner's yin-yang balance:
    /// +1 for a yang trigram, -1 for a yin trigram.
    #[must_use]
    pub fn balance_shift(self) -> i64 {
        match self.trigram.polarity() {
            Polarity::Yang => 1,
            Polarity::Yin => -1,
        }
    }
}

/// Deal both hands for a new match.
///
/// Each hand cycles through the eight trigrams until `cards_per_player`
/// is reached, then shuffles on the given RNG stream. Card IDs are
/// unique across the match; hand order is draw order.
#[must_use]
pub fn deal_hands(cards_per_player: usize, rng: &mut MatchRng) -> PlayerPair<Vec<Card>> {
    let mut next_id = 0u32;
    let mut deal_one = |owner: PlayerId| -> Vec<Card> {
        let mut hand: Vec<Card> = (0..cards_per_player)
            .map(|n| {
                let card = Card {
                    id: CardId::new(next_id),
                    owner,
                    trigram: Trigram::ALL[n % Trigram::ALL.len()],
                };
                next_id += 1;
                card
            })
            .collect();
        rng.shuffle(&mut hand);
        hand
    };

    let first = deal_one(PlayerId::First);
    let second = deal_one(PlayerId::Second);
    PlayerPair::new(|player| match player {
        PlayerId::First => first.clone(),
        PlayerId::Second => second.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_shift_polarity() {
        let yang = Card {
            id: CardId::new(0),
            owner: PlayerId::First,
            trigram: Trigram::Qian,
        };
        let yin = Card {
            id: CardId::new(1),
            owner: PlayerId::First,
            trigram: Trigram::Kun,
        };
        assert_eq!(yang.balance_shift(), 1);
        assert_eq!(yin.balance_shift(), -1);
    }

    #[test]
    fn test_deal_sizes_and_ownership() {
        let mut rng = MatchRng::new(42);
        let hands = deal_hands(8, &mut rng);

        for player in PlayerId::both() {
            assert_eq!(hands[player].len(), 8);
            assert!(hands[player].iter().all(|c| c.owner == player));
        }
    }

    #[test]
    fn test_deal_ids_unique_across_match() {
        let mut rng = MatchRng::new(42);
        let hands = deal_hands(8, &mut rng);

        let mut ids: Vec<u32> = hands[PlayerId::First]
            .iter()
            .chain(hands[PlayerId::Second].iter())
            .map(|c| c.id.0)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_deal_covers_all_trigrams_at_eight() {
        let mut rng = MatchRng::new(42);
        let hands = deal_hands(8, &mut rng);

        let mut trigrams: Vec<Trigram> =
            hands[PlayerId::First].iter().map(|c| c.trigram).collect();
        trigrams.sort_unstable_by_key(|t| t.value());
        trigrams.dedup();
        assert_eq!(trigrams.len(), 8);
    }

    #[test]
    fn test_deal_is_deterministic() {
        let mut rng1 = MatchRng::new(7);
        let mut rng2 = MatchRng::new(7);
        assert_eq!(deal_hands(8, &mut rng1), deal_hands(8, &mut rng2));
    }
}
