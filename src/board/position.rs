//! Board positions: eight bagua slots and the three realms.
//!
//! ## Adjacency
//!
//! Marker movement follows a fixed graph:
//! - two bagua positions connect iff their trigrams differ in exactly
//!   one line;
//! - the realms chain earth ↔ human ↔ heaven;
//! - heaven connects to the qian slot, earth to the kun slot, and the
//!   human realm to the six mixed slots.
//!
//! ## Hexagram groups
//!
//! Bagua slots split by trigram polarity into the outer (yang) and
//! inner (yin) groups; the hexagram in play draws its upper trigram
//! from the card in the outer group and its lower from the inner group.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::hexagram::{Polarity, Trigram};

/// One of the three vertical realms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Realm {
    Earth,
    Human,
    Heaven,
}

impl Realm {
    /// All three realms, bottom-up.
    pub const ALL: [Realm; 3] = [Realm::Earth, Realm::Human, Realm::Heaven];

    /// Pinyin-free display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Realm::Earth => "earth",
            Realm::Human => "human",
            Realm::Heaven => "heaven",
        }
    }
}

/// Which half of the hexagram a bagua slot feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexagramGroup {
    /// Yang-polarity slots; contribute the upper trigram.
    Outer,
    /// Yin-polarity slots; contribute the lower trigram.
    Inner,
}

/// An addressable board slot: one of the 8 bagua positions or one of
/// the 3 realm positions. Holds at most one placed card; empty is a
/// valid state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// A trigram-bound slot.
    Bagua(Trigram),
    /// A realm slot.
    Realm(Realm),
}

impl Position {
    /// All eleven positions: the eight bagua slots in trigram order,
    /// then the three realms.
    pub const ALL: [Position; 11] = [
        Position::Bagua(Trigram::Kun),
        Position::Bagua(Trigram::Zhen),
        Position::Bagua(Trigram::Kan),
        Position::Bagua(Trigram::Dui),
        Position::Bagua(Trigram::Gen),
        Position::Bagua(Trigram::Li),
        Position::Bagua(Trigram::Xun),
        Position::Bagua(Trigram::Qian),
        Position::Realm(Realm::Earth),
        Position::Realm(Realm::Human),
        Position::Realm(Realm::Heaven),
    ];

    /// The innate trigram of a bagua slot.
    #[must_use]
    pub const fn trigram(self) -> Option<Trigram> {
        match self {
            Position::Bagua(trigram) => Some(trigram),
            Position::Realm(_) => None,
        }
    }

    /// Which hexagram half this slot feeds. `None` for realms.
    #[must_use]
    pub fn hexagram_group(self) -> Option<HexagramGroup> {
        match self {
            Position::Bagua(trigram) => Some(match trigram.polarity() {
                Polarity::Yang => HexagramGroup::Outer,
                Polarity::Yin => HexagramGroup::Inner,
            }),
            Position::Realm(_) => None,
        }
    }

    /// Whether a marker may step between two positions.
    #[must_use]
    pub fn adjacent(self, other: Position) -> bool {
        match (self, other) {
            (Position::Bagua(a), Position::Bagua(b)) => a.hamming(b) == 1,
            (Position::Realm(a), Position::Realm(b)) => matches!(
                (a, b),
                (Realm::Earth, Realm::Human)
                    | (Realm::Human, Realm::Earth)
                    | (Realm::Human, Realm::Heaven)
                    | (Realm::Heaven, Realm::Human)
            ),
            (Position::Realm(realm), Position::Bagua(trigram))
            | (Position::Bagua(trigram), Position::Realm(realm)) => match realm {
                Realm::Heaven => trigram == Trigram::Qian,
                Realm::Earth => trigram == Trigram::Kun,
                Realm::Human => trigram != Trigram::Qian && trigram != Trigram::Kun,
            },
        }
    }

    /// Every position reachable in one step.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[Position; 8]> {
        Position::ALL
            .into_iter()
            .filter(|&other| self.adjacent(other))
            .collect()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Bagua(trigram) => write!(f, "{trigram} slot"),
            Position::Realm(realm) => write!(f, "{} realm", realm.name()),
        }
    }
}
