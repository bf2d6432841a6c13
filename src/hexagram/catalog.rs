//! The immutable 64-hexagram catalog.
//!
//! ## Identity
//!
//! Catalog identity is binary-derived: a hexagram's six lines, read
//! little-endian with yang = 1 and line 0 at the bottom, give a value in
//! `[0, 64)`; the identity is `64 - value`. Hexagram #1 is therefore the
//! all-yang figure and #64 the all-yin figure, and #2 differs from #1
//! exactly at line 0.
//!
//! ## Construction
//!
//! `HexagramCatalog::new` builds all 64 entries once into an arena
//! indexed by identity; lookups are pure and side-effect-free. The
//! value↔identity mapping is a bijection over every 6-line sequence,
//! which the tests pin down exhaustively.

use serde::{Deserialize, Serialize};

use super::line::Line;
use super::trigram::Trigram;
use crate::core::EngineError;

/// Hexagram identity in `[1, 64]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexagramId(u8);

impl HexagramId {
    /// Validate and wrap an identity.
    pub fn new(id: u8) -> Result<Self, EngineError> {
        if (1..=64).contains(&id) {
            Ok(HexagramId(id))
        } else {
            Err(EngineError::InvalidHexagramSpec(format!(
                "hexagram identity {id} is outside [1, 64]"
            )))
        }
    }

    /// Get the raw identity value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for HexagramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hexagram {}", self.0)
    }
}

/// Which trigram of a hexagram is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Half {
    /// Lines 0-2 (the inner trigram).
    Lower,
    /// Lines 3-5 (the outer trigram).
    Upper,
}

/// A six-line figure. Immutable once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hexagram {
    id: HexagramId,
    lines: [Line; 6],
}

impl Hexagram {
    /// Catalog identity.
    #[must_use]
    pub const fn id(self) -> HexagramId {
        self.id
    }

    /// The six lines, bottom-up.
    #[must_use]
    pub const fn lines(self) -> [Line; 6] {
        self.lines
    }

    /// One of the two stacked trigrams.
    #[must_use]
    pub fn trigram(self, half: Half) -> Trigram {
        match half {
            Half::Lower => Trigram::from_lines([self.lines[0], self.lines[1], self.lines[2]]),
            Half::Upper => Trigram::from_lines([self.lines[3], self.lines[4], self.lines[5]]),
        }
    }

    /// The inner trigram (lines 0-2).
    #[must_use]
    pub fn lower(self) -> Trigram {
        self.trigram(Half::Lower)
    }

    /// The outer trigram (lines 3-5).
    #[must_use]
    pub fn upper(self) -> Trigram {
        self.trigram(Half::Upper)
    }

    /// Little-endian binary reading of the lines.
    #[must_use]
    pub fn value(self) -> u8 {
        self.lines
            .iter()
            .enumerate()
            .fold(0, |acc, (i, line)| acc | (line.bit() << i))
    }

    /// Number of yang lines.
    #[must_use]
    pub fn yang_count(self) -> u32 {
        self.value().count_ones()
    }

    /// True when both trigrams are the same figure (the eight "pure"
    /// hexagrams).
    #[must_use]
    pub fn is_pure(self) -> bool {
        self.lower() == self.upper()
    }
}

impl std::fmt::Display for Hexagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}/{})", self.id, self.upper(), self.lower())
    }
}

/// The fixed 64-entry catalog, built once per match.
#[derive(Clone, Debug)]
pub struct HexagramCatalog {
    /// Entries ordered by identity; `entries[id - 1]`.
    entries: Vec<Hexagram>,
}

impl HexagramCatalog {
    /// Number of cataloged hexagrams.
    pub const LEN: usize = 64;

    /// Build the catalog.
    #[must_use]
    pub fn new() -> Self {
        let entries = (1..=Self::LEN as u8)
            .map(|id| {
                let value = Self::LEN as u8 - id;
                let mut lines = [Line::Yin; 6];
                for (i, line) in lines.iter_mut().enumerate() {
                    if (value >> i) & 1 == 1 {
                        *line = Line::Yang;
                    }
                }
                Hexagram {
                    id: HexagramId(id),
                    lines,
                }
            })
            .collect();
        Self { entries }
    }

    /// Look up by identity.
    #[must_use]
    pub fn by_id(&self, id: HexagramId) -> Hexagram {
        self.entries[id.0 as usize - 1]
    }

    /// Look up by line sequence. Total over all 2^6 sequences.
    #[must_use]
    pub fn by_lines(&self, lines: [Line; 6]) -> Hexagram {
        let value = lines
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, line)| acc | ((line.bit() as usize) << i));
        self.entries[Self::LEN - 1 - value]
    }

    /// Look up from raw binary line values, validating each.
    ///
    /// Fails with `InvalidHexagramSpec` on a wrong-length sequence or
    /// any value outside {0, 1}.
    pub fn by_bits(&self, bits: &[u8]) -> Result<Hexagram, EngineError> {
        if bits.len() != 6 {
            return Err(EngineError::InvalidHexagramSpec(format!(
                "expected 6 lines, got {}",
                bits.len()
            )));
        }
        let mut lines = [Line::Yin; 6];
        for (line, &bit) in lines.iter_mut().zip(bits) {
            *line = Line::from_bit(bit)?;
        }
        Ok(self.by_lines(lines))
    }

    /// Look up the hexagram formed by two trigrams.
    #[must_use]
    pub fn by_trigrams(&self, upper: Trigram, lower: Trigram) -> Hexagram {
        let [l0, l1, l2] = lower.lines();
        let [l3, l4, l5] = upper.lines();
        self.by_lines([l0, l1, l2, l3, l4, l5])
    }

    /// Iterate all entries in identity order.
    pub fn iter(&self) -> impl Iterator<Item = Hexagram> + '_ {
        self.entries.iter().copied()
    }
}

impl Default for HexagramCatalog {
    fn default() -> Self {
        Self::new()
    }
}
