//! Lines: the binary yin/yang element, and sets of line indices.
//!
//! Hexagram lines are indexed 0-5 from the bottom. `LineSet` is a 6-bit
//! set of line indices used to describe changing lines in a
//! transformation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EngineError;

/// A single line of a trigram or hexagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Broken line: yielding, receptive.
    Yin,
    /// Solid line: firm, active.
    Yang,
}

impl Line {
    /// Binary value: yin = 0, yang = 1.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Line::Yin => 0,
            Line::Yang => 1,
        }
    }

    /// Parse a binary value. Anything outside {0, 1} is malformed.
    pub fn from_bit(bit: u8) -> Result<Self, EngineError> {
        match bit {
            0 => Ok(Line::Yin),
            1 => Ok(Line::Yang),
            other => Err(EngineError::InvalidHexagramSpec(format!(
                "line value {other} is not 0 or 1"
            ))),
        }
    }

    /// The opposite line.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Line::Yin => Line::Yang,
            Line::Yang => Line::Yin,
        }
    }
}

/// A set of changing-line indices in `[0, 6)`.
///
/// Stored as a 6-bit mask. The empty set is the identity transform; the
/// full set inverts every line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSet(u8);

impl LineSet {
    /// Every line changing.
    pub const ALL: LineSet = LineSet(0b11_1111);

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        LineSet(0)
    }

    /// Build a set from raw indices.
    ///
    /// Fails with `InvalidHexagramSpec` on any index outside `[0, 6)`.
    pub fn from_indices(indices: &[usize]) -> Result<Self, EngineError> {
        let mut mask = 0u8;
        for &index in indices {
            if index >= 6 {
                return Err(EngineError::InvalidHexagramSpec(format!(
                    "changing line index {index} is outside [0, 6)"
                )));
            }
            mask |= 1 << index;
        }
        Ok(LineSet(mask))
    }

    /// The set containing one line index.
    ///
    /// Indices wrap into `[0, 6)`; callers pass literals or loop
    /// counters already in range.
    #[must_use]
    pub const fn single(index: usize) -> Self {
        LineSet(1 << (index % 6))
    }

    /// Check membership.
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < 6 && (self.0 >> index) & 1 == 1
    }

    /// Number of changing lines.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no line changes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The member indices in ascending order.
    #[must_use]
    pub fn indices(self) -> SmallVec<[u8; 6]> {
        (0..6u8).filter(|&i| self.contains(i as usize)).collect()
    }
}

impl std::fmt::Display for LineSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (n, index) in self.indices().into_iter().enumerate() {
            if n > 0 {
                write!(f, ",")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bits() {
        assert_eq!(Line::Yin.bit(), 0);
        assert_eq!(Line::Yang.bit(), 1);
        assert_eq!(Line::from_bit(0).unwrap(), Line::Yin);
        assert_eq!(Line::from_bit(1).unwrap(), Line::Yang);
        assert!(Line::from_bit(2).is_err());
    }

    #[test]
    fn test_line_flip() {
        assert_eq!(Line::Yin.flip(), Line::Yang);
        assert_eq!(Line::Yang.flip(), Line::Yin);
    }

    #[test]
    fn test_line_set_basics() {
        let set = LineSet::from_indices(&[0, 3, 5]).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(set.contains(3));
        assert!(set.contains(5));
        assert_eq!(set.indices().as_slice(), &[0, 3, 5]);
    }

    #[test]
    fn test_line_set_empty_and_full() {
        assert!(LineSet::empty().is_empty());
        assert_eq!(LineSet::empty().len(), 0);
        assert_eq!(LineSet::ALL.len(), 6);
        for i in 0..6 {
            assert!(LineSet::ALL.contains(i));
        }
    }

    #[test]
    fn test_line_set_rejects_out_of_range() {
        assert!(LineSet::from_indices(&[6]).is_err());
        assert!(LineSet::from_indices(&[0, 1, 99]).is_err());
    }

    #[test]
    fn test_line_set_duplicate_indices_collapse() {
        let set = LineSet::from_indices(&[2, 2, 2]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(2));
    }

    #[test]
    fn test_line_set_display() {
        let set = LineSet::from_indices(&[1, 4]).unwrap();
        assert_eq!(format!("{set}"), "{1,4}");
        assert_eq!(format!("{}", LineSet::empty()), "{}");
    }
}
