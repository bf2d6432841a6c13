//! The eight trigrams.
//!
//! Each trigram is three lines read bottom-up, with two symbolic
//! attributes the rest of the engine leans on:
//!
//! - **Polarity**: trigrams with an odd number of yang lines are yang
//!   (Qian and the three sons), those with an even number are yin (Kun
//!   and the three daughters). The board's hexagram-derivation groups
//!   follow this split.
//! - **Element**: the five-phase attribute, with its generation cycle,
//!   used by the opponent policy's synergy heuristic.

use serde::{Deserialize, Serialize};

use super::line::Line;

/// One of the eight trigrams, in binary order of their line values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigram {
    /// ☷ three yin lines, earth.
    Kun,
    /// ☳ yang below two yin, thunder.
    Zhen,
    /// ☵ yang between yin, water.
    Kan,
    /// ☱ two yang below yin, lake.
    Dui,
    /// ☶ yang above two yin, mountain.
    Gen,
    /// ☲ yin between yang, fire.
    Li,
    /// ☴ two yang above yin, wind.
    Xun,
    /// ☰ three yang lines, heaven.
    Qian,
}

/// Yin/yang classification of a whole trigram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Yin,
    Yang,
}

/// Five-phase attribute of a trigram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

impl Element {
    /// The element this one generates in the sheng cycle:
    /// metal → water → wood → fire → earth → metal.
    #[must_use]
    pub const fn generates(self) -> Element {
        match self {
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
        }
    }
}

impl Trigram {
    /// All eight trigrams in binary order of their line values.
    pub const ALL: [Trigram; 8] = [
        Trigram::Kun,
        Trigram::Zhen,
        Trigram::Kan,
        Trigram::Dui,
        Trigram::Gen,
        Trigram::Li,
        Trigram::Xun,
        Trigram::Qian,
    ];

    /// The three lines, bottom-up.
    #[must_use]
    pub const fn lines(self) -> [Line; 3] {
        let value = self.value();
        [
            if value & 1 == 1 { Line::Yang } else { Line::Yin },
            if (value >> 1) & 1 == 1 { Line::Yang } else { Line::Yin },
            if (value >> 2) & 1 == 1 { Line::Yang } else { Line::Yin },
        ]
    }

    /// Little-endian binary reading of the lines (bottom line = bit 0).
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Trigram::Kun => 0b000,
            Trigram::Zhen => 0b001,
            Trigram::Kan => 0b010,
            Trigram::Dui => 0b011,
            Trigram::Gen => 0b100,
            Trigram::Li => 0b101,
            Trigram::Xun => 0b110,
            Trigram::Qian => 0b111,
        }
    }

    /// Look a trigram up by its three lines.
    ///
    /// Total: every combination of three lines is one of the eight.
    #[must_use]
    pub const fn from_lines(lines: [Line; 3]) -> Trigram {
        Self::from_value(lines[0].bit() | (lines[1].bit() << 1) | (lines[2].bit() << 2))
    }

    const fn from_value(value: u8) -> Trigram {
        match value & 0b111 {
            0b000 => Trigram::Kun,
            0b001 => Trigram::Zhen,
            0b010 => Trigram::Kan,
            0b011 => Trigram::Dui,
            0b100 => Trigram::Gen,
            0b101 => Trigram::Li,
            0b110 => Trigram::Xun,
            _ => Trigram::Qian,
        }
    }

    /// Number of yang lines.
    #[must_use]
    pub const fn yang_count(self) -> u32 {
        self.value().count_ones()
    }

    /// Yang for Qian and the three sons, yin for Kun and the three
    /// daughters (odd vs. even yang-line count).
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        if self.yang_count() % 2 == 1 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    /// Five-phase attribute.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            Trigram::Qian | Trigram::Dui => Element::Metal,
            Trigram::Zhen | Trigram::Xun => Element::Wood,
            Trigram::Kan => Element::Water,
            Trigram::Li => Element::Fire,
            Trigram::Gen | Trigram::Kun => Element::Earth,
        }
    }

    /// Number of differing lines between two trigrams.
    #[must_use]
    pub const fn hamming(self, other: Trigram) -> u32 {
        (self.value() ^ other.value()).count_ones()
    }

    /// Pinyin name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Trigram::Qian => "qian",
            Trigram::Dui => "dui",
            Trigram::Li => "li",
            Trigram::Zhen => "zhen",
            Trigram::Xun => "xun",
            Trigram::Kan => "kan",
            Trigram::Gen => "gen",
            Trigram::Kun => "kun",
        }
    }
}

impl std::fmt::Display for Trigram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_line_roundtrip() {
        for trigram in Trigram::ALL {
            assert_eq!(Trigram::from_lines(trigram.lines()), trigram);
        }
    }

    #[test]
    fn test_all_values_distinct() {
        let mut seen = [false; 8];
        for trigram in Trigram::ALL {
            let v = trigram.value() as usize;
            assert!(!seen[v], "duplicate value {v}");
            seen[v] = true;
        }
    }

    #[test]
    fn test_qian_kun_lines() {
        assert_eq!(Trigram::Qian.lines(), [Line::Yang, Line::Yang, Line::Yang]);
        assert_eq!(Trigram::Kun.lines(), [Line::Yin, Line::Yin, Line::Yin]);
    }

    #[test]
    fn test_polarity_split() {
        // Father and sons.
        for t in [Trigram::Qian, Trigram::Zhen, Trigram::Kan, Trigram::Gen] {
            assert_eq!(t.polarity(), Polarity::Yang, "{t}");
        }
        // Mother and daughters.
        for t in [Trigram::Kun, Trigram::Xun, Trigram::Li, Trigram::Dui] {
            assert_eq!(t.polarity(), Polarity::Yin, "{t}");
        }
    }

    #[test]
    fn test_elements() {
        assert_eq!(Trigram::Qian.element(), Element::Metal);
        assert_eq!(Trigram::Dui.element(), Element::Metal);
        assert_eq!(Trigram::Zhen.element(), Element::Wood);
        assert_eq!(Trigram::Xun.element(), Element::Wood);
        assert_eq!(Trigram::Kan.element(), Element::Water);
        assert_eq!(Trigram::Li.element(), Element::Fire);
        assert_eq!(Trigram::Gen.element(), Element::Earth);
        assert_eq!(Trigram::Kun.element(), Element::Earth);
    }

    #[test]
    fn test_sheng_cycle_closes() {
        let mut element = Element::Metal;
        for _ in 0..5 {
            element = element.generates();
        }
        assert_eq!(element, Element::Metal);
    }

    #[test]
    fn test_hamming() {
        assert_eq!(Trigram::Qian.hamming(Trigram::Kun), 3);
        assert_eq!(Trigram::Qian.hamming(Trigram::Dui), 1);
        assert_eq!(Trigram::Kan.hamming(Trigram::Kan), 0);
    }
}
