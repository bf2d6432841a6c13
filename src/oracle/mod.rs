//! The divination oracle.
//!
//! Draws six independent binary lines with a configurable yang bias,
//! converts them into a cataloged hexagram, and attaches a fortune
//! reading. Deeper cultivation widens the reading: a low dao-xing
//! diviner only ever receives the safe middle bands, while a high
//! dao-xing diviner is shown the full span from great misfortune to
//! great fortune.
//!
//! The oracle owns its own RNG stream, so the same seed and call count
//! always reproduce the same sequence of draws, as required for replay
//! and for reproducible tests.

use serde::{Deserialize, Serialize};

use crate::core::{MatchRng, MatchRngState};
use crate::hexagram::{HexagramCatalog, HexagramId, Line};

/// A fortune band, worst to best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Fortune {
    GreatMisfortune,
    Misfortune,
    SlightMisfortune,
    Neutral,
    SlightFortune,
    ModerateFortune,
    GreatFortune,
}

impl Fortune {
    const ALL: [Fortune; 7] = [
        Fortune::GreatMisfortune,
        Fortune::Misfortune,
        Fortune::SlightMisfortune,
        Fortune::Neutral,
        Fortune::SlightFortune,
        Fortune::ModerateFortune,
        Fortune::GreatFortune,
    ];
}

/// One completed draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divination {
    /// The drawn figure.
    pub hexagram: HexagramId,
    /// The attached reading.
    pub fortune: Fortune,
}

/// Seeded hexagram-drawing oracle.
#[derive(Clone, Debug)]
pub struct DivinationOracle {
    rng: MatchRng,
    yang_bias: f64,
}

impl DivinationOracle {
    /// Create an oracle over its own RNG stream.
    #[must_use]
    pub fn new(rng: MatchRng, yang_bias: f64) -> Self {
        Self { rng, yang_bias }
    }

    /// Draw a hexagram and a reading scaled to the diviner's dao-xing.
    pub fn draw(&mut self, catalog: &HexagramCatalog, dao_xing: i64) -> Divination {
        let mut lines = [Line::Yin; 6];
        for line in &mut lines {
            if self.rng.gen_bool(self.yang_bias) {
                *line = Line::Yang;
            }
        }
        let hexagram = catalog.by_lines(lines);
        let fortune = self.draw_fortune(dao_xing);

        Divination {
            hexagram: hexagram.id(),
            fortune,
        }
    }

    /// Weighted fortune pick over the bands visible at this dao-xing.
    ///
    /// Shallow cultivation sees only the safe middle; depth reveals the
    /// extremes in both directions.
    fn draw_fortune(&mut self, dao_xing: i64) -> Fortune {
        // (first visible band index, weights over visible bands)
        let (offset, weights): (usize, &[f32]) = if dao_xing <= 3 {
            (3, &[3.0, 2.0, 1.0])
        } else if dao_xing <= 7 {
            (2, &[1.0, 2.0, 3.0, 3.0, 1.0])
        } else {
            (0, &[1.0, 1.0, 2.0, 3.0, 3.0, 2.0, 1.0])
        };

        // Weights are non-empty and positive, so the choice cannot miss.
        let pick = self.rng.choose_weighted(weights).unwrap_or(0);
        Fortune::ALL[offset + pick]
    }

    /// Capture the RNG state for persistence.
    #[must_use]
    pub fn state(&self) -> MatchRngState {
        self.rng.state()
    }

    /// Rebuild an oracle from a saved state.
    #[must_use]
    pub fn from_state(state: &MatchRngState, yang_bias: f64) -> Self {
        Self {
            rng: MatchRng::from_state(state),
            yang_bias,
        }
    }
}
