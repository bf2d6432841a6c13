//! Biangua: hexagram transformation by changing lines.
//!
//! Flip each changing line of the source figure and look the result up
//! in the catalog. The empty set is the identity; the full set yields
//! the source's opposite. Because the catalog covers every 6-line
//! sequence, the flip-and-lookup can never miss: a completeness
//! invariant tested in `catalog`.

use super::catalog::{Hexagram, HexagramCatalog};
use super::line::LineSet;

impl HexagramCatalog {
    /// Transform `source` by flipping every line in `changing`.
    ///
    /// Laws:
    /// - `transform(h, empty) == h`
    /// - `transform(transform(h, s), s) == h`
    #[must_use]
    pub fn transform(&self, source: Hexagram, changing: LineSet) -> Hexagram {
        let mut lines = source.lines();
        for (index, line) in lines.iter_mut().enumerate() {
            if changing.contains(index) {
                *line = line.flip();
            }
        }
        self.by_lines(lines)
    }

    /// The changing-line set that carries `from` to `to`.
    #[must_use]
    pub fn line_diff(&self, from: Hexagram, to: Hexagram) -> LineSet {
        let from_lines = from.lines();
        let to_lines = to.lines();
        let indices: Vec<usize> = (0..6).filter(|&i| from_lines[i] != to_lines[i]).collect();
        // Indices are in range by construction.
        LineSet::from_indices(&indices).unwrap_or_default()
    }
}
