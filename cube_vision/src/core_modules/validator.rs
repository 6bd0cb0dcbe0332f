// THEORY:
// The `StateValidator` is the last gate before orientation work. A real cube has
// exactly nine stickers of each color, so any other count means at least one
// sticker was misread. Catching that here gives the user the most useful feedback
// the pipeline can offer: which colors are over- or under-represented, which
// usually points straight at the face that needs a better photograph.
//
// Orientation correction on a miscounted cube would only produce a confident answer
// about the wrong cube, so the pipeline always validates first.
//
// Nine stickers per face needs no runtime check at this point: `FaceScan` stores a
// fixed `[StickerColor; 9]`, and `FaceScan::from_colors` is where arbitrary input is
// measured.

use crate::core_modules::face::{CubeState, STICKERS_PER_FACE, StickerColor};
use crate::error::{ColorCount, Result, ScanError};
use log::{debug, warn};

/// Checks global color balance of a resolved cube.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateValidator;

impl StateValidator {
    pub fn new() -> Self {
        Self
    }

    /// Counts every color over the 54 stickers, including `Unknown`.
    pub fn tally(state: &CubeState) -> (Vec<ColorCount>, usize) {
        let mut counts: Vec<ColorCount> = StickerColor::ALL
            .into_iter()
            .map(|color| ColorCount { color, observed: 0 })
            .collect();
        let mut unknown = 0;
        for sticker in state.stickers() {
            match counts.iter_mut().find(|count| count.color == sticker) {
                Some(count) => count.observed += 1,
                None => unknown += 1,
            }
        }
        (counts, unknown)
    }

    /// Fails with every color whose count is not exactly 9.
    pub fn validate(&self, state: &CubeState) -> Result<()> {
        let (counts, unknown) = Self::tally(state);
        debug!("color tally: {:?}, unknown: {}", counts, unknown);

        let imbalances: Vec<ColorCount> = counts
            .into_iter()
            .filter(|count| count.observed != STICKERS_PER_FACE)
            .collect();

        if imbalances.is_empty() && unknown == 0 {
            return Ok(());
        }
        warn!(
            "rejecting scan: {} imbalanced colors, {} unreadable stickers",
            imbalances.len(),
            unknown
        );
        Err(ScanError::ColorImbalance {
            counts: imbalances,
            unknown,
        })
    }
}
