// THEORY:
// The `ColorClassifier` turns one raw HSV sample into a sticker color. It is a small
// rule engine: an ordered list of `ColorRange`s, each owning an inclusive box in
// (hue, saturation, value) space, evaluated top to bottom. The first rule that
// contains the sample decides the color.
//
// Key architectural principles:
// 1.  **Range Membership, Not Nearest Color**: A sample either falls inside a rule's
//     box or it does not. Samples that fall in no box are `Unknown`, which is an
//     expected result under bad lighting and is passed on as data, never coerced to
//     the "closest" color.
// 2.  **Deterministic Tie-Break**: Rules are meant to be disjoint, but if two overlap
//     the one declared first wins. White is declared first so that a washed-out
//     sample with a reddish hue is not claimed by red.
// 3.  **Red Wraps**: Hue is periodic and red straddles the wrap point, so red owns two
//     rules, one at each end of the hue scale.
// 4.  **Injected Rules**: The table is immutable data handed in at construction.
//     Recalibrating for new lighting means loading a new `ColorRules`, not editing
//     code.

use crate::core_modules::chunk::chunk::RawSample;
use crate::core_modules::face::StickerColor;
use crate::core_modules::pixel::pixel::{Hue, Saturation, Value};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` interval on one HSV channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    pub min: u8,
    pub max: u8,
}

impl ChannelRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub const fn full() -> Self {
        Self::new(0, u8::MAX)
    }

    pub fn contains(&self, channel: u8) -> bool {
        self.min <= channel && channel <= self.max
    }
}

/// One classification rule: samples inside all three intervals are `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub color: StickerColor,
    pub hue: ChannelRange,
    pub saturation: ChannelRange,
    pub value: ChannelRange,
}

impl ColorRange {
    pub fn matches(&self, sample: &RawSample) -> bool {
        self.hue.contains(sample.hue)
            && self.saturation.contains(sample.saturation)
            && self.value.contains(sample.value)
    }
}

/// The ordered rule table. Evaluation order is declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorRules {
    pub ranges: Vec<ColorRange>,
}

// Reference calibration, hue on the 0..=179 scale.
const WHITE_MAX_SATURATION: Saturation = 80;
const WHITE_MIN_VALUE: Value = 180;
const CHROMATIC_MIN_SATURATION: Saturation = 81;
const CHROMATIC_MIN_VALUE: Value = 50;

impl ColorRules {
    pub fn new(ranges: Vec<ColorRange>) -> Self {
        Self { ranges }
    }

    fn chromatic(color: StickerColor, hue_min: Hue, hue_max: Hue) -> ColorRange {
        ColorRange {
            color,
            hue: ChannelRange::new(hue_min, hue_max),
            saturation: ChannelRange::new(CHROMATIC_MIN_SATURATION, u8::MAX),
            value: ChannelRange::new(CHROMATIC_MIN_VALUE, u8::MAX),
        }
    }
}

impl Default for ColorRules {
    fn default() -> Self {
        Self::new(vec![
            ColorRange {
                color: StickerColor::White,
                hue: ChannelRange::full(),
                saturation: ChannelRange::new(0, WHITE_MAX_SATURATION),
                value: ChannelRange::new(WHITE_MIN_VALUE, u8::MAX),
            },
            Self::chromatic(StickerColor::Red, 0, 10),
            Self::chromatic(StickerColor::Orange, 11, 20),
            Self::chromatic(StickerColor::Yellow, 21, 34),
            Self::chromatic(StickerColor::Green, 35, 85),
            Self::chromatic(StickerColor::Blue, 86, 128),
            Self::chromatic(StickerColor::Red, 170, 179),
        ])
    }
}

/// Maps raw samples to sticker colors using an injected rule table.
#[derive(Debug, Clone, Default)]
pub struct ColorClassifier {
    rules: ColorRules,
}

impl ColorClassifier {
    pub fn new(rules: ColorRules) -> Self {
        Self { rules }
    }

    /// First matching rule wins; no match is `Unknown`. Never fails.
    pub fn classify(&self, sample: &RawSample) -> StickerColor {
        let color = self
            .rules
            .ranges
            .iter()
            .find(|range| range.matches(sample))
            .map_or(StickerColor::Unknown, |range| range.color);
        if color == StickerColor::Unknown {
            warn!("no color rule matches {:?}", sample);
        } else {
            trace!("classified {:?} as {}", sample, color);
        }
        color
    }

    pub fn classify_all<const N: usize>(&self, samples: [RawSample; N]) -> [StickerColor; N] {
        samples.map(|sample| self.classify(&sample))
    }
}
