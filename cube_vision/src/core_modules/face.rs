// THEORY:
// The `face` module holds the vocabulary every other stage speaks: the sticker
// colors, the six logical face labels, and the `FaceScan` container for one
// photographed face. Like the `Pixel` type, these are "dumb" data. The only
// behavior they carry is what is intrinsic to the data itself, such as rotating a
// face's 9 stickers by a quarter turn.
//
// Key principles:
// 1.  **Fixed Shape**: A `FaceScan` is a `[StickerColor; 9]`. The "exactly nine
//     stickers" invariant is enforced by the type; the only way in from an
//     arbitrary sequence is the fallible `FaceScan::from_colors`.
// 2.  **Row-Major Layout**: index 0 is top-left, 4 is the center, 8 is bottom-right.
// 3.  **Immutability**: rotation returns a new scan instead of mutating in place.

use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of stickers on one face.
pub const STICKERS_PER_FACE: usize = 9;
/// Row-major index of the center sticker.
pub const CENTER_INDEX: usize = 4;

/// A single 90° clockwise turn: new position `j` takes the old sticker at `CLOCKWISE[j]`.
const CLOCKWISE: [usize; STICKERS_PER_FACE] = [6, 3, 0, 7, 4, 1, 8, 5, 2];

/// The classified color of one sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerColor {
    White,
    Yellow,
    Red,
    Orange,
    Green,
    Blue,
    /// The sample matched no color rule (poor lighting, glare, sticker gap).
    Unknown,
}

impl StickerColor {
    /// The six real sticker colors, in reporting order.
    pub const ALL: [StickerColor; 6] = [
        StickerColor::White,
        StickerColor::Yellow,
        StickerColor::Red,
        StickerColor::Orange,
        StickerColor::Green,
        StickerColor::Blue,
    ];

    pub fn is_known(self) -> bool {
        self != StickerColor::Unknown
    }
}

impl fmt::Display for StickerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StickerColor::White => "white",
            StickerColor::Yellow => "yellow",
            StickerColor::Red => "red",
            StickerColor::Orange => "orange",
            StickerColor::Green => "green",
            StickerColor::Blue => "blue",
            StickerColor::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One of the six logical faces of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceLabel {
    Up,
    Right,
    Front,
    Down,
    Left,
    Back,
}

impl FaceLabel {
    /// Canonical facelet order: U, R, F, D, L, B.
    pub const ALL: [FaceLabel; 6] = [
        FaceLabel::Up,
        FaceLabel::Right,
        FaceLabel::Front,
        FaceLabel::Down,
        FaceLabel::Left,
        FaceLabel::Back,
    ];

    /// Position of this label in the canonical U, R, F, D, L, B order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The single-letter code used in facelet strings.
    pub fn letter(self) -> char {
        match self {
            FaceLabel::Up => 'U',
            FaceLabel::Right => 'R',
            FaceLabel::Front => 'F',
            FaceLabel::Down => 'D',
            FaceLabel::Left => 'L',
            FaceLabel::Back => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<FaceLabel> {
        FaceLabel::ALL.into_iter().find(|label| label.letter() == letter)
    }
}

impl fmt::Display for FaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The 9 classified stickers of one photographed face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceScan {
    /// The photograph's position in the caller's input (1..=6). Not a face label.
    pub input_index: usize,
    /// Row-major sticker colors.
    pub stickers: [StickerColor; STICKERS_PER_FACE],
}

impl FaceScan {
    pub fn new(input_index: usize, stickers: [StickerColor; STICKERS_PER_FACE]) -> Self {
        Self {
            input_index,
            stickers,
        }
    }

    /// Builds a scan from an arbitrary sequence, rejecting anything but exactly 9 colors.
    pub fn from_colors(input_index: usize, colors: &[StickerColor]) -> Result<Self> {
        let stickers: [StickerColor; STICKERS_PER_FACE] =
            colors.try_into().map_err(|_| ScanError::StickerCount {
                input_index,
                found: colors.len(),
            })?;
        Ok(Self::new(input_index, stickers))
    }

    pub fn center(&self) -> StickerColor {
        self.stickers[CENTER_INDEX]
    }

    /// Returns a copy rotated clockwise by `quarter_turns` (taken modulo 4).
    pub fn rotated(&self, quarter_turns: u8) -> FaceScan {
        let mut stickers = self.stickers;
        for _ in 0..quarter_turns % 4 {
            stickers = CLOCKWISE.map(|from| stickers[from]);
        }
        FaceScan::new(self.input_index, stickers)
    }

    pub fn count(&self, color: StickerColor) -> usize {
        self.stickers.iter().filter(|&&sticker| sticker == color).count()
    }
}

/// One scan per logical face, stored in canonical U, R, F, D, L, B order.
///
/// The array makes "each label exactly once" a property of the type. Only the
/// identity resolver builds one from raw scans; later stages produce new states
/// from old ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeState {
    faces: [FaceScan; 6],
}

impl CubeState {
    /// `faces[i]` must be the scan for `FaceLabel::ALL[i]`.
    pub fn from_faces(faces: [FaceScan; 6]) -> Self {
        Self { faces }
    }

    pub fn face(&self, label: FaceLabel) -> &FaceScan {
        &self.faces[label.index()]
    }

    /// Faces paired with their labels, in canonical order.
    pub fn faces(&self) -> impl Iterator<Item = (FaceLabel, &FaceScan)> {
        FaceLabel::ALL.into_iter().zip(self.faces.iter())
    }

    /// All 54 stickers, face by face in canonical order.
    pub fn stickers(&self) -> impl Iterator<Item = StickerColor> + '_ {
        self.faces.iter().flat_map(|face| face.stickers)
    }

    /// Builds a new state by transforming each face.
    pub fn try_map_faces<F>(&self, mut transform: F) -> Result<CubeState>
    where
        F: FnMut(FaceLabel, &FaceScan) -> Result<FaceScan>,
    {
        let mut faces = self.faces.clone();
        for (label, face) in FaceLabel::ALL.into_iter().zip(faces.iter_mut()) {
            *face = transform(label, &self.faces[label.index()])?;
        }
        Ok(CubeState { faces })
    }
}
