// THEORY:
// Every failure the reconstruction pipeline can produce lives in one enum. Each
// variant carries enough context (face, color, scan index, position) for a person
// holding the cube to know what to rescan. None of them is retried internally: a
// bad photograph can only be fixed by taking another one.
//
// Classification ambiguity is deliberately absent here. An unreadable sticker is
// `StickerColor::Unknown`, which flows through the pipeline as data until it is
// either voted out by the orientation stage or trips one of the errors below.

use crate::core_modules::face::{FaceLabel, StickerColor};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Observed count of one color across the whole cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCount {
    pub color: StickerColor,
    pub observed: usize,
}

impl fmt::Display for ColorCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.color, self.observed)
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    // --- Sampling ---
    #[error("scan #{input_index}: image {width}x{height} is too small for the 3x3 sampling grid")]
    ImageTooSmall {
        input_index: usize,
        width: u32,
        height: u32,
    },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("scan #{input_index} has {found} stickers, expected 9")]
    StickerCount { input_index: usize, found: usize },

    // --- Identity ---
    #[error("expected 6 face scans, got {found}")]
    WrongScanCount { found: usize },

    #[error("scan #{input_index} has center color {color}, which does not identify any face")]
    UnrecognizedCenter {
        input_index: usize,
        color: StickerColor,
    },

    #[error("scans #{first_scan} and #{second_scan} both show the {face} face ({color} center)")]
    DuplicateFace {
        face: FaceLabel,
        color: StickerColor,
        first_scan: usize,
        second_scan: usize,
    },

    #[error("no scan has the center color of the {face} face")]
    MissingFace { face: FaceLabel },

    // --- Consistency ---
    #[error(
        "color counts are off (each color must appear 9 times): {}{}",
        join_counts(.counts),
        unknown_suffix(.unknown)
    )]
    ColorImbalance {
        counts: Vec<ColorCount>,
        unknown: usize,
    },

    // --- Orientation ---
    #[error(
        "could not determine the rotation of the {face} face: no edge sticker matched any of {}",
        join_colors(.expected)
    )]
    NoOrientationVotes {
        face: FaceLabel,
        expected: Vec<StickerColor>,
    },

    // --- Assembly ---
    #[error("sticker {position} of the {face} face is {color}, which has no facelet letter")]
    UnmappedSticker {
        face: FaceLabel,
        position: usize,
        color: StickerColor,
    },

    #[error("malformed facelet string: {0}")]
    MalformedFacelets(String),

    // --- Solver ---
    #[error("solver rejected the cube: {0}")]
    Solver(String),

    // --- Parallel path ---
    #[error("scan #{input_index}: face worker failed: {reason}")]
    WorkerFailed { input_index: usize, reason: String },
}

fn join_counts(counts: &[ColorCount]) -> String {
    counts
        .iter()
        .map(ColorCount::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_colors(colors: &[StickerColor]) -> String {
    colors
        .iter()
        .map(StickerColor::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

fn unknown_suffix(unknown: &usize) -> String {
    if *unknown == 0 {
        String::new()
    } else {
        format!(" ({unknown} unreadable)")
    }
}
