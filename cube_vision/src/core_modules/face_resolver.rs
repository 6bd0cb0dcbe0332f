// THEORY:
// The `FaceResolver` decides which logical face each photograph shows. Centers never
// move relative to each other when a cube is turned, so the center sticker alone
// names the face: with the standard scheme a white center is always Up, a green
// center is always Front, and so on.
//
// The resolver is strict. The six photographs must name the six faces exactly once
// each. A center it cannot map, two photographs of the same face, or a face nobody
// photographed all stop the pipeline here, before any counting or orientation work.

use crate::core_modules::face::{CubeState, FaceLabel, FaceScan, StickerColor};
use crate::error::{Result, ScanError};
use log::info;
use serde::{Deserialize, Serialize};

/// Which center color belongs to which logical face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    pub up: StickerColor,
    pub right: StickerColor,
    pub front: StickerColor,
    pub down: StickerColor,
    pub left: StickerColor,
    pub back: StickerColor,
}

impl Default for ColorScheme {
    /// The Western color scheme.
    fn default() -> Self {
        Self {
            up: StickerColor::White,
            right: StickerColor::Red,
            front: StickerColor::Green,
            down: StickerColor::Yellow,
            left: StickerColor::Orange,
            back: StickerColor::Blue,
        }
    }
}

impl ColorScheme {
    pub fn color_of(&self, label: FaceLabel) -> StickerColor {
        match label {
            FaceLabel::Up => self.up,
            FaceLabel::Right => self.right,
            FaceLabel::Front => self.front,
            FaceLabel::Down => self.down,
            FaceLabel::Left => self.left,
            FaceLabel::Back => self.back,
        }
    }

    /// The face whose center is `color`, if any.
    pub fn label_of(&self, color: StickerColor) -> Option<FaceLabel> {
        if !color.is_known() {
            return None;
        }
        FaceLabel::ALL
            .into_iter()
            .find(|&label| self.color_of(label) == color)
    }

    /// Every face must own a distinct, real color.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<StickerColor> = Vec::with_capacity(FaceLabel::ALL.len());
        for label in FaceLabel::ALL {
            let color = self.color_of(label);
            if !color.is_known() {
                return Err(ScanError::InvalidConfig(format!(
                    "color scheme gives the {label} face no color"
                )));
            }
            if seen.contains(&color) {
                return Err(ScanError::InvalidConfig(format!(
                    "color scheme assigns {color} to more than one face"
                )));
            }
            seen.push(color);
        }
        Ok(())
    }
}

/// Maps photographed faces to logical faces by their center sticker.
#[derive(Debug, Clone, Default)]
pub struct FaceResolver {
    scheme: ColorScheme,
}

impl FaceResolver {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    /// Builds a `CubeState` from scans in arbitrary order.
    pub fn resolve(&self, scans: &[FaceScan]) -> Result<CubeState> {
        let mut slots: [Option<&FaceScan>; 6] = [None; 6];

        for scan in scans {
            let color = scan.center();
            let label = self
                .scheme
                .label_of(color)
                .ok_or(ScanError::UnrecognizedCenter {
                    input_index: scan.input_index,
                    color,
                })?;

            let slot = &mut slots[label.index()];
            if let Some(first) = slot {
                return Err(ScanError::DuplicateFace {
                    face: label,
                    color,
                    first_scan: first.input_index,
                    second_scan: scan.input_index,
                });
            }
            info!("scan #{} is the {} face ({} center)", scan.input_index, label, color);
            *slot = Some(scan);
        }

        let mut faces = Vec::with_capacity(FaceLabel::ALL.len());
        for label in FaceLabel::ALL {
            let scan = slots[label.index()].ok_or(ScanError::MissingFace { face: label })?;
            faces.push(scan.clone());
        }
        let faces: [FaceScan; 6] = faces
            .try_into()
            .map_err(|_| ScanError::WrongScanCount { found: scans.len() })?;
        Ok(CubeState::from_faces(faces))
    }
}
