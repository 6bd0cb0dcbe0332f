// THEORY:
// The `FaceletAssembler` is the final stage. It flattens an oriented `CubeState`
// into the 54-letter string a solver consumes: faces in U, R, F, D, L, B order,
// stickers row-major within each face, each color replaced by the letter of the
// face whose center carries it.
//
// By the time a state reaches this stage every sticker should be one of the six
// scheme colors. An `Unknown` here means an earlier stage let something through, so
// assembly fails loudly instead of writing a placeholder letter into the string.

use crate::core_modules::face::{CubeState, FaceLabel, STICKERS_PER_FACE};
use crate::core_modules::face_resolver::ColorScheme;
use crate::error::{Result, ScanError};
use std::fmt;

/// Total number of facelets on a cube.
pub const FACELET_COUNT: usize = 6 * STICKERS_PER_FACE;

/// A well-formed facelet string: 54 letters from `URFDLB`, nine of each.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceletString(String);

impl FaceletString {
    /// Validates length, alphabet and per-letter counts.
    pub fn parse(facelets: &str) -> Result<Self> {
        let length = facelets.chars().count();
        if length != FACELET_COUNT {
            return Err(ScanError::MalformedFacelets(format!(
                "expected {FACELET_COUNT} letters, got {length}"
            )));
        }
        let mut counts = [0usize; 6];
        for (position, letter) in facelets.chars().enumerate() {
            let label = FaceLabel::from_letter(letter).ok_or_else(|| {
                ScanError::MalformedFacelets(format!(
                    "'{letter}' at position {position} is not a face letter"
                ))
            })?;
            counts[label.index()] += 1;
        }
        for label in FaceLabel::ALL {
            let count = counts[label.index()];
            if count != STICKERS_PER_FACE {
                return Err(ScanError::MalformedFacelets(format!(
                    "'{}' appears {count} times, expected {STICKERS_PER_FACE}",
                    label.letter()
                )));
            }
        }
        Ok(Self(facelets.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The nine letters of one face.
    pub fn face(&self, label: FaceLabel) -> &str {
        let start = label.index() * STICKERS_PER_FACE;
        &self.0[start..start + STICKERS_PER_FACE]
    }

    /// Occurrences of each letter, indexed by `FaceLabel::index()`.
    pub fn letter_counts(&self) -> [usize; 6] {
        let mut counts = [0usize; 6];
        for label in self.0.chars().filter_map(FaceLabel::from_letter) {
            counts[label.index()] += 1;
        }
        counts
    }
}

impl fmt::Display for FaceletString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FaceletString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turns an oriented cube into its facelet string.
#[derive(Debug, Clone, Default)]
pub struct FaceletAssembler {
    scheme: ColorScheme,
}

impl FaceletAssembler {
    pub fn new(scheme: ColorScheme) -> Self {
        Self { scheme }
    }

    pub fn assemble(&self, state: &CubeState) -> Result<FaceletString> {
        let mut facelets = String::with_capacity(FACELET_COUNT);
        for (face, scan) in state.faces() {
            for (position, &color) in scan.stickers.iter().enumerate() {
                let label = self.scheme.label_of(color).ok_or(ScanError::UnmappedSticker {
                    face,
                    position,
                    color,
                })?;
                facelets.push(label.letter());
            }
        }
        // Color balance was validated upstream; parse re-checks the shape.
        FaceletString::parse(&facelets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::face::{FaceScan, StickerColor};

    fn solved_state() -> CubeState {
        let scheme = ColorScheme::default();
        CubeState::from_faces(FaceLabel::ALL.map(|label| {
            FaceScan::new(label.index() + 1, [scheme.color_of(label); 9])
        }))
    }

    #[test]
    fn test_solved_cube_string() {
        let facelets = FaceletAssembler::default().assemble(&solved_state()).unwrap();
        assert_eq!(
            facelets.as_str(),
            "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB"
        );
        assert_eq!(facelets.letter_counts(), [9; 6]);
        assert_eq!(facelets.face(FaceLabel::Front), "FFFFFFFFF");
    }

    #[test]
    fn test_unknown_sticker_fails_loudly() {
        let state = solved_state()
            .try_map_faces(|label, scan| {
                let mut scan = scan.clone();
                if label == FaceLabel::Left {
                    scan.stickers[6] = StickerColor::Unknown;
                }
                Ok(scan)
            })
            .unwrap();
        let err = FaceletAssembler::default().assemble(&state).unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnmappedSticker {
                face: FaceLabel::Left,
                position: 6,
                color: StickerColor::Unknown
            }
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_strings() {
        assert!(FaceletString::parse("UUU").is_err());
        let wrong_letter = format!("X{}", &"U".repeat(53));
        assert!(FaceletString::parse(&wrong_letter).is_err());
        let unbalanced = format!(
            "{}{}",
            "U".repeat(10),
            "RRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBB"
        );
        assert!(FaceletString::parse(&unbalanced).is_err());
    }

    #[test]
    fn test_parse_accepts_scrambled_string() {
        let scrambled = "DRLUUBFBRBLURRLRUBLRDDFDLFUFUFFDBRDUBRUFLLFDDBFLUBLRBD";
        let facelets = FaceletString::parse(scrambled).unwrap();
        assert_eq!(facelets.to_string(), scrambled);
    }
}
