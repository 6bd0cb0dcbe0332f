// THEORY:
// The `OrientationCorrector` works out how each face was turned in the photograph
// and turns it back. A face can be shot at 0, 90, 180 or 270 degrees; the solver
// needs every face in the orientation of the standard unfolded net.
//
// Key architectural principles & algorithm steps:
// 1.  **Fixed Topology**: Each face has four canonical neighbors, listed in
//     Top/Right/Bottom/Left order as they sit in the unfolded net (Up's are Back,
//     Right, Front, Left). Each face also has an opposite it never touches. This
//     table is configuration, injected at construction.
// 2.  **Edge Evidence**: The four edge stickers sit at fixed row-major indices
//     (Top=1, Right=5, Bottom=7, Left=3) whatever the rotation. An edge whose color
//     names a neighbor tells us where that neighbor currently is, and therefore how
//     far the face is turned.
// 3.  **Exclusion**: An edge colored like the face itself or its opposite carries no
//     usable position, and neither does an `Unknown` edge. Those stickers are
//     ignored rather than counted as evidence.
// 4.  **Majority Vote**: Every usable edge votes for one rotation. The winner is the
//     mode of the votes, smallest rotation first on ties, so a single misread edge
//     cannot outvote the other three.
// 5.  **Stateless Utility**: Correction reads a `CubeState` and returns a new one
//     alongside the rotation applied to each face.

use crate::core_modules::face::{CubeState, FaceLabel, FaceScan, StickerColor};
use crate::core_modules::face_resolver::ColorScheme;
use crate::error::{Result, ScanError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Row-major indices of the edge stickers in Top, Right, Bottom, Left order.
pub const EDGE_INDICES: [usize; 4] = [1, 5, 7, 3];

const QUARTER_TURNS: u8 = 4;

/// The cube's adjacency, indexed by `FaceLabel::index()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeTopology {
    /// Canonical Top, Right, Bottom, Left neighbors of each face.
    pub neighbors: [[FaceLabel; 4]; 6],
    /// The face on the other side of the cube.
    pub opposites: [FaceLabel; 6],
}

impl Default for CubeTopology {
    /// The standard unfolded net.
    fn default() -> Self {
        use FaceLabel::*;
        Self {
            neighbors: [
                [Back, Right, Front, Left], // Up
                [Up, Back, Down, Front],    // Right
                [Up, Right, Down, Left],    // Front
                [Front, Right, Back, Left], // Down
                [Up, Front, Down, Back],    // Left
                [Up, Left, Down, Right],    // Back
            ],
            opposites: [Down, Left, Back, Up, Right, Front],
        }
    }
}

impl CubeTopology {
    pub fn neighbors(&self, label: FaceLabel) -> [FaceLabel; 4] {
        self.neighbors[label.index()]
    }

    pub fn opposite(&self, label: FaceLabel) -> FaceLabel {
        self.opposites[label.index()]
    }

    /// Opposites must pair up, and a face's neighbors must be the four faces that are
    /// neither itself nor its opposite.
    pub fn validate(&self) -> Result<()> {
        for label in FaceLabel::ALL {
            let opposite = self.opposite(label);
            if opposite == label || self.opposite(opposite) != label {
                return Err(ScanError::InvalidConfig(format!(
                    "topology: {label} and {opposite} are not mutual opposites"
                )));
            }
            let neighbors = self.neighbors(label);
            for other in FaceLabel::ALL {
                let expected = other != label && other != opposite;
                let present = neighbors.iter().filter(|&&n| n == other).count();
                if present != usize::from(expected) {
                    return Err(ScanError::InvalidConfig(format!(
                        "topology: {label} lists {other} as a neighbor {present} times"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The statistical mode of rotation votes, smallest rotation winning ties.
/// Returns `None` when there are no votes.
pub fn rotation_mode(votes: &[u8]) -> Option<u8> {
    if votes.is_empty() {
        return None;
    }
    let mut tally = [0usize; QUARTER_TURNS as usize];
    for &vote in votes {
        tally[(vote % QUARTER_TURNS) as usize] += 1;
    }
    let best = tally.iter().copied().max()?;
    tally
        .iter()
        .position(|&count| count == best)
        .map(|rotation| rotation as u8)
}

/// Detects and undoes each face's quarter-turn rotation.
#[derive(Debug, Clone, Default)]
pub struct OrientationCorrector {
    topology: CubeTopology,
    scheme: ColorScheme,
}

impl OrientationCorrector {
    pub fn new(topology: CubeTopology, scheme: ColorScheme) -> Self {
        Self { topology, scheme }
    }

    /// One vote per usable edge: the clockwise quarter-turns that carry the observed
    /// edge back to its neighbor's canonical position.
    pub fn edge_votes(&self, label: FaceLabel, scan: &FaceScan) -> Vec<u8> {
        let neighbors = self.topology.neighbors(label);
        let opposite = self.topology.opposite(label);
        let mut votes = Vec::with_capacity(EDGE_INDICES.len());

        for (observed_position, &sticker_index) in EDGE_INDICES.iter().enumerate() {
            let color = scan.stickers[sticker_index];
            let Some(edge_face) = self.scheme.label_of(color) else {
                warn!("{label} face: edge {sticker_index} is {color}, skipping");
                continue;
            };
            if edge_face == label || edge_face == opposite {
                warn!(
                    "{label} face: edge {sticker_index} shows {edge_face}'s color {color}, skipping"
                );
                continue;
            }
            let Some(canonical_position) = neighbors.iter().position(|&n| n == edge_face) else {
                continue;
            };
            let rotation = (canonical_position + QUARTER_TURNS as usize - observed_position)
                % QUARTER_TURNS as usize;
            votes.push(rotation as u8);
        }

        debug!("{label} face edge votes: {votes:?}");
        votes
    }

    /// The clockwise quarter-turns needed to bring one face to canonical orientation.
    pub fn detect_rotation(&self, label: FaceLabel, scan: &FaceScan) -> Result<u8> {
        let votes = self.edge_votes(label, scan);
        rotation_mode(&votes).ok_or_else(|| ScanError::NoOrientationVotes {
            face: label,
            expected: self.expected_edge_colors(label),
        })
    }

    fn expected_edge_colors(&self, label: FaceLabel) -> Vec<StickerColor> {
        self.topology
            .neighbors(label)
            .iter()
            .map(|&neighbor| self.scheme.color_of(neighbor))
            .collect()
    }

    /// Returns the re-oriented state and the rotation applied to each face,
    /// indexed by `FaceLabel::index()`.
    pub fn correct(&self, state: &CubeState) -> Result<(CubeState, [u8; 6])> {
        let mut rotations = [0u8; 6];
        let corrected = state.try_map_faces(|label, scan| {
            let rotation = self.detect_rotation(label, scan)?;
            if rotation != 0 {
                info!(
                    "{label} face (scan #{}) turned back by {rotation} clockwise quarter-turn(s)",
                    scan.input_index
                );
            }
            rotations[label.index()] = rotation;
            Ok(scan.rotated(rotation))
        })?;
        Ok((corrected, rotations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StickerColor::*;

    /// Front face with every edge showing its canonical neighbor.
    fn canonical_front() -> FaceScan {
        FaceScan::new(1, [Green, White, Green, Orange, Green, Red, Green, Yellow, Green])
    }

    #[test]
    fn test_mode_majority() {
        assert_eq!(rotation_mode(&[1, 1, 1, 3]), Some(1));
        assert_eq!(rotation_mode(&[2, 0, 2]), Some(2));
        assert_eq!(rotation_mode(&[3]), Some(3));
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        assert_eq!(rotation_mode(&[0, 2]), Some(0));
        assert_eq!(rotation_mode(&[3, 2]), Some(2));
        assert_eq!(rotation_mode(&[3, 3, 1, 1]), Some(1));
        assert_eq!(rotation_mode(&[0, 1, 2, 3]), Some(0));
    }

    #[test]
    fn test_mode_of_nothing() {
        assert_eq!(rotation_mode(&[]), None);
    }

    #[test]
    fn test_canonical_face_needs_no_rotation() {
        let corrector = OrientationCorrector::default();
        let front = canonical_front();
        assert_eq!(corrector.edge_votes(FaceLabel::Front, &front), vec![0, 0, 0, 0]);
        assert_eq!(corrector.detect_rotation(FaceLabel::Front, &front).unwrap(), 0);
    }

    #[test]
    fn test_every_rotation_is_undone() {
        let corrector = OrientationCorrector::default();
        for turns in 0..4u8 {
            let photographed = canonical_front().rotated(turns);
            let rotation = corrector.detect_rotation(FaceLabel::Front, &photographed).unwrap();
            assert_eq!((turns + rotation) % 4, 0, "turned by {turns}, detected {rotation}");
            assert_eq!(photographed.rotated(rotation), canonical_front());
        }
    }

    #[test]
    fn test_single_corrupt_edge_is_outvoted() {
        let corrector = OrientationCorrector::default();
        // Turned clockwise three times: every edge votes 1.
        let photographed = canonical_front().rotated(3);
        assert_eq!(
            corrector.edge_votes(FaceLabel::Front, &photographed),
            vec![1, 1, 1, 1]
        );

        let misreads = StickerColor::ALL.into_iter().chain([Unknown]);
        for misread in misreads {
            for sticker_index in EDGE_INDICES {
                if photographed.stickers[sticker_index] == misread {
                    continue;
                }
                let mut corrupted = photographed.clone();
                corrupted.stickers[sticker_index] = misread;
                let rotation = corrector
                    .detect_rotation(FaceLabel::Front, &corrupted)
                    .unwrap();
                assert_eq!(
                    rotation, 1,
                    "edge {sticker_index} misread as {misread} gave {rotation}"
                );
            }
        }
    }

    #[test]
    fn test_own_and_opposite_colors_are_excluded() {
        let corrector = OrientationCorrector::default();
        let mut scan = canonical_front();
        scan.stickers[1] = Green; // own color
        scan.stickers[5] = Blue; // opposite (Back)
        scan.stickers[7] = Unknown;
        assert_eq!(corrector.edge_votes(FaceLabel::Front, &scan), vec![0]);
    }

    #[test]
    fn test_no_votes_names_face_and_expected_colors() {
        let corrector = OrientationCorrector::default();
        let scan = FaceScan::new(4, [Green; 9]);
        match corrector.detect_rotation(FaceLabel::Front, &scan).unwrap_err() {
            ScanError::NoOrientationVotes { face, expected } => {
                assert_eq!(face, FaceLabel::Front);
                assert_eq!(expected, vec![White, Red, Yellow, Orange]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_topology_is_consistent() {
        assert!(CubeTopology::default().validate().is_ok());

        let mut broken = CubeTopology::default();
        broken.neighbors[0] = [
            FaceLabel::Back,
            FaceLabel::Right,
            FaceLabel::Down,
            FaceLabel::Left,
        ];
        assert!(broken.validate().is_err());

        let mut broken = CubeTopology::default();
        broken.opposites[0] = FaceLabel::Right;
        assert!(broken.validate().is_err());
    }
}
