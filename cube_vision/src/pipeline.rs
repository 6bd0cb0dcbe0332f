// THEORY:
// The `pipeline` module is the top-level API for the reconstruction engine. It wires
// the stages together in their fixed order and exposes them as a handful of calls:
//
//   image --(GridManager)--> raw samples --(ColorClassifier)--> FaceScan
//   6 x FaceScan --(FaceResolver)--> CubeState --(StateValidator)--> checked
//   --(OrientationCorrector)--> oriented CubeState --(FaceletAssembler)--> facelets
//
// Every stage takes its input by reference and returns a new value, and every
// stage's tunables arrive through `PipelineConfig`. The pipeline holds no state
// between calls, so one instance can serve any number of cubes.

use crate::core_modules::color_classifier::{ColorClassifier, ColorRules};
use crate::core_modules::face::{CubeState, FaceLabel, FaceScan};
use crate::core_modules::face_resolver::{ColorScheme, FaceResolver};
use crate::core_modules::facelet::{FaceletAssembler, FaceletString};
use crate::core_modules::grid_manager::{GridManager, SamplerConfig};
use crate::core_modules::orientation::{CubeTopology, OrientationCorrector};
use crate::core_modules::validator::StateValidator;
use crate::error::{Result, ScanError};
use crate::solver::CubeSolver;
use image::RgbImage;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Number of face photographs a reconstruction needs.
pub const FACE_COUNT: usize = 6;

/// Configuration for the CubePipeline, allowing for tunable behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sampling geometry.
    pub sampler: SamplerConfig,
    /// Ordered color classification rules.
    pub color_rules: ColorRules,
    /// Which center color identifies which face.
    pub color_scheme: ColorScheme,
    /// Neighbor and opposite tables of the unfolded net.
    pub topology: CubeTopology,
}

impl PipelineConfig {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a configuration; missing sections fall back to the reference values.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The result of a successful reconstruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// The string to hand to a solver.
    pub facelets: FaceletString,
    /// The cube after orientation correction.
    pub state: CubeState,
    /// Clockwise quarter-turns applied to each face, indexed by `FaceLabel::index()`.
    pub rotations: [u8; FACE_COUNT],
}

impl Reconstruction {
    pub fn rotation(&self, label: FaceLabel) -> u8 {
        self.rotations[label.index()]
    }
}

/// A reconstruction plus the solver's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub reconstruction: Reconstruction,
    pub moves: Vec<String>,
}

/// The main, top-level struct for the reconstruction engine.
#[derive(Debug, Clone)]
pub struct CubePipeline {
    grid_manager: GridManager,
    classifier: ColorClassifier,
    resolver: FaceResolver,
    validator: StateValidator,
    corrector: OrientationCorrector,
    assembler: FaceletAssembler,
}

impl CubePipeline {
    /// Builds every stage from the configuration, rejecting inconsistent settings.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.color_scheme.validate()?;
        config.topology.validate()?;
        let PipelineConfig {
            sampler,
            color_rules,
            color_scheme,
            topology,
        } = config;

        Ok(Self {
            grid_manager: GridManager::new(sampler)?,
            classifier: ColorClassifier::new(color_rules),
            resolver: FaceResolver::new(color_scheme),
            validator: StateValidator::new(),
            corrector: OrientationCorrector::new(topology, color_scheme),
            assembler: FaceletAssembler::new(color_scheme),
        })
    }

    /// Stages 1-2: sample and classify one face photograph.
    pub fn scan_face(&self, image: &RgbImage, input_index: usize) -> Result<FaceScan> {
        let samples = self.grid_manager.sample_face(image, input_index)?;
        let stickers = self.classifier.classify_all(samples);
        debug!("scan #{input_index}: {stickers:?}");
        Ok(FaceScan::new(input_index, stickers))
    }

    /// Stages 3-6: resolve, validate, orient and assemble six classified scans.
    pub fn reconstruct(&self, scans: &[FaceScan]) -> Result<Reconstruction> {
        let resolved = self.resolver.resolve(scans)?;
        self.validator.validate(&resolved)?;
        let (state, rotations) = self.corrector.correct(&resolved)?;
        let facelets = self.assembler.assemble(&state)?;
        info!("facelets: {facelets}, rotations: {rotations:?}");
        Ok(Reconstruction {
            facelets,
            state,
            rotations,
        })
    }

    /// Runs every stage over six face photographs given in any order.
    pub fn process_images(&self, images: &[RgbImage]) -> Result<Reconstruction> {
        if images.len() != FACE_COUNT {
            return Err(ScanError::WrongScanCount {
                found: images.len(),
            });
        }
        let scans = images
            .iter()
            .enumerate()
            .map(|(index, image)| self.scan_face(image, index + 1))
            .collect::<Result<Vec<_>>>()?;
        self.reconstruct(&scans)
    }

    /// Reconstructs the cube and hands it to `solver`. A refusal is reported verbatim.
    pub fn solve<S: CubeSolver + ?Sized>(
        &self,
        images: &[RgbImage],
        solver: &S,
    ) -> Result<Solution> {
        let reconstruction = self.process_images(images)?;
        let moves = solver
            .solve(&reconstruction.facelets)
            .map_err(ScanError::Solver)?;
        info!("solver returned {} moves", moves.len());
        Ok(Solution {
            reconstruction,
            moves,
        })
    }
}
