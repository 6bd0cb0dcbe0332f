// THEORY:
// This file is the main entry point for the `cube_vision` library crate. It turns
// six photographs of a Rubik's cube into the 54-letter facelet string that
// standard solvers consume.
//
// The public face of the crate is `CubePipeline` (and its concurrent wrapper
// `ParallelPipeline`) together with `PipelineConfig`, `Reconstruction` and the
// `CubeSolver` seam. The stage types under `core_modules` stay public so callers
// can drive a single stage, such as feeding hand-entered scans to
// `CubePipeline::reconstruct`.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod solver;

pub use core_modules::face::{CubeState, FaceLabel, FaceScan, StickerColor};
pub use core_modules::facelet::FaceletString;
pub use error::{Result, ScanError};
pub use parallel_pipeline::ParallelPipeline;
pub use pipeline::{CubePipeline, PipelineConfig, Reconstruction, Solution};
pub use solver::{CommandSolver, CubeSolver};
