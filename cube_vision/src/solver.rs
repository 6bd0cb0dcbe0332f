// THEORY:
// Solving is not this crate's job. A solver is anything that turns a facelet string
// into a move sequence, or refuses with a reason. The seam is the `CubeSolver`
// trait; the pipeline hands it a validated `FaceletString` and reports a refusal
// verbatim, because a refusal at this point means the cube is well-formed but
// unreachable (a twisted corner, a flipped edge, a parity error) and the solver's
// own words are the best description of that.
//
// `CommandSolver` adapts any solver program that takes the facelet string as an
// argument and prints the moves, such as the common two-phase solver command-line
// tools.

use crate::core_modules::facelet::FaceletString;
use log::debug;
use std::path::PathBuf;
use std::process::Command;

/// A black-box cube solver.
pub trait CubeSolver {
    /// Returns the move sequence, or the solver's own description of why it could not.
    fn solve(&self, facelets: &FaceletString) -> std::result::Result<Vec<String>, String>;
}

impl<F> CubeSolver for F
where
    F: Fn(&FaceletString) -> std::result::Result<Vec<String>, String>,
{
    fn solve(&self, facelets: &FaceletString) -> std::result::Result<Vec<String>, String> {
        self(facelets)
    }
}

/// Runs an external solver program: `program [args...] <facelets>`.
#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }
}

impl CubeSolver for CommandSolver {
    fn solve(&self, facelets: &FaceletString) -> std::result::Result<Vec<String>, String> {
        debug!("running {} on {}", self.program.display(), facelets);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(facelets.as_str())
            .output()
            .map_err(|e| format!("could not run {}: {e}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(if stderr.is_empty() {
                format!("{} exited with {}: {stdout}", self.program.display(), output.status)
            } else {
                stderr
            });
        }
        if stdout.is_empty() {
            return Err(if stderr.is_empty() {
                format!("{} produced no moves", self.program.display())
            } else {
                stderr
            });
        }
        Ok(stdout.split_whitespace().map(str::to_string).collect())
    }
}
