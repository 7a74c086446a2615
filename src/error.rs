use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A derived kinematic quantity hit a mathematical singularity
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum SingularKinematics {
    #[error("Zero-length momentum has no direction")]
    ZeroMomentum,
    #[error("Velocity undefined for vanishing energy")]
    ZeroEnergy,
    #[error("Rapidity undefined for E = {energy}, pz = {pz}")]
    Rapidity { energy: f64, pz: f64 },
    #[error("Pseudorapidity undefined for |p| = {p3}, pz = {pz}")]
    PseudoRapidity { p3: f64, pz: f64 },
    #[error("Lorentz factor undefined for β = {beta} ≥ 1")]
    Superluminal { beta: f64 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("File format '{extension}' of {path:?} not recognised, only 'lhe' is supported")]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("Malformed particle record in line {line_number}: failed to read {field} from '{line}'")]
    MalformedParticleRecord {
        line_number: usize,
        line: String,
        field: &'static str,
    },
    #[error("Malformed event header in line {line_number}: '{line}'")]
    MalformedEventHeader { line_number: usize, line: String },
    #[error("Encountered malformed xml tag in line {line_number}: '{line}'")]
    MalformedTag { line_number: usize, line: String },
    #[error("Malformed weight in line {line_number}: '{line}'")]
    MalformedWeight { line_number: usize, line: String },
    #[error("Stream ended in line {line_number} inside an event without closing tag")]
    StreamTruncated { line_number: usize },
    #[error("Encountered mis-nested event tag in line {line_number}: '{line}'")]
    MalformedMarkup { line_number: usize, line: String },
    #[error("Malformed histogram in line {line_number} ({reason}): '{line}'")]
    MalformedHistogram {
        line_number: usize,
        line: String,
        reason: &'static str,
    },
    #[error(transparent)]
    SingularKinematics(#[from] SingularKinematics),
}
