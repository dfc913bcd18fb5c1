use std::error::Error;
use std::fmt::Display;

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Which kind of physics object a malformed record belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Particle,
    Jet,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Particle => write!(f, "particle"),
            ObjectKind::Jet => write!(f, "jet"),
        }
    }
}

#[derive(Debug)]
pub enum AnalysisError {
    MalformedObject {
        kind: ObjectKind,
        index: usize,
        reason: String,
    },
    InvalidWeight(f64),
    InvalidBinning {
        name: String,
        reason: String,
    },
    DuplicateHistogram(String),
    UnknownHistogram(String),
    ZeroSumOfWeights(f64),
    InvalidCrossSection(f64),
    InvalidConfig(String),
    File(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Sync,
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> AnalysisError {
        AnalysisError::File(err)
    }
}

impl From<serde_yaml::Error> for AnalysisError {
    fn from(err: serde_yaml::Error) -> AnalysisError {
        AnalysisError::Yaml(err)
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> AnalysisError {
        AnalysisError::Json(err)
    }
}

impl<T> From<std::sync::PoisonError<T>> for AnalysisError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        AnalysisError::Sync
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MalformedObject {
                kind,
                index,
                reason,
            } => write!(f, "Event contains a malformed {kind} at index {index}: {reason}"),
            AnalysisError::InvalidWeight(w) => {
                write!(f, "Event weight {w} is not a finite number")
            }
            AnalysisError::InvalidBinning { name, reason } => {
                write!(f, "Histogram '{name}' has invalid binning: {reason}")
            }
            AnalysisError::DuplicateHistogram(name) => {
                write!(f, "Histogram '{name}' is already booked")
            }
            AnalysisError::UnknownHistogram(name) => {
                write!(f, "Histogram '{name}' was never booked")
            }
            AnalysisError::ZeroSumOfWeights(sow) => write!(
                f,
                "Cannot normalise histograms with a sum of weights of {sow}"
            ),
            AnalysisError::InvalidCrossSection(xs) => {
                write!(f, "Cross-section {xs} must be finite and non-negative")
            }
            AnalysisError::InvalidConfig(x) => write!(f, "Run configuration is invalid: {x}"),
            AnalysisError::File(x) => write!(f, "Run had a file I/O error: {x}"),
            AnalysisError::Yaml(x) => write!(f, "Run had an error parsing YAML: {x}"),
            AnalysisError::Json(x) => write!(f, "Run had an error handling JSON: {x}"),
            AnalysisError::Sync => write!(f, "Run was unable to access a shared accumulator"),
        }
    }
}

impl Error for AnalysisError {}
