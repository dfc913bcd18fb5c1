#![warn(clippy::all, rust_2018_idioms)]

//! Selection and weighted histogramming for simulated pp -> photon + bb + jj
//! events: object selection, an eight-stage cut-flow, kinematic observables,
//! and cross-section normalisation of the booked histograms.

pub mod analysis;
pub mod config;
pub mod cutter;
pub mod error;
pub mod event;
pub mod histoer;
pub mod kinematics;

pub use analysis::{DijetsAnalysis, RunAccumulator, RunResult};
pub use config::{AnalysisConfig, RapidityGapFactor, RunConfig};
pub use error::{AnalysisError, Result};
pub use event::{Event, Jet, Particle};
