//! Per-collision records handed to the analysis by the event source.
//!
//! The core never builds these itself: photons arrive already classified as
//! prompt or not, and jets arrive already clustered (anti-kt, R = 0.4) with
//! their b-tag decided.

use crate::error::{AnalysisError, ObjectKind, Result};
use crate::kinematics::FourMomentum;
use serde::{Deserialize, Serialize};

/// PDG identifier of the photon.
pub const PHOTON_PID: i32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pid: i32,
    /// Set by the upstream classifier for particles not produced in hadron decays.
    #[serde(default)]
    pub prompt: bool,
    pub momentum: FourMomentum,
}

impl Particle {
    pub fn new(pid: i32, prompt: bool, momentum: FourMomentum) -> Self {
        Self {
            pid,
            prompt,
            momentum,
        }
    }

    pub fn prompt_photon(momentum: FourMomentum) -> Self {
        Self::new(PHOTON_PID, true, momentum)
    }

    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    pub fn eta(&self) -> f64 {
        self.momentum.eta()
    }

    pub fn abs_eta(&self) -> f64 {
        self.momentum.abs_eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }

    pub fn is_prompt_photon(&self) -> bool {
        self.prompt && self.pid.abs() == PHOTON_PID
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    pub momentum: FourMomentum,
    #[serde(default)]
    pub b_tagged: bool,
}

impl Jet {
    pub fn new(momentum: FourMomentum, b_tagged: bool) -> Self {
        Self { momentum, b_tagged }
    }

    pub fn pt(&self) -> f64 {
        self.momentum.pt()
    }

    pub fn eta(&self) -> f64 {
        self.momentum.eta()
    }

    pub fn abs_eta(&self) -> f64 {
        self.momentum.abs_eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }
}

/// Kinematic acceptance applied when querying objects from an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceptance {
    pub max_abs_eta: f64,
    pub min_pt: f64,
}

impl Acceptance {
    pub fn accepts(&self, momentum: &FourMomentum) -> bool {
        momentum.abs_eta() < self.max_abs_eta && momentum.pt() > self.min_pt
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Generator weight; may be negative.
    pub weight: f64,
    #[serde(default)]
    pub particles: Vec<Particle>,
    #[serde(default)]
    pub jets: Vec<Jet>,
}

impl Event {
    pub fn new(weight: f64, particles: Vec<Particle>, jets: Vec<Jet>) -> Self {
        Self {
            weight,
            particles,
            jets,
        }
    }

    /// The event weight, rejected when it is not a finite number.
    pub fn checked_weight(&self) -> Result<f64> {
        if self.weight.is_finite() {
            Ok(self.weight)
        } else {
            Err(AnalysisError::InvalidWeight(self.weight))
        }
    }

    /// Prompt photons inside `acceptance`, hardest first.
    pub fn prompt_photons(&self, acceptance: Acceptance) -> Result<Vec<&Particle>> {
        let mut photons = Vec::new();
        for (index, particle) in self.particles.iter().enumerate() {
            if !particle.is_prompt_photon() {
                continue;
            }
            particle
                .momentum
                .validate()
                .map_err(|reason| AnalysisError::MalformedObject {
                    kind: ObjectKind::Particle,
                    index,
                    reason,
                })?;
            if acceptance.accepts(&particle.momentum) {
                photons.push(particle);
            }
        }
        photons.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
        Ok(photons)
    }

    /// All jets, hardest first. Equal-pT jets keep the order the finder gave them.
    pub fn jets_by_pt(&self) -> Result<Vec<&Jet>> {
        for (index, jet) in self.jets.iter().enumerate() {
            jet.momentum
                .validate()
                .map_err(|reason| AnalysisError::MalformedObject {
                    kind: ObjectKind::Jet,
                    index,
                    reason,
                })?;
        }
        let mut jets: Vec<&Jet> = self.jets.iter().collect();
        jets.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
        Ok(jets)
    }
}
