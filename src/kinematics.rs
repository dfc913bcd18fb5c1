//! Four-momentum arithmetic and the angular helpers used by the selection.
//!
//! All quantities are in GeV; angles are in radians.

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::ops::Add;

/// Largest tolerated negative `m^2 / E^2` before a vector counts as spacelike.
const MASS2_TOLERANCE: f64 = 1e-9;

/// Plain component layout used on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Components {
    px: f64,
    py: f64,
    pz: f64,
    e: f64,
}

/// Lorentz four-vector stored as `(px, py, pz, E)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Components", into = "Components")]
pub struct FourMomentum(Vector4<f64>);

impl From<Components> for FourMomentum {
    fn from(c: Components) -> Self {
        FourMomentum::new(c.px, c.py, c.pz, c.e)
    }
}

impl From<FourMomentum> for Components {
    fn from(p: FourMomentum) -> Self {
        Components {
            px: p.px(),
            py: p.py(),
            pz: p.pz(),
            e: p.e(),
        }
    }
}

impl Default for FourMomentum {
    fn default() -> Self {
        FourMomentum(Vector4::zeros())
    }
}

impl FourMomentum {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        FourMomentum(Vector4::new(px, py, pz, e))
    }

    /// Build a four-vector from collider coordinates.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, mass: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p = pt * eta.cosh();
        let e = p.hypot(mass);
        FourMomentum::new(px, py, pz, e)
    }

    pub fn px(&self) -> f64 {
        self.0.x
    }

    pub fn py(&self) -> f64 {
        self.0.y
    }

    pub fn pz(&self) -> f64 {
        self.0.z
    }

    pub fn e(&self) -> f64 {
        self.0.w
    }

    pub fn pt(&self) -> f64 {
        self.px().hypot(self.py())
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        self.0.xyz().norm()
    }

    pub fn mass2(&self) -> f64 {
        let p = self.p();
        (self.e() - p) * (self.e() + p)
    }

    /// Invariant mass. Slightly negative `m^2` from rounding is reported as zero.
    pub fn mass(&self) -> f64 {
        self.mass2().max(0.0).sqrt()
    }

    /// Pseudorapidity. Objects along the beam axis get `+-inf`.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt == 0.0 {
            return match self.pz() {
                z if z > 0.0 => f64::INFINITY,
                z if z < 0.0 => f64::NEG_INFINITY,
                _ => 0.0,
            };
        }
        (self.pz() / pt).asinh()
    }

    pub fn abs_eta(&self) -> f64 {
        self.eta().abs()
    }

    /// Azimuthal angle in `[0, 2pi)`.
    pub fn phi(&self) -> f64 {
        if self.px() == 0.0 && self.py() == 0.0 {
            return 0.0;
        }
        map_zero_to_2pi(self.py().atan2(self.px()))
    }

    /// Rapidity `0.5 * ln((E + pz) / (E - pz))`.
    pub fn rapidity(&self) -> f64 {
        0.5 * ((self.e() + self.pz()) / (self.e() - self.pz())).ln()
    }

    pub fn abs_rapidity(&self) -> f64 {
        self.rapidity().abs()
    }

    /// Checks that the vector could have come from a physical object.
    pub fn validate(&self) -> Result<(), String> {
        if self.0.iter().any(|c| !c.is_finite()) {
            return Err(format!(
                "non-finite component in (px, py, pz, E) = ({}, {}, {}, {})",
                self.px(),
                self.py(),
                self.pz(),
                self.e()
            ));
        }
        if self.e() < 0.0 {
            return Err(format!("negative energy {}", self.e()));
        }
        let e2 = self.e() * self.e();
        if self.mass2() < -MASS2_TOLERANCE * e2 {
            return Err(format!(
                "spacelike momentum, |p| = {} exceeds E = {}",
                self.p(),
                self.e()
            ));
        }
        Ok(())
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum(self.0 + rhs.0)
    }
}

fn map_zero_to_2pi(angle: f64) -> f64 {
    let mapped = angle.rem_euclid(TAU);
    if mapped >= TAU { 0.0 } else { mapped }
}

/// Azimuthal separation folded into `[0, pi]`.
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let dphi = (phi1 - phi2).rem_euclid(TAU);
    if dphi > PI { TAU - dphi } else { dphi }
}

/// `sqrt(deta^2 + dphi^2)` from explicit coordinates.
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    (eta1 - eta2).hypot(delta_phi(phi1, phi2))
}

/// Angular distance between two momenta in pseudorapidity-azimuth space.
pub fn delta_r_between(a: &FourMomentum, b: &FourMomentum) -> f64 {
    delta_r(a.eta(), a.phi(), b.eta(), b.phi())
}
