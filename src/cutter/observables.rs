//! Derived quantities of the photon + bb + jj system and the signal histograms
//! they are booked into.

use crate::event::{Jet, Particle};
use crate::histoer::configs::Hist1DConfig;
use crate::kinematics::{FourMomentum, delta_phi};
use std::f64::consts::PI;

pub fn pair_mass(a: &FourMomentum, b: &FourMomentum) -> f64 {
    (*a + *b).mass()
}

pub fn pair_rapidity(a: &FourMomentum, b: &FourMomentum) -> f64 {
    (*a + *b).rapidity()
}

/// `| |eta_a| - |eta_b| |`, the gap as the cuts define it.
pub fn abs_eta_gap(a: &FourMomentum, b: &FourMomentum) -> f64 {
    (a.abs_eta() - b.abs_eta()).abs()
}

/// `|y_a| - |y_b|`, sign kept.
pub fn abs_rapidity_difference(a: &FourMomentum, b: &FourMomentum) -> f64 {
    a.abs_rapidity() - b.abs_rapidity()
}

/// Quantities of a dijet pair needed by the y* veto and the mass cuts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DijetSystem {
    pub mass: f64,
    pub rapidity: f64,
    pub abs_eta_gap: f64,
}

impl DijetSystem {
    pub fn new(first: &Jet, second: &Jet) -> Self {
        Self {
            mass: pair_mass(&first.momentum, &second.momentum),
            rapidity: pair_rapidity(&first.momentum, &second.momentum),
            abs_eta_gap: abs_eta_gap(&first.momentum, &second.momentum),
        }
    }
}

/// Every value filled into the signal histograms for a selected event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observables {
    pub photon_pt: f64,
    pub photon_abs_eta: f64,
    pub dijet_mass: f64,
    pub bjets_mass: f64,
    pub bjet1_pt: f64,
    pub bjet2_pt: f64,
    pub jet1_pt: f64,
    pub jet2_pt: f64,
    pub jj_deltaeta: f64,
    pub bb_deltaeta: f64,
    pub deltarap_jj: f64,
    pub deltaphi_jj: f64,
    pub jet_multiplicity: usize,
    pub bjet_multiplicity: usize,
    /// Rapidity of the extra-jet pair.
    pub y_star: f64,
}

impl Observables {
    pub fn new(
        photon: &Particle,
        bjets: (&Jet, &Jet),
        extra_jets: (&Jet, &Jet),
        jj: DijetSystem,
        bb: DijetSystem,
    ) -> Self {
        let (b1, b2) = bjets;
        let (j1, j2) = extra_jets;
        Self {
            photon_pt: photon.pt(),
            photon_abs_eta: photon.abs_eta(),
            dijet_mass: jj.mass,
            bjets_mass: bb.mass,
            bjet1_pt: b1.pt(),
            bjet2_pt: b2.pt(),
            jet1_pt: j1.pt(),
            jet2_pt: j2.pt(),
            jj_deltaeta: jj.abs_eta_gap,
            bb_deltaeta: bb.abs_eta_gap,
            deltarap_jj: abs_rapidity_difference(&j1.momentum, &j2.momentum),
            deltaphi_jj: delta_phi(j1.phi(), j2.phi()),
            jet_multiplicity: 2,
            bjet_multiplicity: 2,
            y_star: jj.rapidity,
        }
    }

    pub fn value(&self, observable: Observable) -> f64 {
        match observable {
            Observable::DijetMass => self.dijet_mass,
            Observable::PhotonPt => self.photon_pt,
            Observable::BJetsMass => self.bjets_mass,
            Observable::BJet1Pt => self.bjet1_pt,
            Observable::BJet2Pt => self.bjet2_pt,
            Observable::Jet1Pt => self.jet1_pt,
            Observable::Jet2Pt => self.jet2_pt,
            Observable::PhotonEta => self.photon_abs_eta,
            Observable::JJDeltaEta => self.jj_deltaeta,
            Observable::BBDeltaEta => self.bb_deltaeta,
            Observable::DeltaRapJJ => self.deltarap_jj,
            Observable::JetMultiplicity => self.jet_multiplicity as f64,
            Observable::DeltaPhiJJ => self.deltaphi_jj,
            Observable::BJetMultiplicity => self.bjet_multiplicity as f64,
            Observable::Zeppenfeld => self.y_star,
        }
    }
}

/// The signal histograms, filled once per event passing every cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observable {
    DijetMass,
    PhotonPt,
    BJetsMass,
    BJet1Pt,
    BJet2Pt,
    Jet1Pt,
    Jet2Pt,
    PhotonEta,
    JJDeltaEta,
    BBDeltaEta,
    DeltaRapJJ,
    JetMultiplicity,
    DeltaPhiJJ,
    BJetMultiplicity,
    Zeppenfeld,
}

impl Observable {
    pub const ALL: [Observable; 15] = [
        Observable::DijetMass,
        Observable::PhotonPt,
        Observable::BJetsMass,
        Observable::BJet1Pt,
        Observable::BJet2Pt,
        Observable::Jet1Pt,
        Observable::Jet2Pt,
        Observable::PhotonEta,
        Observable::JJDeltaEta,
        Observable::BBDeltaEta,
        Observable::DeltaRapJJ,
        Observable::JetMultiplicity,
        Observable::DeltaPhiJJ,
        Observable::BJetMultiplicity,
        Observable::Zeppenfeld,
    ];

    pub fn config(self) -> Hist1DConfig {
        match self {
            Observable::DijetMass => Hist1DConfig::new("dijet_mass", 100, (500.0, 2000.0))
                .with_labels(
                    "signal_dijet_mass",
                    r"$m\textsubscript{j_1j_2}$",
                    r"$\frac{1}{\sigma}*\frac{d\sigma}{dm\textsubscript{j_1j_2}}$",
                ),
            Observable::PhotonPt => Hist1DConfig::new("photon_pT", 100, (0.0, 200.0))
                .with_labels("signal_photon_pT", "photon_pT", "1/sigma*d_sigma/dpT"),
            Observable::BJetsMass => Hist1DConfig::new("bjets_mass", 100, (80.0, 180.0))
                .with_labels("signal_mass_b1b2", "m_b1b2", "1/sigma*dsigma/dmb1b2"),
            Observable::BJet1Pt => Hist1DConfig::new("bjet1_pT", 100, (0.0, 500.0))
                .with_labels("signal_b1_pT", "b1_pT", "1/sigma*d_sigma/dbb1pT"),
            Observable::BJet2Pt => Hist1DConfig::new("bjet2_pT", 100, (30.0, 230.0))
                .with_labels("signal_b2_pT", "b2_pT", "1/sigma*d_sigma/dbb2pT"),
            Observable::Jet1Pt => Hist1DConfig::new("jet1_pT", 100, (40.0, 180.0))
                .with_labels("signal_j1_pT", "j1_pT", "1/sigma*d_sigma/dj1pT"),
            Observable::Jet2Pt => Hist1DConfig::new("jet2_pT", 100, (40.0, 140.0))
                .with_labels("signal_j2_pT", "j2_pT", "1/sigma*d_sigma/dj2pT"),
            Observable::PhotonEta => Hist1DConfig::new("photon_eta", 30, (0.0, 3.0))
                .with_labels("signal_photon_eta", "photon_eta", "1/sigma*d_sigma/dphoton_eta"),
            Observable::JJDeltaEta => Hist1DConfig::new("jj_deltaeta", 30, (0.0, 6.0))
                .with_labels(
                    "signal_deltaetajj",
                    "delta_etaj1j2",
                    "1/sigma*dsigma/d(deltaetaj1j2)",
                ),
            Observable::BBDeltaEta => Hist1DConfig::new("bb_deltaeta", 30, (0.0, 3.0))
                .with_labels(
                    "signal_deltaetabb",
                    "deltaeta_bb",
                    "1/sigma*dsigma/d(deltaetab1b2)",
                ),
            Observable::DeltaRapJJ => Hist1DConfig::new("deltarap_jj", 40, (0.0, 4.0))
                .with_labels(
                    "signal_deltarap_jj",
                    "deltarap_jj",
                    "1/sigma*dsigma/d(deltarap_jj)",
                ),
            Observable::JetMultiplicity => Hist1DConfig::new("jet_multiplicity", 10, (-0.5, 2.5))
                .with_labels("signal_jet_mult", "N_jet", "1/sigma*dsigma/d(N_jet)"),
            Observable::DeltaPhiJJ => Hist1DConfig::new("deltaphi_jj", 20, (0.0, PI))
                .with_labels("signal_dphi_jj", "dphi_jj", "1/sigma*dsigma/d(dphi)"),
            Observable::BJetMultiplicity => Hist1DConfig::new("bjetmult", 10, (-0.5, 2.5))
                .with_labels("signal_bjetmult", "bjetmult", "1/sigma*dsigma/d(bjetmult)"),
            Observable::Zeppenfeld => Hist1DConfig::new("Zeppenfeld_variable", 10, (-5.0, 5.0))
                .with_labels(
                    "Zeppenfeld_variable",
                    "Zeppenfeld(Z)",
                    "$1/\\sigma * d\\sigma/dZ$",
                ),
        }
    }

    pub fn name(self) -> String {
        self.config().name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn jet(pt: f64, eta: f64, phi: f64) -> Jet {
        Jet::new(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.0), false)
    }

    #[test]
    fn test_signal_histogram_names_are_unique() {
        let names: HashSet<String> = Observable::ALL.iter().map(|o| o.name()).collect();
        assert_eq!(names.len(), Observable::ALL.len());
    }

    #[test]
    fn test_dijet_mass_booking_labels() {
        let config = Observable::DijetMass.config();
        assert_eq!(config.title, "signal_dijet_mass");
        assert_eq!(config.x_label, r"$m\textsubscript{j_1j_2}$");
        assert_eq!(
            config.y_label,
            r"$\frac{1}{\sigma}*\frac{d\sigma}{dm\textsubscript{j_1j_2}}$"
        );
    }

    #[test]
    fn test_abs_eta_gap_uses_absolute_etas() {
        let a = FourMomentum::from_pt_eta_phi_m(50.0, -3.0, 0.0, 0.0);
        let b = FourMomentum::from_pt_eta_phi_m(50.0, 2.0, 0.0, 0.0);
        // |3 - 2|, not |-3 - 2|
        assert!((abs_eta_gap(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_abs_rapidity_difference_keeps_sign() {
        let a = FourMomentum::from_pt_eta_phi_m(50.0, 0.5, 0.0, 0.0);
        let b = FourMomentum::from_pt_eta_phi_m(50.0, -1.5, 0.0, 0.0);
        assert!((abs_rapidity_difference(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_dijet_system() {
        let j1 = jet(80.0, -3.0, 0.0);
        let j2 = jet(70.0, 2.0, PI);
        let jj = DijetSystem::new(&j1, &j2);
        let expected_mass = (2.0 * 80.0 * 70.0 * (5.0_f64.cosh() + 1.0)).sqrt();
        assert!((jj.mass - expected_mass).abs() < 1e-6);
        assert!((jj.abs_eta_gap - 1.0).abs() < 1e-9);
        assert!(jj.rapidity < 0.0);
    }

    #[test]
    fn test_observables_values() {
        let photon = Particle::prompt_photon(FourMomentum::from_pt_eta_phi_m(25.0, -1.0, 1.0, 0.0));
        let (b1, b2) = (jet(60.0, 0.5, 0.0), jet(50.0, -0.3, PI));
        let (j1, j2) = (jet(80.0, -3.0, 0.5), jet(70.0, 2.0, 0.5 + PI));
        let obs = Observables::new(
            &photon,
            (&b1, &b2),
            (&j1, &j2),
            DijetSystem::new(&j1, &j2),
            DijetSystem::new(&b1, &b2),
        );
        assert!((obs.value(Observable::PhotonEta) - 1.0).abs() < 1e-9);
        assert!((obs.value(Observable::BBDeltaEta) - 0.2).abs() < 1e-9);
        assert!((obs.value(Observable::DeltaRapJJ) - 1.0).abs() < 1e-9);
        assert!((obs.value(Observable::DeltaPhiJJ) - PI).abs() < 1e-9);
        assert!((obs.value(Observable::JetMultiplicity) - 2.0).abs() < 1e-12);
        assert_eq!(obs.value(Observable::Zeppenfeld), obs.y_star);
    }
}
