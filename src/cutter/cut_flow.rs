//! The sequential selection. Each stage is one bin of the cut-flow histogram;
//! an event stops at the first stage whose predicate fails.

use super::observables::{DijetSystem, Observables};
use super::selector::{SelectedObjects, select_objects};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::event::Event;
use crate::histoer::configs::Hist1DConfig;
use crate::kinematics::delta_r_between;

pub const ISOLATION_DELTA_R: f64 = 0.4;
pub const MIN_DIJET_MASS: f64 = 600.0;
pub const BJETS_MASS_WINDOW: (f64, f64) = (100.0, 140.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CutStage {
    Entry = 0,
    PhotonFound = 1,
    JetMultiplicity = 2,
    PhotonIsolation = 3,
    RapidityGap = 4,
    DijetMass = 5,
    BJetsMass = 6,
    Selected = 7,
}

impl CutStage {
    pub const ALL: [CutStage; 8] = [
        CutStage::Entry,
        CutStage::PhotonFound,
        CutStage::JetMultiplicity,
        CutStage::PhotonIsolation,
        CutStage::RapidityGap,
        CutStage::DijetMass,
        CutStage::BJetsMass,
        CutStage::Selected,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            CutStage::Entry => "all events",
            CutStage::PhotonFound => "prompt photon",
            CutStage::JetMultiplicity => "2 b-jets + 2 jets",
            CutStage::PhotonIsolation => "photon isolation",
            CutStage::RapidityGap => "y* veto",
            CutStage::DijetMass => "m_jj > 600 GeV",
            CutStage::BJetsMass => "100 < m_bb < 140 GeV",
            CutStage::Selected => "selected",
        }
    }

    /// Stages the event was counted in before failing `self`.
    pub fn passed_before(self) -> &'static [CutStage] {
        &STAGES[..self.index()]
    }
}

static STAGES: [CutStage; 8] = CutStage::ALL;

pub fn cut_flow_config() -> Hist1DConfig {
    Hist1DConfig::new("cut_flow", CutStage::ALL.len(), (-0.5, 7.5))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The event failed the given stage.
    Vetoed(CutStage),
    /// Every stage passed.
    Passed(Box<SelectedEvent>),
}

impl Outcome {
    /// Cut-flow stages this event increments, in order.
    pub fn stages(&self) -> &'static [CutStage] {
        match self {
            Outcome::Vetoed(failed) => failed.passed_before(),
            Outcome::Passed(_) => &STAGES,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Outcome::Passed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedEvent {
    pub objects: SelectedObjects,
    pub observables: Observables,
}

/// A jet exactly on the cone edge does not spoil isolation.
pub fn outside_isolation_cone(delta_r: f64) -> bool {
    delta_r >= ISOLATION_DELTA_R
}

/// No b-jet and no extra jet within the isolation cone around the photon.
pub fn photon_is_isolated(objects: &SelectedObjects) -> bool {
    let photon = &objects.photon.momentum;
    objects
        .bjets
        .iter()
        .chain(&objects.extra_jets)
        .all(|jet| outside_isolation_cone(delta_r_between(&jet.momentum, photon)))
}

pub fn passes_rapidity_gap(jj: &DijetSystem, config: &AnalysisConfig) -> bool {
    jj.rapidity <= config.rapidity_gap.value() * jj.abs_eta_gap
}

pub fn passes_dijet_mass(mjj: f64) -> bool {
    mjj >= MIN_DIJET_MASS
}

/// Both window edges are inside.
pub fn passes_bjets_mass(mbb: f64) -> bool {
    let (low, high) = BJETS_MASS_WINDOW;
    mbb >= low && mbb <= high
}

/// Runs the full selection on one event. Pure; commits nothing.
pub fn evaluate(event: &Event, config: &AnalysisConfig) -> Result<Outcome> {
    let Some(objects) = select_objects(event)? else {
        return Ok(Outcome::Vetoed(CutStage::PhotonFound));
    };

    let (&[b1, b2], &[j1, j2]) = (objects.bjets.as_slice(), objects.extra_jets.as_slice()) else {
        return Ok(Outcome::Vetoed(CutStage::JetMultiplicity));
    };

    if !photon_is_isolated(&objects) {
        return Ok(Outcome::Vetoed(CutStage::PhotonIsolation));
    }

    let jj = DijetSystem::new(&j1, &j2);
    if !passes_rapidity_gap(&jj, config) {
        return Ok(Outcome::Vetoed(CutStage::RapidityGap));
    }

    if !passes_dijet_mass(jj.mass) {
        return Ok(Outcome::Vetoed(CutStage::DijetMass));
    }

    let bb = DijetSystem::new(&b1, &b2);
    if !passes_bjets_mass(bb.mass) {
        return Ok(Outcome::Vetoed(CutStage::BJetsMass));
    }

    let observables = Observables::new(&objects.photon, (&b1, &b2), (&j1, &j2), jj, bb);
    Ok(Outcome::Passed(Box::new(SelectedEvent {
        objects,
        observables,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RapidityGapFactor;
    use crate::event::{Jet, Particle};
    use crate::kinematics::FourMomentum;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn jet(pt: f64, eta: f64, phi: f64, b_tagged: bool) -> Jet {
        Jet::new(FourMomentum::from_pt_eta_phi_m(pt, eta, phi, 0.0), b_tagged)
    }

    fn signal_jets() -> Vec<Jet> {
        vec![
            jet(80.0, -3.0, 0.0, false),
            jet(70.0, 2.0, PI, false),
            jet(60.0, 0.5, 0.0, true),
            jet(50.0, -0.3, PI, true),
        ]
    }

    fn photon() -> Particle {
        Particle::prompt_photon(FourMomentum::from_pt_eta_phi_m(25.0, 1.0, FRAC_PI_2, 0.0))
    }

    #[test]
    fn test_signal_event_passes() {
        let event = Event::new(1.0, vec![photon()], signal_jets());
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome.stages().len(), 8);
        let Outcome::Passed(selected) = outcome else {
            panic!("signal event should pass");
        };
        assert!(selected.observables.dijet_mass > MIN_DIJET_MASS);
        assert!(passes_bjets_mass(selected.observables.bjets_mass));
    }

    #[test]
    fn test_no_photon_fails_stage_one() {
        let event = Event::new(1.0, vec![], signal_jets());
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::PhotonFound));
        assert_eq!(outcome.stages(), &[CutStage::Entry]);
    }

    #[test]
    fn test_three_bjets_fail_multiplicity() {
        let mut jets = signal_jets();
        jets.push(jet(35.0, 1.5, 2.0, true));
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::JetMultiplicity));
    }

    #[test]
    fn test_one_extra_jet_fails_multiplicity() {
        let mut jets = signal_jets();
        jets.remove(1);
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::JetMultiplicity));
    }

    #[test]
    fn test_close_bjet_fails_isolation() {
        let mut jets = signal_jets();
        // b-jet at deta = 0.3, same phi as the photon
        jets[2] = jet(60.0, 1.3, FRAC_PI_2, true);
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::PhotonIsolation));
        assert_eq!(outcome.stages().len(), 3);
    }

    fn photon_at(eta: f64, phi: f64) -> Particle {
        Particle::prompt_photon(FourMomentum::from_pt_eta_phi_m(25.0, eta, phi, 0.0))
    }

    #[test]
    fn test_close_extra_jet_fails_isolation() {
        // second extra jet sits at (2.0, pi); the b-jets and the other extra jet are far away
        let event = Event::new(1.0, vec![photon_at(2.2, PI)], signal_jets());
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::PhotonIsolation));
        assert_eq!(
            outcome.stages(),
            &[CutStage::Entry, CutStage::PhotonFound, CutStage::JetMultiplicity]
        );
    }

    #[test]
    fn test_isolation_cone_edge() {
        assert!(outside_isolation_cone(ISOLATION_DELTA_R));
        assert!(!outside_isolation_cone(ISOLATION_DELTA_R.next_down()));
        assert!(outside_isolation_cone(ISOLATION_DELTA_R + 1e-6));
    }

    #[test]
    fn test_extra_jet_just_outside_cone_keeps_photon_isolated() {
        let outside = Event::new(1.0, vec![photon_at(2.0 + 0.4 + 1e-6, PI)], signal_jets());
        assert!(
            evaluate(&outside, &AnalysisConfig::default())
                .unwrap()
                .is_selected()
        );

        let inside = Event::new(1.0, vec![photon_at(2.0 + 0.4 - 1e-6, PI)], signal_jets());
        assert_eq!(
            evaluate(&inside, &AnalysisConfig::default()).unwrap(),
            Outcome::Vetoed(CutStage::PhotonIsolation)
        );
    }

    #[test]
    fn test_rapidity_gap_factor() {
        let jj = DijetSystem {
            mass: 700.0,
            rapidity: 0.4,
            abs_eta_gap: 1.0,
        };
        let half = AnalysisConfig::default();
        let legacy = AnalysisConfig {
            rapidity_gap: RapidityGapFactor::LegacyIntegerHalf,
        };
        assert!(passes_rapidity_gap(&jj, &half));
        assert!(!passes_rapidity_gap(&jj, &legacy));

        let boundary = DijetSystem {
            rapidity: 0.5,
            ..jj
        };
        assert!(passes_rapidity_gap(&boundary, &half));
        let above = DijetSystem {
            rapidity: 0.6,
            ..jj
        };
        assert!(!passes_rapidity_gap(&above, &half));
    }

    #[test]
    fn test_forward_boosted_pair_fails_rapidity_gap() {
        let jets = vec![
            jet(80.0, 2.0, 0.0, false),
            jet(70.0, -1.0, PI, false),
            jet(60.0, 0.5, 0.0, true),
            jet(50.0, -0.3, PI, true),
        ];
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::RapidityGap));
    }

    #[test]
    fn test_low_dijet_mass_fails() {
        let jets = vec![
            jet(80.0, -1.0, 0.0, false),
            jet(70.0, 0.5, PI, false),
            jet(60.0, 0.5, 0.0, true),
            jet(50.0, -0.3, PI, true),
        ];
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::DijetMass));
    }

    #[test]
    fn test_bjets_mass_window_edges() {
        assert!(passes_bjets_mass(100.0));
        assert!(passes_bjets_mass(140.0));
        assert!(passes_bjets_mass(120.0));
        assert!(!passes_bjets_mass(99.999));
        assert!(!passes_bjets_mass(140.001));
    }

    #[test]
    fn test_dijet_mass_edge() {
        assert!(passes_dijet_mass(600.0));
        assert!(!passes_dijet_mass(599.999));
    }

    #[test]
    fn test_bjets_outside_window_fail_last_cut() {
        let mut jets = signal_jets();
        jets[3] = jet(50.0, -0.3, 0.2, true);
        let event = Event::new(1.0, vec![photon()], jets);
        let outcome = evaluate(&event, &AnalysisConfig::default()).unwrap();
        assert_eq!(outcome, Outcome::Vetoed(CutStage::BJetsMass));
        assert_eq!(outcome.stages().len(), 6);
    }

    #[test]
    fn test_cut_flow_config_matches_stages() {
        let config = cut_flow_config();
        assert_eq!(config.bins, CutStage::ALL.len());
        assert_eq!(CutStage::Selected.index(), 7);
    }
}
