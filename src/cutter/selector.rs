//! Per-event object selection: the leading prompt photon and the b-jet /
//! extra-jet buckets.

use crate::error::Result;
use crate::event::{Acceptance, Event, Jet, Particle};

pub const PHOTON_ACCEPTANCE: Acceptance = Acceptance {
    max_abs_eta: 2.5,
    min_pt: 20.0,
};

pub const BJET_ACCEPTANCE: Acceptance = Acceptance {
    max_abs_eta: 2.5,
    min_pt: 30.0,
};

pub const EXTRA_JET_ACCEPTANCE: Acceptance = Acceptance {
    max_abs_eta: 4.5,
    min_pt: 40.0,
};

/// Objects surviving the per-object cuts for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedObjects {
    pub photon: Particle,
    pub bjets: Vec<Jet>,
    pub extra_jets: Vec<Jet>,
}

/// Where a single jet ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetBucket {
    BJet,
    Extra,
    Dropped,
}

/// A b-tagged jet outside the b-jet acceptance is dropped, never demoted to
/// an extra jet; only untagged jets can be extra jets.
pub fn classify_jet(jet: &Jet) -> JetBucket {
    if jet.b_tagged {
        if BJET_ACCEPTANCE.accepts(&jet.momentum) {
            JetBucket::BJet
        } else {
            JetBucket::Dropped
        }
    } else if EXTRA_JET_ACCEPTANCE.accepts(&jet.momentum) {
        JetBucket::Extra
    } else {
        JetBucket::Dropped
    }
}

/// Returns `None` when the event has no prompt photon in acceptance.
pub fn select_objects(event: &Event) -> Result<Option<SelectedObjects>> {
    let photon = match event.prompt_photons(PHOTON_ACCEPTANCE)?.first() {
        Some(&&photon) => photon,
        None => return Ok(None),
    };

    let mut bjets = Vec::new();
    let mut extra_jets = Vec::new();
    for jet in event.jets_by_pt()? {
        match classify_jet(jet) {
            JetBucket::BJet => bjets.push(*jet),
            JetBucket::Extra => extra_jets.push(*jet),
            JetBucket::Dropped => {}
        }
    }

    Ok(Some(SelectedObjects {
        photon,
        bjets,
        extra_jets,
    }))
}
