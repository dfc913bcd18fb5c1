//! The pp -> photon + bb + jj analysis: booking, per-event processing and the
//! final cross-section normalisation.

use crate::config::AnalysisConfig;
use crate::cutter::cut_flow::{CutStage, Outcome, cut_flow_config, evaluate};
use crate::cutter::observables::Observable;
use crate::error::{AnalysisError, Result};
use crate::event::Event;
use crate::histoer::histogram1d::Histogram;
use crate::histoer::histogrammer::{HistogramHandle, Histogrammer};
use rayon::prelude::*;
use std::sync::Mutex;

pub const ANALYSIS_NAME: &str = "dijets";

/// Run-wide weight bookkeeping, counted once per processed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct WeightSum {
    pub sum_w: f64,
    pub sum_w2: f64,
    pub events: u64,
}

impl WeightSum {
    fn add(&mut self, weight: f64) {
        self.sum_w += weight;
        self.sum_w2 += weight * weight;
        self.events += 1;
    }
}

/// Everything that outlives a single event: the booked histograms and the
/// sum of weights of every processed event, vetoed ones included.
#[derive(Debug)]
pub struct RunAccumulator {
    histogrammer: Histogrammer,
    weights: Mutex<WeightSum>,
}

impl RunAccumulator {
    pub fn new(name: &str) -> Self {
        Self {
            histogrammer: Histogrammer::new(name),
            weights: Mutex::new(WeightSum::default()),
        }
    }

    pub fn histogrammer(&self) -> &Histogrammer {
        &self.histogrammer
    }

    pub fn histogrammer_mut(&mut self) -> &mut Histogrammer {
        &mut self.histogrammer
    }

    pub fn record_event(&self, weight: f64) -> Result<()> {
        self.weights.lock()?.add(weight);
        Ok(())
    }

    pub fn weights(&self) -> Result<WeightSum> {
        Ok(*self.weights.lock()?)
    }

    /// Scales every histogram by `cross_section / sum_of_weights`. Consumes the
    /// accumulator, so it can only happen once and only after every fill.
    pub fn normalize(self, cross_section: f64) -> Result<RunResult> {
        if !cross_section.is_finite() || cross_section < 0.0 {
            return Err(AnalysisError::InvalidCrossSection(cross_section));
        }
        let weights = self.weights.into_inner()?;
        if weights.sum_w == 0.0 || !weights.sum_w.is_finite() {
            log::error!(
                "Refusing to normalise '{}': sum of weights is {} after {} events",
                self.histogrammer.name,
                weights.sum_w,
                weights.events
            );
            return Err(AnalysisError::ZeroSumOfWeights(weights.sum_w));
        }

        let scale_factor = cross_section / weights.sum_w;
        log::info!(
            "Normalising {} histograms: cross-section {} pb / sum of weights {} = {}",
            self.histogrammer.len(),
            cross_section,
            weights.sum_w,
            scale_factor
        );
        self.histogrammer.scale_all(scale_factor)?;

        Ok(RunResult {
            cross_section,
            weights,
            scale_factor,
            histograms: self.histogrammer.snapshot()?,
        })
    }
}

/// Normalised output of a finished run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunResult {
    pub cross_section: f64,
    pub weights: WeightSum,
    pub scale_factor: f64,
    pub histograms: Vec<Histogram>,
}

impl RunResult {
    pub fn histogram(&self, name: &str) -> Option<&Histogram> {
        self.histograms.iter().find(|h| h.name == name)
    }

    /// Normalised cut-flow content per stage.
    pub fn cut_flow_table(&self) -> Vec<(CutStage, f64)> {
        let Some(cut_flow) = self.histogram(&cut_flow_config().name) else {
            return Vec::new();
        };
        CutStage::ALL
            .iter()
            .zip(&cut_flow.bins)
            .map(|(&stage, &value)| (stage, value))
            .collect()
    }
}

/// Counts for one call to `process` / `process_parallel`. Malformed events
/// are listed by their position in the batch; they committed nothing and the
/// rest of the batch is unaffected.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub events: usize,
    pub selected: usize,
    pub errors: Vec<(usize, AnalysisError)>,
}

impl BatchSummary {
    /// A poisoned lock means the accumulator itself is unusable, so it aborts
    /// the batch. Every other error belongs to its event alone.
    fn record(&mut self, index: usize, result: Result<bool>) -> Result<()> {
        match result {
            Ok(selected) => {
                self.events += 1;
                self.selected += usize::from(selected);
            }
            Err(AnalysisError::Sync) => return Err(AnalysisError::Sync),
            Err(err) => {
                log::error!("Skipping event {index} of the batch: {err}");
                self.errors.push((index, err));
            }
        }
        Ok(())
    }

    pub fn rejected(&self) -> usize {
        self.errors.len()
    }
}

pub struct DijetsAnalysis {
    config: AnalysisConfig,
    accumulator: RunAccumulator,
    cut_flow: HistogramHandle,
    signal: Vec<(Observable, HistogramHandle)>,
}

impl DijetsAnalysis {
    /// Books the cut-flow and all signal histograms.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let mut accumulator = RunAccumulator::new(ANALYSIS_NAME);
        let histogrammer = accumulator.histogrammer_mut();

        let mut signal = Vec::with_capacity(Observable::ALL.len());
        for observable in Observable::ALL {
            signal.push((observable, histogrammer.add_hist1d(&observable.config())?));
        }
        let cut_flow = histogrammer.add_hist1d(&cut_flow_config())?;

        log::info!(
            "Booked {} histograms for '{}' (rapidity gap factor {})",
            histogrammer.len(),
            ANALYSIS_NAME,
            config.rapidity_gap.value()
        );

        Ok(Self {
            config,
            accumulator,
            cut_flow,
            signal,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluates one event and commits its fills. Safe to call from several
    /// threads at once. An event that errors commits nothing.
    pub fn analyze(&self, event: &Event) -> Result<Outcome> {
        let weight = event.checked_weight()?;
        let outcome = evaluate(event, &self.config)?;

        self.accumulator.record_event(weight)?;
        for stage in outcome.stages() {
            self.cut_flow.fill(stage.index() as f64, weight)?;
        }

        match &outcome {
            Outcome::Passed(selected) => {
                for (observable, handle) in &self.signal {
                    handle.fill(selected.observables.value(*observable), weight)?;
                }
            }
            Outcome::Vetoed(stage) => {
                log::trace!("Event vetoed at stage {} ({})", stage.index(), stage.label());
            }
        }

        Ok(outcome)
    }

    /// Processes events one after the other, in order.
    pub fn process<'a, I>(&self, events: I) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut summary = BatchSummary::default();
        for (index, event) in events.into_iter().enumerate() {
            summary.record(index, self.analyze(event).map(|outcome| outcome.is_selected()))?;
        }
        Ok(summary)
    }

    /// Processes a batch on the rayon pool. Bin contents agree with `process`
    /// up to floating-point summation order, and so does the summary.
    pub fn process_parallel(&self, events: &[Event]) -> Result<BatchSummary> {
        let results: Vec<Result<bool>> = events
            .par_iter()
            .map(|event| self.analyze(event).map(|outcome| outcome.is_selected()))
            .collect();

        let mut summary = BatchSummary::default();
        for (index, result) in results.into_iter().enumerate() {
            summary.record(index, result)?;
        }
        log::debug!(
            "Processed batch of {} events, {} selected, {} rejected",
            events.len(),
            summary.selected,
            summary.rejected()
        );
        Ok(summary)
    }

    pub fn weights(&self) -> Result<WeightSum> {
        self.accumulator.weights()
    }

    /// Current raw (unnormalised) histograms.
    pub fn snapshot(&self) -> Result<Vec<Histogram>> {
        self.accumulator.histogrammer().snapshot()
    }

    pub fn finalize(self, cross_section: f64) -> Result<RunResult> {
        self.accumulator.normalize(cross_section)
    }
}
