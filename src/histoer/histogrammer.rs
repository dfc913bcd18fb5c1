use super::configs::Hist1DConfig;
use super::histogram1d::Histogram;
use crate::error::{AnalysisError, Result};
use fnv::FnvHashMap;

use std::sync::{Arc, Mutex};

/// Shared handle to one booked histogram. Each histogram has its own lock, so
/// workers filling different histograms never contend.
#[derive(Debug, Clone)]
pub struct HistogramHandle(Arc<Mutex<Histogram>>);

impl HistogramHandle {
    pub fn fill(&self, value: f64, weight: f64) -> Result<()> {
        self.0.lock()?.fill(value, weight);
        Ok(())
    }

    pub fn scale(&self, factor: f64) -> Result<()> {
        self.0.lock()?.scale(factor);
        Ok(())
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<Histogram> {
        Ok(self.0.lock()?.clone())
    }
}

/// Named set of histograms, kept in booking order.
#[derive(Debug, Default)]
pub struct Histogrammer {
    pub name: String,
    handles: Vec<HistogramHandle>,
    index: FnvHashMap<String, usize>,
}

impl Histogrammer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            handles: Vec::new(),
            index: FnvHashMap::default(),
        }
    }

    pub fn add_hist1d(&mut self, config: &Hist1DConfig) -> Result<HistogramHandle> {
        if self.index.contains_key(&config.name) {
            log::error!("Histogram '{}' already exists in '{}'", config.name, self.name);
            return Err(AnalysisError::DuplicateHistogram(config.name.clone()));
        }

        let hist = Histogram::new(config)?;
        let handle = HistogramHandle(Arc::new(Mutex::new(hist)));
        self.index.insert(config.name.clone(), self.handles.len());
        self.handles.push(handle.clone());

        log::debug!(
            "Booked histogram '{}' with {} bins over [{}, {})",
            config.name,
            config.bins,
            config.range.0,
            config.range.1
        );
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Result<HistogramHandle> {
        self.index
            .get(name)
            .map(|&i| self.handles[i].clone())
            .ok_or_else(|| AnalysisError::UnknownHistogram(name.to_owned()))
    }

    pub fn fill_hist1d(&self, name: &str, value: f64, weight: f64) -> Result<()> {
        self.get(name)?.fill(value, weight)
    }

    pub fn scale_all(&self, factor: f64) -> Result<()> {
        for handle in &self.handles {
            handle.scale(factor)?;
        }
        Ok(())
    }

    /// Copies of every histogram in booking order.
    pub fn snapshot(&self) -> Result<Vec<Histogram>> {
        self.handles.iter().map(HistogramHandle::snapshot).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_duplicate_booking_is_rejected() {
        let mut histogrammer = Histogrammer::new("test");
        histogrammer
            .add_hist1d(&Hist1DConfig::new("a", 10, (0.0, 1.0)))
            .unwrap();
        assert!(matches!(
            histogrammer.add_hist1d(&Hist1DConfig::new("a", 5, (0.0, 2.0))),
            Err(AnalysisError::DuplicateHistogram(_))
        ));
        assert_eq!(histogrammer.len(), 1);
    }

    #[test]
    fn test_unknown_histogram() {
        let histogrammer = Histogrammer::new("test");
        assert!(matches!(
            histogrammer.fill_hist1d("missing", 1.0, 1.0),
            Err(AnalysisError::UnknownHistogram(_))
        ));
    }

    #[test]
    fn test_handle_and_name_fill_the_same_histogram() {
        let mut histogrammer = Histogrammer::new("test");
        let handle = histogrammer
            .add_hist1d(&Hist1DConfig::new("a", 2, (0.0, 2.0)))
            .unwrap();
        handle.fill(0.5, 1.0).unwrap();
        histogrammer.fill_hist1d("a", 0.5, 2.0).unwrap();
        let hist = handle.snapshot().unwrap();
        assert!((hist.bins[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_fills() {
        let mut histogrammer = Histogrammer::new("test");
        let handle = histogrammer
            .add_hist1d(&Hist1DConfig::new("a", 4, (0.0, 4.0)))
            .unwrap();
        (0..1000).into_par_iter().for_each(|i| {
            handle.fill((i % 4) as f64, 1.0).unwrap();
        });
        let hist = histogrammer.snapshot().unwrap().remove(0);
        assert_eq!(hist.entries, 1000);
        assert!(hist.bins.iter().all(|&b| (b - 250.0).abs() < 1e-9));
    }

    #[test]
    fn test_scale_all_keeps_booking_order() {
        let mut histogrammer = Histogrammer::new("test");
        for name in ["z", "a", "m"] {
            histogrammer
                .add_hist1d(&Hist1DConfig::new(name, 1, (0.0, 1.0)))
                .unwrap()
                .fill(0.5, 2.0)
                .unwrap();
        }
        histogrammer.scale_all(0.25).unwrap();
        let hists = histogrammer.snapshot().unwrap();
        let names: Vec<&str> = hists.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert!(hists.iter().all(|h| (h.bins[0] - 0.5).abs() < 1e-12));
    }
}
