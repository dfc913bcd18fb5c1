use super::configs::Hist1DConfig;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Weighted 1D histogram with half-open bins `[edge_i, edge_i+1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// `n_bins + 1` strictly increasing edges, fixed at booking.
    pub bin_edges: Vec<f64>,
    /// Sum of weights per bin.
    pub bins: Vec<f64>,
    /// Sum of squared weights per bin.
    pub sumw2: Vec<f64>,
    pub underflow: f64,
    pub overflow: f64,
    pub underflow_sumw2: f64,
    pub overflow_sumw2: f64,
    /// Number of fill calls that landed in a bin or a flow.
    pub entries: u64,
    /// Sum of the weights of every fill, flows included.
    pub total_weight: f64,
}

impl Histogram {
    pub fn new(config: &Hist1DConfig) -> Result<Self> {
        let (low, high) = config.range;
        if config.bins == 0 {
            return Err(AnalysisError::InvalidBinning {
                name: config.name.clone(),
                reason: "at least one bin is required".to_owned(),
            });
        }
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(AnalysisError::InvalidBinning {
                name: config.name.clone(),
                reason: format!("range ({low}, {high}) is not a finite increasing interval"),
            });
        }
        let mut hist = Self::from_edges(&config.name, config.bin_edges())?;
        hist.title = config.title.clone();
        hist.x_label = config.x_label.clone();
        hist.y_label = config.y_label.clone();
        Ok(hist)
    }

    /// Histogram with arbitrary (possibly non-uniform) edges.
    pub fn from_edges(name: &str, bin_edges: Vec<f64>) -> Result<Self> {
        if bin_edges.len() < 2 {
            return Err(AnalysisError::InvalidBinning {
                name: name.to_owned(),
                reason: format!("{} edges cannot define a bin", bin_edges.len()),
            });
        }
        if bin_edges.iter().any(|e| !e.is_finite()) || bin_edges.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(AnalysisError::InvalidBinning {
                name: name.to_owned(),
                reason: "edges must be finite and strictly increasing".to_owned(),
            });
        }
        let n_bins = bin_edges.len() - 1;
        Ok(Self {
            name: name.to_owned(),
            title: name.to_owned(),
            x_label: String::new(),
            y_label: String::new(),
            bin_edges,
            bins: vec![0.0; n_bins],
            sumw2: vec![0.0; n_bins],
            underflow: 0.0,
            overflow: 0.0,
            underflow_sumw2: 0.0,
            overflow_sumw2: 0.0,
            entries: 0,
            total_weight: 0.0,
        })
    }

    pub fn n_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn range(&self) -> (f64, f64) {
        (self.bin_edges[0], self.bin_edges[self.bin_edges.len() - 1])
    }

    // Index of the bin containing x, None when x falls in a flow
    pub fn get_bin_index(&self, x: f64) -> Option<usize> {
        let (low, high) = self.range();
        if !(x >= low && x < high) {
            return None;
        }
        Some(self.bin_edges.partition_point(|&edge| edge <= x) - 1)
    }

    pub fn fill(&mut self, value: f64, weight: f64) {
        if value.is_nan() {
            log::warn!("Dropping NaN fill for histogram '{}'", self.name);
            return;
        }

        let w2 = weight * weight;
        match self.get_bin_index(value) {
            Some(index) => {
                self.bins[index] += weight;
                self.sumw2[index] += w2;
            }
            None if value < self.bin_edges[0] => {
                self.underflow += weight;
                self.underflow_sumw2 += w2;
            }
            None => {
                self.overflow += weight;
                self.overflow_sumw2 += w2;
            }
        }
        self.entries += 1;
        self.total_weight += weight;
    }

    /// Multiply every content by `factor` (squared sums by `factor^2`).
    pub fn scale(&mut self, factor: f64) {
        let factor2 = factor * factor;
        self.bins.iter_mut().for_each(|b| *b *= factor);
        self.sumw2.iter_mut().for_each(|b| *b *= factor2);
        self.underflow *= factor;
        self.overflow *= factor;
        self.underflow_sumw2 *= factor2;
        self.overflow_sumw2 *= factor2;
        self.total_weight *= factor;
    }

    pub fn get_bin_centers(&self) -> Vec<f64> {
        self.bin_edges
            .windows(2)
            .map(|w| 0.5 * (w[0] + w[1]))
            .collect()
    }

    pub fn get_bin_widths(&self) -> Vec<f64> {
        self.bin_edges.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn get_bin_errors(&self) -> Vec<f64> {
        self.sumw2.iter().map(|w2| w2.sqrt()).collect()
    }

    pub fn integral(&self, include_flows: bool) -> f64 {
        let inner: f64 = self.bins.iter().sum();
        if include_flows {
            inner + self.underflow + self.overflow
        } else {
            inner
        }
    }

    /// Weighted mean and standard deviation of the in-range bin centres.
    pub fn get_statistics(&self) -> (f64, f64, f64) {
        let centers = self.get_bin_centers();
        let integral = self.integral(false);
        if integral == 0.0 {
            return (0.0, 0.0, 0.0);
        }

        let mean = centers
            .iter()
            .zip(&self.bins)
            .map(|(c, w)| c * w)
            .sum::<f64>()
            / integral;

        let variance = centers
            .iter()
            .zip(&self.bins)
            .map(|(c, w)| w * (c - mean) * (c - mean))
            .sum::<f64>()
            / integral;

        (integral, mean, variance.max(0.0).sqrt())
    }
}
