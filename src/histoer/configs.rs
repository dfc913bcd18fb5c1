use serde::{Deserialize, Serialize};

/// Booking parameters for a uniformly binned 1D histogram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hist1DConfig {
    pub name: String,      // Lookup key, unique per run
    pub bins: usize,       // Number of bins
    pub range: (f64, f64), // Lower and upper edge
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
}

impl Hist1DConfig {
    pub fn new(name: &str, bins: usize, range: (f64, f64)) -> Self {
        Self {
            name: name.to_owned(),
            bins,
            range,
            title: name.to_owned(),
            x_label: String::new(),
            y_label: String::new(),
        }
    }

    pub fn with_labels(mut self, title: &str, x_label: &str, y_label: &str) -> Self {
        self.title = title.to_owned();
        self.x_label = x_label.to_owned();
        self.y_label = y_label.to_owned();
        self
    }

    /// The `bins + 1` uniformly spaced edges.
    pub fn bin_edges(&self) -> Vec<f64> {
        let (low, high) = self.range;
        let width = (high - low) / self.bins as f64;
        (0..=self.bins)
            .map(|i| {
                if i == self.bins {
                    high
                } else {
                    low + i as f64 * width
                }
            })
            .collect()
    }
}
