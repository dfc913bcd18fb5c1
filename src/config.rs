use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Factor multiplying the extra-jet pseudorapidity gap in the y* veto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RapidityGapFactor {
    /// `y* <= 0.5 * deta_jj`.
    #[default]
    Half,
    /// The historical `1/2` integer division, i.e. `y* <= 0`. Only useful to
    /// reproduce old outputs bit-for-bit.
    LegacyIntegerHalf,
}

impl RapidityGapFactor {
    pub fn value(self) -> f64 {
        match self {
            RapidityGapFactor::Half => 0.5,
            RapidityGapFactor::LegacyIntegerHalf => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub rapidity_gap: RapidityGapFactor,
}

fn default_batch_size() -> usize {
    4096
}

/// Settings for one run of the driver binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total cross-section of the generated sample, in pb.
    pub cross_section: f64,
    /// JSON file holding an array of events.
    pub events: PathBuf,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Where to write the normalised histograms; stdout when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl RunConfig {
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        log::info!("Loaded run configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cross_section.is_finite() || self.cross_section < 0.0 {
            return Err(AnalysisError::InvalidCrossSection(self.cross_section));
        }
        if self.batch_size == 0 {
            return Err(AnalysisError::InvalidConfig(
                "batch_size must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
