pub mod configs;
pub mod histogram1d;
pub mod histogrammer;
