//! # Compound Module
//!
//! A [`Compound`] is a named group of target ions. Per-file results are
//! collected in a [`CompoundResult`], created fresh for every processed
//! file and never shared between files.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationParameters;
use crate::peak::{LcPeak, PeakRecord};
use crate::xic::{IonTarget, MassTolerance, Xic};

/// A named analyte with its target ions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    /// Compound name, unique within a run
    pub name: String,

    /// Target ions in configuration order
    pub targets: Vec<IonTarget>,

    /// Optional label per ion (adduct, fragment), parallel to `targets`
    #[serde(default)]
    pub ion_info: Vec<String>,
}

impl Compound {
    /// Compound whose ions use the default tolerance
    pub fn new(name: impl Into<String>, ions: &[f64]) -> Self {
        Self {
            name: name.into(),
            targets: ions.iter().map(|&mz| IonTarget::new(mz)).collect(),
            ion_info: Vec::new(),
        }
    }

    /// Attach ion labels
    pub fn with_ion_info(mut self, info: Vec<String>) -> Self {
        self.ion_info = info;
        self
    }

    /// Apply one tolerance to every ion without a custom range
    pub fn with_tolerance(mut self, tolerance: MassTolerance) -> Self {
        for target in &mut self.targets {
            target.tolerance = tolerance;
        }
        self
    }

    /// Set a custom window for the ion at `mz`; returns false if no ion matches
    pub fn set_custom_range(&mut self, mz: f64, lower: f64, upper: f64) -> bool {
        match self.targets.iter_mut().find(|t| t.mz == mz) {
            Some(target) => {
                target.custom_range = Some((lower, upper));
                true
            }
            None => false,
        }
    }

    /// Label for the ion at `index`: its info string if set, else its m/z
    pub fn ion_label(&self, index: usize) -> String {
        match self.ion_info.get(index) {
            Some(info) if !info.is_empty() => info.clone(),
            _ => self
                .targets
                .get(index)
                .map(|t| t.mz.to_string())
                .unwrap_or_default(),
        }
    }

    /// Whether the compound has no ions
    pub fn has_no_ions(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Everything computed for one ion in one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IonResult {
    /// Ion label (info string or m/z)
    pub label: String,

    /// Extracted chromatogram
    pub xic: Xic,

    /// Integrated MS peak
    pub ms_peak: PeakRecord,

    /// Corrected LC signal at the time nearest the ion's RT
    pub lc_intensity: Option<f64>,

    /// LC peak matched by retention time
    pub lc_peak: Option<LcPeak>,
}

impl IonResult {
    /// Retention time of the most intense scan, 0 when nothing matched
    pub fn rt(&self) -> f64 {
        self.xic.representative_rt.unwrap_or(0.0)
    }

    /// Sum of the ion's extracted intensities
    pub fn intensity_sum(&self) -> f64 {
        self.xic.intensity_sum()
    }
}

/// Per-file result for one compound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundResult {
    /// Compound name
    pub name: String,

    /// File stem the result came from
    pub file: String,

    /// Per-ion results in target order
    pub ions: Vec<IonResult>,

    /// Back-calculated concentration (mM), once a curve was applied
    pub concentration: Option<f64>,

    /// Calibration used for `concentration`
    pub calibration: Option<CalibrationParameters>,
}

impl CompoundResult {
    /// Result with no concentration yet
    pub fn new(name: impl Into<String>, file: impl Into<String>, ions: Vec<IonResult>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            ions,
            concentration: None,
            calibration: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ion_label_fallback() {
        let compound = Compound::new("Alanine", &[90.055, 44.05])
            .with_ion_info(vec!["[M+H]+".to_string(), String::new()]);
        assert_eq!(compound.ion_label(0), "[M+H]+");
        assert_eq!(compound.ion_label(1), "44.05");
        assert_eq!(compound.ion_label(5), "");
    }

    #[test]
    fn test_custom_range_and_tolerance() {
        let mut compound =
            Compound::new("Glycine", &[76.039]).with_tolerance(MassTolerance::Ppm(10.0));
        assert_eq!(compound.targets[0].tolerance, MassTolerance::Ppm(10.0));

        assert!(compound.set_custom_range(76.039, 76.0, 76.1));
        assert!(!compound.set_custom_range(1.0, 0.5, 1.5));
        assert_eq!(compound.targets[0].window().lower, 76.0);
    }

    #[test]
    fn test_empty_compound() {
        assert!(Compound::new("Nothing", &[]).has_no_ions());
    }
}
