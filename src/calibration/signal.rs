use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compound::IonResult;

/// Which quantity of an ion is used as its calibration signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMethod {
    /// Baseline-corrected MS peak area, falling back per ion to the
    /// intensity sum when no positive area exists
    PeakArea,
    /// Rounded sum of the ion's extracted intensities
    IntensitySum,
}

impl SignalMethod {
    /// Method recorded by a curve's `use_peak_area` flag
    pub fn from_peak_area_flag(use_peak_area: bool) -> Self {
        if use_peak_area {
            SignalMethod::PeakArea
        } else {
            SignalMethod::IntensitySum
        }
    }
}

impl fmt::Display for SignalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMethod::PeakArea => f.write_str("peak_area"),
            SignalMethod::IntensitySum => f.write_str("intensity_sum"),
        }
    }
}

/// Signal of a compound across its ions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundSignal {
    /// Summed signal
    pub value: f64,
    /// Whether at least one ion contributed a peak area
    pub peak_area_used: bool,
}

/// Signal of a single ion under `method`
pub fn ion_signal(ion: &IonResult, method: SignalMethod) -> (f64, bool) {
    let area = ion.ms_peak.baseline_corrected_area;
    if method == SignalMethod::PeakArea && area > 0.0 {
        (area, true)
    } else {
        (ion.intensity_sum().round(), false)
    }
}

/// Sum of [`ion_signal`] over every ion of a compound
pub fn compound_signal(ions: &[IonResult], method: SignalMethod) -> CompoundSignal {
    ions.iter().fold(
        CompoundSignal {
            value: 0.0,
            peak_area_used: false,
        },
        |acc, ion| {
            let (value, used) = ion_signal(ion, method);
            CompoundSignal {
                value: acc.value + value,
                peak_area_used: acc.peak_area_used || used,
            }
        },
    )
}
