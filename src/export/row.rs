use serde::{Deserialize, Serialize};

use crate::compound::{CompoundResult, IonResult};
use crate::peak::PeakRecord;
use crate::pipeline::SampleResult;
use crate::stats::round_to;

/// One exported `(file, compound, ion)` row. Missing values are written as
/// 0 and missing integrations as `"none"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// File stem
    #[serde(rename = "File")]
    pub file: String,
    /// Target m/z
    #[serde(rename = "Ion (m/z)")]
    pub ion_mz: f64,
    /// Compound name
    #[serde(rename = "Compound")]
    pub compound: String,
    /// Retention time of the most intense scan, 3 decimals
    #[serde(rename = "RT (min)")]
    pub rt: f64,
    /// Rounded sum of extracted intensities
    #[serde(rename = "MS Intensity (cps)")]
    pub ms_intensity: f64,
    /// Corrected LC signal at the ion's RT
    #[serde(rename = "LC Intensity (a.u.)")]
    pub lc_intensity: f64,
    /// Ion label, or its m/z when unlabelled
    #[serde(rename = "Ion name")]
    pub ion_name: String,

    /// MS peak total area
    #[serde(rename = "MS Peak Area (Total)")]
    pub ms_total_area: f64,
    /// MS peak area above the local baseline
    #[serde(rename = "MS Peak Area (Baseline Corrected)")]
    pub ms_corrected_area: f64,
    /// MS peak start
    #[serde(rename = "MS Peak Start Time (min)")]
    pub ms_start_time: f64,
    /// MS peak end
    #[serde(rename = "MS Peak End Time (min)")]
    pub ms_end_time: f64,
    /// MS peak height
    #[serde(rename = "MS Peak Height")]
    pub ms_height: f64,
    /// MS peak SNR
    #[serde(rename = "MS Peak SNR")]
    pub ms_snr: f64,
    /// MS peak quality score
    #[serde(rename = "MS Peak Quality Score")]
    pub ms_quality: f64,
    /// MS integration method tag
    #[serde(rename = "MS Integration Method")]
    pub ms_method: String,

    /// Matched LC peak total area
    #[serde(rename = "LC Peak Area (Total)")]
    pub lc_total_area: f64,
    /// Matched LC peak corrected area
    #[serde(rename = "LC Peak Area (Baseline Corrected)")]
    pub lc_corrected_area: f64,
    /// Matched LC peak start
    #[serde(rename = "LC Peak Start Time (min)")]
    pub lc_start_time: f64,
    /// Matched LC peak end
    #[serde(rename = "LC Peak End Time (min)")]
    pub lc_end_time: f64,
    /// Matched LC peak height
    #[serde(rename = "LC Peak Height")]
    pub lc_height: f64,
    /// Matched LC peak SNR
    #[serde(rename = "LC Peak SNR")]
    pub lc_snr: f64,
    /// Matched LC peak quality score
    #[serde(rename = "LC Peak Quality Score")]
    pub lc_quality: f64,
    /// Matched LC integration method tag
    #[serde(rename = "LC Integration Method")]
    pub lc_method: String,

    /// Back-calculated concentration
    #[serde(rename = "Concentration (mM)")]
    pub concentration: f64,
    /// Slope of the curve used
    #[serde(rename = "Calibration slope")]
    pub calibration_slope: f64,
    /// Intercept of the curve used
    #[serde(rename = "Calibration intercept")]
    pub calibration_intercept: f64,
    /// R² of the curve used
    #[serde(rename = "Calibration R2")]
    pub calibration_r2: f64,
}

struct PeakColumns {
    total: f64,
    corrected: f64,
    start: f64,
    end: f64,
    height: f64,
    snr: f64,
    quality: f64,
    method: String,
}

impl PeakColumns {
    fn from_record(record: Option<&PeakRecord>) -> Self {
        let none = PeakRecord::none();
        let r = record.unwrap_or(&none);
        Self {
            total: r.total_area,
            corrected: r.baseline_corrected_area,
            start: r.start_time,
            end: r.end_time,
            height: r.peak_height,
            snr: r.snr,
            quality: r.quality_score,
            method: r.integration_method.to_string(),
        }
    }
}

impl ResultRow {
    /// Row for one ion of a compound result
    pub fn new(result: &CompoundResult, ion: &IonResult) -> Self {
        let ms = PeakColumns::from_record(Some(&ion.ms_peak));
        let lc = PeakColumns::from_record(ion.lc_peak.as_ref().map(|p| &p.record));
        let calibration = result.calibration.as_ref();

        Self {
            file: result.file.clone(),
            ion_mz: ion.xic.target_mz,
            compound: result.name.clone(),
            rt: round_to(ion.rt(), 3),
            ms_intensity: ion.intensity_sum().round(),
            lc_intensity: ion.lc_intensity.unwrap_or(0.0),
            ion_name: ion.label.trim().to_string(),
            ms_total_area: ms.total,
            ms_corrected_area: ms.corrected,
            ms_start_time: ms.start,
            ms_end_time: ms.end,
            ms_height: ms.height,
            ms_snr: ms.snr,
            ms_quality: ms.quality,
            ms_method: ms.method,
            lc_total_area: lc.total,
            lc_corrected_area: lc.corrected,
            lc_start_time: lc.start,
            lc_end_time: lc.end,
            lc_height: lc.height,
            lc_snr: lc.snr,
            lc_quality: lc.quality,
            lc_method: lc.method,
            concentration: result.concentration.unwrap_or(0.0),
            calibration_slope: calibration.map_or(0.0, |c| c.slope),
            calibration_intercept: calibration.map_or(0.0, |c| c.intercept),
            calibration_r2: calibration.map_or(0.0, |c| c.r_squared),
        }
    }

    /// Rows for every compound result
    pub fn from_compound(result: &CompoundResult) -> Vec<Self> {
        result.ions.iter().map(|ion| Self::new(result, ion)).collect()
    }

    /// Rows for a whole batch, in sample, compound and ion order
    pub fn from_samples(samples: &[SampleResult]) -> Vec<Self> {
        samples
            .iter()
            .flat_map(|s| s.compounds.iter())
            .flat_map(Self::from_compound)
            .collect()
    }
}
