use log::debug;
use rayon::prelude::*;

use super::{IonTarget, Scan, Xic, XicError};
use crate::trace::Trace;

/// Extracts per-ion traces from a scan sequence
#[derive(Debug, Clone)]
pub struct XicExtractor {
    ms_level: u8,
}

impl Default for XicExtractor {
    fn default() -> Self {
        Self { ms_level: 1 }
    }
}

impl XicExtractor {
    /// Extractor operating on full (MS1) scans
    pub fn new() -> Self {
        Self::default()
    }

    /// Read scans of another MS level
    pub fn with_ms_level(mut self, ms_level: u8) -> Self {
        self.ms_level = ms_level;
        self
    }

    /// MS level of the scans this extractor reads
    pub fn ms_level(&self) -> u8 {
        self.ms_level
    }

    /// Validate and time-order the scans at this extractor's MS level
    pub fn select_scans<'a>(&self, scans: &'a [Scan]) -> Result<Vec<&'a Scan>, XicError> {
        let mut selected = Vec::with_capacity(scans.len());
        for (position, scan) in scans.iter().enumerate() {
            if scan.ms_level != self.ms_level {
                continue;
            }
            scan.validate(position)?;
            selected.push(scan);
        }
        selected.sort_by(|a, b| a.retention_time.total_cmp(&b.retention_time));
        if let Some(pair) = selected
            .windows(2)
            .find(|w| w[0].retention_time == w[1].retention_time)
        {
            return Err(XicError::DuplicateRetentionTime(pair[0].retention_time));
        }
        Ok(selected)
    }

    /// Extract the chromatogram of one target.
    ///
    /// Each scan contributes at most one sample: the intensity of the data
    /// point whose m/z is nearest the target within the ion's window. Scans
    /// with no point in the window are left out of the trace.
    pub fn extract(&self, scans: &[Scan], target: &IonTarget) -> Result<Xic, XicError> {
        let selected = self.select_scans(scans)?;
        self.extract_from_selected(&selected, target)
    }

    /// Extract chromatograms for several targets over the same scans
    pub fn extract_all(
        &self,
        scans: &[Scan],
        targets: &[IonTarget],
    ) -> Result<Vec<Xic>, XicError> {
        let selected = self.select_scans(scans)?;
        targets
            .iter()
            .map(|target| self.extract_from_selected(&selected, target))
            .collect()
    }

    fn extract_from_selected(
        &self,
        selected: &[&Scan],
        target: &IonTarget,
    ) -> Result<Xic, XicError> {
        if target.custom_range.is_none() {
            target.tolerance.validate()?;
        }
        let window = target.window();

        let mut times = Vec::new();
        let mut values = Vec::new();
        for scan in selected {
            let range = window.index_range(&scan.mz_array);
            let nearest = range.min_by(|&a, &b| {
                let da = (scan.mz_array[a] - target.mz).abs();
                let db = (scan.mz_array[b] - target.mz).abs();
                da.total_cmp(&db)
            });
            if let Some(idx) = nearest {
                times.push(scan.retention_time);
                values.push(scan.intensity_array[idx]);
            }
        }

        let trace = Trace::new(times, values)?;
        let representative_rt = trace.time_of_max();

        debug!(
            "XIC m/z {} [{:.5}, {:.5}]: {} of {} scans matched",
            target.mz,
            window.lower,
            window.upper,
            trace.len(),
            selected.len()
        );

        Ok(Xic {
            target_mz: target.mz,
            window,
            trace,
            representative_rt,
        })
    }

    /// Linearly interpolate a scan onto `axis`; points outside the scan's
    /// m/z range are 0
    pub fn interpolate_onto_axis(&self, scan: &Scan, axis: &[f64]) -> Vec<f64> {
        let mz = &scan.mz_array;
        let intensity = &scan.intensity_array;
        let (first, last) = match (mz.first(), mz.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return vec![0.0; axis.len()],
        };

        axis.iter()
            .map(|&x| {
                if x < first || x > last {
                    return 0.0;
                }
                let j = mz.partition_point(|&m| m < x);
                if j >= mz.len() {
                    return intensity[mz.len() - 1];
                }
                if mz[j] == x || j == 0 {
                    return intensity[j];
                }
                let (x0, x1) = (mz[j - 1], mz[j]);
                let (y0, y1) = (intensity[j - 1], intensity[j]);
                y0 + (y1 - y0) * (x - x0) / (x1 - x0)
            })
            .collect()
    }

    /// Mean of all scans at this extractor's MS level interpolated onto `axis`
    pub fn average_spectrum(&self, scans: &[Scan], axis: &[f64]) -> Result<Vec<f64>, XicError> {
        let selected = self.select_scans(scans)?;
        if selected.is_empty() {
            return Err(XicError::NoScans(self.ms_level));
        }

        let summed = selected
            .par_iter()
            .map(|scan| self.interpolate_onto_axis(scan, axis))
            .reduce(
                || vec![0.0; axis.len()],
                |mut acc, row| {
                    acc.iter_mut().zip(row.iter()).for_each(|(a, r)| *a += r);
                    acc
                },
            );

        let n = selected.len() as f64;
        Ok(summed.into_iter().map(|v| v / n).collect())
    }
}
