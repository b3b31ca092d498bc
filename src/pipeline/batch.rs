use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::Sender;
use log::{error, info, warn};
use rayon::prelude::*;

use super::progress::ProgressSink;
use super::{
    BatchOutcome, CalibrationOutcome, CancellationToken, LcAnalysis, PipelineConfig,
    PipelineError, ProgressEvent, SampleInput, SampleResult, UnitFailure,
};
use crate::baseline::BaselineCorrector;
use crate::calibration::{
    parse_concentration, CalibrationCurve, CalibrationEngine, CalibrationSample,
};
use crate::compound::{Compound, CompoundResult, IonResult};
use crate::measurement::ConcentrationMap;
use crate::peak::{detect_lc_peaks, PeakIntegrator, PeakRecord, TraceOrigin};
use crate::trace::Trace;
use crate::xic::{IonTarget, Xic, XicExtractor};

/// Batch quantitation over many measurements.
///
/// Files are processed independently on the rayon pool. Calibration fans
/// out per compound and fits each curve once all of its standards are in;
/// quantitation then reads the finished curves concurrently.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    compounds: Vec<Compound>,
    cancel: CancellationToken,
    progress: ProgressSink,
}

impl Pipeline {
    /// Create a pipeline for `compounds`.
    ///
    /// A configured mass tolerance replaces each ion's own tolerance unless
    /// the ion has a custom range.
    pub fn new(config: PipelineConfig, mut compounds: Vec<Compound>) -> Result<Self, PipelineError> {
        if compounds.is_empty() {
            return Err(PipelineError::NoCompounds);
        }
        let mut seen = HashSet::new();
        for compound in &compounds {
            if !seen.insert(compound.name.as_str()) {
                return Err(PipelineError::DuplicateCompound(compound.name.clone()));
            }
        }
        if let Some(tolerance) = config.mass_tolerance {
            for target in compounds.iter_mut().flat_map(|c| c.targets.iter_mut()) {
                if target.custom_range.is_none() {
                    target.tolerance = tolerance;
                }
            }
        }
        Ok(Self {
            config,
            compounds,
            cancel: CancellationToken::new(),
            progress: ProgressSink::default(),
        })
    }

    /// Share a cancellation token with the caller
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Send progress events to `sender`
    pub fn with_progress(mut self, sender: Sender<ProgressEvent>) -> Self {
        self.progress = ProgressSink::new(Some(sender));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compounds, with any tolerance override applied
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Token controlling this pipeline
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Process one measurement: extract and integrate every ion, and
    /// baseline-correct and peak-pick the LC trace when present
    pub fn process_sample(&self, input: &SampleInput) -> Result<SampleResult, PipelineError> {
        let lc = input
            .chromatogram
            .as_ref()
            .map(|trace| self.analyse_lc(trace))
            .transpose()?;

        let extractor = XicExtractor::new().with_ms_level(self.config.ms_level);
        let targets: Vec<IonTarget> = self
            .compounds
            .iter()
            .flat_map(|c| c.targets.iter().cloned())
            .collect();
        let mut xics = extractor.extract_all(&input.scans, &targets)?.into_iter();

        let integrator = PeakIntegrator::new(self.config.ms_integration.clone());
        let compounds = self
            .compounds
            .iter()
            .map(|compound| {
                let ions = xics
                    .by_ref()
                    .take(compound.targets.len())
                    .enumerate()
                    .map(|(i, xic)| {
                        self.ion_result(compound.ion_label(i), xic, &integrator, lc.as_ref())
                    })
                    .collect();
                CompoundResult::new(compound.name.clone(), input.name.clone(), ions)
            })
            .collect();

        Ok(SampleResult {
            name: input.name.clone(),
            compounds,
            lc,
        })
    }

    fn analyse_lc(&self, trace: &Trace) -> Result<LcAnalysis, PipelineError> {
        let correction = BaselineCorrector::new(self.config.baseline.clone()).correct(trace)?;
        let peaks = detect_lc_peaks(&correction.corrected, &self.config.lc_integration);
        Ok(LcAnalysis { correction, peaks })
    }

    fn ion_result(
        &self,
        label: String,
        xic: Xic,
        integrator: &PeakIntegrator,
        lc: Option<&LcAnalysis>,
    ) -> IonResult {
        let rt = xic.representative_rt;
        let ms_peak = match rt {
            Some(rt) => integrator.integrate_or_fallback(&xic.trace, rt, TraceOrigin::MsXic),
            None => PeakRecord::none(),
        };
        let (lc_intensity, lc_peak) = match (lc, rt) {
            (Some(lc), Some(rt)) if rt > 0.0 => (
                lc.correction.corrected.value_nearest(rt),
                lc.peaks.peak_at_rt(rt, self.config.rt_tolerance).cloned(),
            ),
            _ => (None, None),
        };
        IonResult {
            label,
            xic,
            ms_peak,
            lc_intensity,
            lc_peak,
        }
    }

    /// Process every file in parallel. A failing file is logged and
    /// recorded; the rest of the batch continues.
    pub fn process_batch(&self, inputs: &[SampleInput]) -> BatchOutcome {
        let total = inputs.len();
        let completed = AtomicUsize::new(0);
        info!("Processing {} files", total);

        let results: Vec<Result<SampleResult, PipelineError>> = inputs
            .par_iter()
            .map(|input| {
                if self.cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled(input.name.clone()));
                }
                let result = self.process_sample(input);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                match &result {
                    Ok(_) => info!("Processed {} ({}/{})", input.name, done, total),
                    Err(e) => {
                        error!("Failed to process {}: {}", input.name, e);
                        self.progress.send(ProgressEvent::FileFailed {
                            file: input.name.clone(),
                            message: e.to_string(),
                        });
                    }
                }
                self.progress.send(ProgressEvent::FileProcessed {
                    file: input.name.clone(),
                    completed: done,
                    total,
                });
                result
            })
            .collect();

        let mut outcome = BatchOutcome::default();
        for (input, result) in inputs.iter().zip(results) {
            match result {
                Ok(sample) => outcome.samples.push(sample),
                Err(PipelineError::Cancelled(name)) => outcome.skipped.push(name),
                Err(e) => outcome.failures.push(UnitFailure::new(input.name.clone(), e)),
            }
        }
        if self.cancel.is_cancelled() {
            warn!("Batch cancelled, {} files skipped", outcome.skipped.len());
            self.progress.send(ProgressEvent::Cancelled);
            outcome.cancelled = true;
        }
        outcome
    }

    /// Fit a curve per compound from the samples named in `concentrations`
    /// (file stem to concentration string). Blank concentrations are
    /// skipped; of two standards with the same concentration the later one
    /// in `concentrations` is used. A compound without enough usable
    /// standards stays uncalibrated.
    pub fn calibrate(
        &self,
        samples: &[SampleResult],
        concentrations: &ConcentrationMap,
    ) -> CalibrationOutcome {
        let mut outcome = CalibrationOutcome::default();

        let mut standards: Vec<(f64, &SampleResult)> = Vec::new();
        for (file, text) in concentrations.iter() {
            let concentration = match parse_concentration(text) {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(e) => {
                    error!("Skipping calibration file {}: {}", file, e);
                    outcome.failures.push(UnitFailure::new(file, e));
                    continue;
                }
            };
            match samples.iter().find(|s| s.name == file) {
                Some(sample) => standards.push((concentration, sample)),
                None => {
                    error!("No xics found for file {}.", file);
                    let error = PipelineError::MissingSample(file.to_string());
                    outcome.failures.push(UnitFailure::new(file, error));
                }
            }
        }

        let engine = CalibrationEngine::new(self.config.calibration);
        let fitted: Vec<(String, Result<CalibrationCurve, PipelineError>)> = self
            .compounds
            .par_iter()
            .map(|compound| {
                if self.cancel.is_cancelled() {
                    let name = compound.name.clone();
                    return (name.clone(), Err(PipelineError::Cancelled(name)));
                }
                let points: Vec<CalibrationSample<'_>> = standards
                    .iter()
                    .filter_map(|(concentration, sample)| {
                        sample.compound(&compound.name).map(|r| CalibrationSample {
                            concentration: *concentration,
                            ions: &r.ions,
                        })
                    })
                    .collect();
                let curve = engine
                    .build_curve(compound, &points)
                    .map_err(PipelineError::from);
                if let Ok(curve) = &curve {
                    self.progress.send(ProgressEvent::CompoundCalibrated {
                        compound: compound.name.clone(),
                        r_squared: curve.parameters().r_squared,
                    });
                }
                (compound.name.clone(), curve)
            })
            .collect();

        for (name, result) in fitted {
            match result {
                Ok(curve) => {
                    outcome.curves.insert(name, curve);
                }
                Err(PipelineError::Cancelled(_)) => {}
                Err(e) => outcome.failures.push(UnitFailure::new(name, e)),
            }
        }
        outcome
    }

    /// Back-calculate every compound's concentration from its curve.
    /// Compounds without a curve keep `concentration == None`.
    pub fn quantify(&self, samples: &mut [SampleResult], curves: &BTreeMap<String, CalibrationCurve>) {
        samples.par_iter_mut().for_each(|sample| {
            for result in &mut sample.compounds {
                if let Some(curve) = curves.get(&result.name) {
                    result.concentration = Some(curve.quantify(&result.ions));
                    result.calibration = Some(*curve.parameters());
                }
            }
        });
    }

    /// Process, calibrate and quantify in one call
    pub fn run(
        &self,
        inputs: &[SampleInput],
        concentrations: &ConcentrationMap,
    ) -> BatchOutcome {
        let mut outcome = self.process_batch(inputs);
        if outcome.cancelled || concentrations.is_empty() {
            return outcome;
        }

        let calibration = self.calibrate(&outcome.samples, concentrations);
        outcome.failures.extend(calibration.failures);
        if self.cancel.is_cancelled() {
            self.progress.send(ProgressEvent::Cancelled);
            outcome.cancelled = true;
        }
        self.quantify(&mut outcome.samples, &calibration.curves);
        outcome.curves = calibration.curves;
        info!(
            "Quantified {} samples with {} calibrated compounds",
            outcome.samples.len(),
            outcome.curves.len()
        );
        outcome
    }
}
