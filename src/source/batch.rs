use std::collections::BTreeMap;

use log::{error, warn};

use super::{ChromatogramSource, ScanSource};
use crate::pipeline::{PipelineError, SampleInput, UnitFailure};

/// Measurements read from their sources, plus the files that could not be
/// read
#[derive(Debug, Default)]
pub struct LoadedBatch {
    /// Readable measurements, in scan-source order
    pub inputs: Vec<SampleInput>,
    /// One entry per unreadable scan or chromatogram file
    pub failures: Vec<UnitFailure>,
}

/// Read every scan source and attach the chromatogram with the same name.
///
/// An unreadable scan file drops that measurement; an unreadable
/// chromatogram keeps the measurement without LC data. Both are logged and
/// recorded as failures, and loading continues with the next file.
pub fn load_batch<S, C>(scans: Vec<S>, chromatograms: Vec<C>) -> LoadedBatch
where
    S: ScanSource,
    C: ChromatogramSource,
{
    let mut by_name: BTreeMap<String, C> = chromatograms
        .into_iter()
        .map(|source| (source.name(), source))
        .collect();

    let mut batch = LoadedBatch::default();
    for source in scans {
        let name = source.name();
        let scans = match source.read_scans() {
            Ok(scans) => scans,
            Err(e) => {
                error!("Failed to read scans for {}: {}", name, e);
                by_name.remove(&name);
                batch.failures.push(UnitFailure::new(
                    name,
                    PipelineError::Input(format!("scans: {}", e)),
                ));
                continue;
            }
        };

        let mut input = SampleInput::new(name.clone(), scans);
        if let Some(lc) = by_name.remove(&name) {
            match lc.read_chromatogram() {
                Ok(trace) => input = input.with_chromatogram(trace),
                Err(e) => {
                    error!("Failed to read LC trace for {}: {}", name, e);
                    batch.failures.push(UnitFailure::new(
                        name,
                        PipelineError::Input(format!("LC trace: {}", e)),
                    ));
                }
            }
        }
        batch.inputs.push(input);
    }

    for name in by_name.keys() {
        warn!("LC trace {} has no matching scan file and is ignored", name);
    }
    batch
}
