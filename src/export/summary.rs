use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExportError;
use crate::calibration::CalibrationCurve;
use crate::pipeline::BatchOutcome;

/// A unit that failed, as recorded in the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// File stem or compound name
    pub unit: String,
    /// Error description
    pub error: String,
}

/// Machine-readable overview of a run: curves, failures and counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the summary was produced
    pub created: DateTime<Utc>,
    /// Crate version that produced it
    pub version: String,
    /// Number of processed samples
    pub samples: usize,
    /// Fitted curves by compound
    pub curves: BTreeMap<String, CalibrationCurve>,
    /// Failed files and compounds
    pub failures: Vec<FailureRecord>,
    /// Files skipped after cancellation
    pub skipped: Vec<String>,
}

impl RunSummary {
    /// Summary of `outcome`, timestamped now
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        Self {
            created: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            samples: outcome.samples.len(),
            curves: outcome.curves.clone(),
            failures: outcome
                .failures
                .iter()
                .map(|f| FailureRecord {
                    unit: f.unit.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            skipped: outcome.skipped.clone(),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON to `path`
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
