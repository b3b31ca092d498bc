//! # Trace Module
//!
//! A [`Trace`] is the one-dimensional signal every stage of the pipeline
//! exchanges: an LC absorbance chromatogram, a baseline estimate, or an
//! extracted-ion intensity series.
//!
//! Traces are validated on construction (parallel arrays, finite values,
//! strictly increasing time) and never mutated afterwards; transformations
//! produce a new trace via [`Trace::with_values`].

use serde::{Deserialize, Serialize};

/// Errors raised when a trace fails validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    /// Time and value arrays differ in length
    #[error("Array length mismatch: time array has {time_len} elements, value array has {value_len} elements")]
    ArrayLengthMismatch {
        /// Number of time points
        time_len: usize,
        /// Number of values
        value_len: usize,
    },

    /// The trace contains no samples where at least one is required
    #[error("Trace is empty")]
    Empty,

    /// Time does not strictly increase at the given index
    #[error("Time is not strictly increasing at index {index}: {previous} -> {current}")]
    NonIncreasingTime {
        /// Index of the offending sample
        index: usize,
        /// Time of the preceding sample
        previous: f64,
        /// Time of the offending sample
        current: f64,
    },

    /// A time or value is NaN or infinite
    #[error("Non-finite sample at index {index}")]
    NonFinite {
        /// Index of the offending sample
        index: usize,
    },
}

/// An immutable, time-ordered sequence of `(time, value)` samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrace", into = "RawTrace")]
pub struct Trace {
    times: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct RawTrace {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<RawTrace> for Trace {
    type Error = TraceError;

    fn try_from(raw: RawTrace) -> Result<Self, Self::Error> {
        Trace::new(raw.times, raw.values)
    }
}

impl From<Trace> for RawTrace {
    fn from(trace: Trace) -> Self {
        Self {
            times: trace.times,
            values: trace.values,
        }
    }
}

impl Trace {
    /// Create a trace from parallel time and value arrays.
    ///
    /// An empty trace is valid; use [`Trace::require_non_empty`] where a
    /// consumer needs samples.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, TraceError> {
        if times.len() != values.len() {
            return Err(TraceError::ArrayLengthMismatch {
                time_len: times.len(),
                value_len: values.len(),
            });
        }

        for (index, (&t, &v)) in times.iter().zip(values.iter()).enumerate() {
            if !t.is_finite() || !v.is_finite() {
                return Err(TraceError::NonFinite { index });
            }
            if index > 0 && t <= times[index - 1] {
                return Err(TraceError::NonIncreasingTime {
                    index,
                    previous: times[index - 1],
                    current: t,
                });
            }
        }

        Ok(Self { times, values })
    }

    /// Create a trace from `(time, value)` pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (times, values) = pairs.into_iter().unzip();
        Self::new(times, values)
    }

    /// An empty trace
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a new trace on the same time axis with different values
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self, TraceError> {
        Self::new(self.times.clone(), values)
    }

    /// Return an error if the trace has no samples
    pub fn require_non_empty(&self) -> Result<(), TraceError> {
        if self.is_empty() {
            Err(TraceError::Empty)
        } else {
            Ok(())
        }
    }

    /// Time points
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the trace has no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(time, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Sum of all values
    pub fn value_sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Index of the first maximum value, `None` when empty
    pub fn argmax(&self) -> Option<usize> {
        crate::stats::argmax(&self.values)
    }

    /// Time of the first maximum value, `None` when empty
    pub fn time_of_max(&self) -> Option<f64> {
        self.argmax().map(|i| self.times[i])
    }

    /// Value at the sample whose time is nearest to `time`
    pub fn value_nearest(&self, time: f64) -> Option<f64> {
        crate::stats::argmin_abs_diff(&self.times, time).map(|i| self.values[i])
    }

    /// First and last time, `None` when empty
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.times.first(), self.times.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }
}
