use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::debug;

use super::{ChromatogramSource, SourceError};
use crate::measurement::file_stem;
use crate::trace::Trace;

/// Field separator of a delimited text line: comma, then tab, then space
pub fn detect_delimiter(line: &str) -> Option<u8> {
    [b',', b'\t', b' ']
        .into_iter()
        .find(|&d| line.as_bytes().contains(&d))
}

/// Parse a time/absorbance table.
///
/// The first and last column of each row are read as time and value; rows
/// with fewer than two columns or non-numeric fields (headers, metadata
/// blocks) are skipped.
pub fn read_chromatogram(content: &str, name: &str) -> Result<Trace, SourceError> {
    let first_line = content.lines().next().unwrap_or_default();
    let delimiter =
        detect_delimiter(first_line).ok_or_else(|| SourceError::NoDelimiter(name.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut times = Vec::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: Vec<&str> = record
            .iter()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < 2 {
            continue;
        }
        let parsed = (
            fields[0].parse::<f64>(),
            fields[fields.len() - 1].parse::<f64>(),
        );
        if let (Ok(time), Ok(value)) = parsed {
            times.push(time);
            values.push(value);
        }
    }

    if times.is_empty() {
        return Err(SourceError::NoSamples(name.to_string()));
    }
    debug!("Read {} chromatogram samples from {}", times.len(), name);
    Ok(Trace::new(times, values)?)
}

/// Write a trace as a two-column CSV with a header
pub fn write_chromatogram<P: AsRef<Path>>(trace: &Trace, path: P) -> Result<(), SourceError> {
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));
    writer.write_record(["Time (min)", "Value (mAU)"])?;
    for (time, value) in trace.iter() {
        writer.write_record([time.to_string(), value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// LC chromatogram stored as delimited text
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedChromatogram {
    path: PathBuf,
}

impl DelimitedChromatogram {
    /// Source reading `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChromatogramSource for DelimitedChromatogram {
    fn name(&self) -> String {
        file_stem(&self.path)
    }

    fn read_chromatogram(&self) -> Result<Trace, SourceError> {
        let content = std::fs::read_to_string(&self.path)?;
        read_chromatogram(&content, &self.path.display().to_string())
    }
}
