use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use super::{ScanSource, SourceError};
use crate::measurement::file_stem;
use crate::xic::Scan;

/// MS scans stored as a JSON array of [`Scan`] objects
#[derive(Debug, Clone, PartialEq)]
pub struct JsonScanFile {
    path: PathBuf,
}

impl JsonScanFile {
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

impl ScanSource for JsonScanFile {
    fn name(&self) -> String {
        file_stem(&self.path)
    }

    fn read_scans(&self) -> Result<Vec<Scan>, SourceError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let scans: Vec<Scan> = serde_json::from_reader(reader)?;
        debug!("Read {} scans from {}", scans.len(), self.path.display());
        Ok(scans)
    }
}

/// Write scans as a JSON array readable by [`JsonScanFile`]
pub fn write_scans<P: AsRef<Path>>(scans: &[Scan], path: P) -> Result<(), SourceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, scans)?;
    writer.flush()?;
    Ok(())
}
