//! Tab-separated evolutionary trajectory, one row per generation.

use crate::error::{IoError, Result};
use plastica_core::TrajectoryRow;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

pub const TRAJECTORY_HEADER: &str = "epoch\tgeneration\tmeanFitness\tmeanCuePlasticity\tmeanObservedPlasticity\tmeanPolyphenism\tdiversity\tmeanUtility";

/// Formats one row in header order.
#[must_use]
pub fn format_row(row: &TrajectoryRow) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        row.epoch,
        row.generation,
        row.mean_fitness,
        row.mean_cue_plasticity,
        row.mean_observed_plasticity,
        row.mean_polyphenism,
        row.diversity,
        row.mean_utility
    )
}

pub struct TrajectoryWriter<W: Write> {
    out: W,
}

impl TrajectoryWriter<BufWriter<File>> {
    /// Creates (or truncates) `path` and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating trajectory {:?}", path))
        })?;
        Self::new(BufWriter::new(file))
    }

    /// Opens `path` for appending, so a resumed run continues the table of
    /// the run it resumes. The header is written only to a new or empty file.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open = || -> std::io::Result<(File, bool)> {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let empty = file.metadata()?.len() == 0;
            Ok((file, empty))
        };
        let (file, empty) = open().map_err(|e| {
            IoError::FileSystem(e).with_context(format!("opening trajectory {:?}", path))
        })?;
        let out = BufWriter::new(file);
        if empty {
            Self::new(out)
        } else {
            Ok(Self { out })
        }
    }
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", TRAJECTORY_HEADER)?;
        Ok(Self { out })
    }

    pub fn write_row(&mut self, row: &TrajectoryRow) -> Result<()> {
        writeln!(self.out, "{}", format_row(row))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
