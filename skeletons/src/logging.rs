// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-frame stimulus log and the CSV writer behind it.

use std::fmt::Display;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::SkeletonError;
use crate::visual::stimuli::StimulusType;

/// Column names of the stimulus log, in order.
pub const LOG_COLUMNS: [&str; 5] = ["time", "frame", "stimulus_shown", "stimulus_id", "stimulus_type"];

/// One row of the stimulus log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Seconds since the session started.
    pub time: f64,
    pub frame: u64,
    /// Whether the stimulus was drawn on this frame.
    pub stimulus_shown: bool,
    pub stimulus_id: u32,
    pub stimulus_type: StimulusType,
}

pub trait IntoStringVector {
    fn into_string_vec(self) -> Vec<String>;
}

impl<A: Display, B: Display> IntoStringVector for (A, B) {
    fn into_string_vec(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoStringVector for &LogRecord {
    fn into_string_vec(self) -> Vec<String> {
        vec![
            self.time.to_string(),
            self.frame.to_string(),
            self.stimulus_shown.to_string(),
            self.stimulus_id.to_string(),
            self.stimulus_type.to_string(),
        ]
    }
}

fn check_unique_column_names(column_names: &[String]) -> bool {
    let mut unique_column_names = column_names.to_vec();
    unique_column_names.sort();
    unique_column_names.dedup();

    unique_column_names.len() == column_names.len()
}

/// Field delimiter for a log path: tab for `.tsv`, comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Writes rows to a delimited text file, one row per call.
pub struct CSVEventLogger {
    filepath: std::path::PathBuf,
    columns: Vec<String>,
    writer: csv::Writer<std::fs::File>,
}

impl std::fmt::Debug for CSVEventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CSVEventLogger")
            .field("filepath", &self.filepath)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl CSVEventLogger {
    /// Create a new CSVEventLogger and write the header row.
    pub fn new<I, S, P>(path: P, columns: I, delimiter: u8, overwrite: bool) -> Result<Self, SkeletonError>
    where
        P: Into<std::path::PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filepath = path.into();

        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if !check_unique_column_names(&columns) {
            return Err(SkeletonError::ColumnNamesNotUniqueError);
        }

        // refuse to clobber existing data unless asked to
        if filepath.exists() && std::fs::metadata(&filepath)?.len() > 0 {
            if overwrite {
                log::warn!("overwriting existing log file {}", filepath.display());
                std::fs::remove_file(&filepath)?;
            } else {
                return Err(SkeletonError::FileExistsAndNotEmptyError(
                    filepath.to_string_lossy().to_string(),
                ));
            }
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .from_path(&filepath)?;

        writer.write_record(&columns)?;
        writer.flush()?;

        Ok(Self {
            filepath,
            columns,
            writer,
        })
    }

    /// Log one row.
    pub fn log<I>(&mut self, column_values: I) -> Result<(), SkeletonError>
    where
        I: IntoStringVector,
    {
        let row: Vec<String> = column_values.into_string_vec();

        if row.len() != self.columns.len() {
            return Err(SkeletonError::DataLengthMismatchError(row.len(), self.columns.len()));
        }

        self.writer.write_record(&row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SkeletonError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// The in-memory stimulus log of a session, optionally mirrored to a file.
#[derive(Debug, Default)]
pub struct StimulusLog {
    records: Vec<LogRecord>,
    sink: Option<CSVEventLogger>,
}

impl StimulusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write every record to `path`, as TSV if the extension is `.tsv`
    /// and CSV otherwise.
    pub fn with_file<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<Self, SkeletonError> {
        let path = path.as_ref();
        let sink = CSVEventLogger::new(path, LOG_COLUMNS, delimiter_for(path), overwrite)?;
        log::info!("writing stimulus log to {}", path.display());
        Ok(Self {
            records: Vec::new(),
            sink: Some(sink),
        })
    }

    pub fn push(&mut self, record: LogRecord) -> Result<(), SkeletonError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.log(&record)?;
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn flush(&mut self) -> Result<(), SkeletonError> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    /// Frame interval statistics over the logged times.
    pub fn frame_stats(&self) -> Option<FrameStats> {
        FrameStats::from_times(self.records.iter().map(|r| r.time))
    }
}

/// Read a stimulus log written by [`StimulusLog::with_file`].
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<Vec<LogRecord>, SkeletonError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .from_path(path)?;

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// Summary of the intervals between consecutive frames, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frames: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl FrameStats {
    /// Returns `None` when fewer than two timestamps are given.
    pub fn from_times<I: IntoIterator<Item = f64>>(times: I) -> Option<Self> {
        let times: Vec<f64> = times.into_iter().collect();
        if times.len() < 2 {
            return None;
        }

        let intervals: Vec<f64> = times.windows(2).map(|w| w[1] - w[0]).collect();
        let min = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;

        Some(Self {
            frames: times.len(),
            min,
            max,
            mean,
        })
    }
}

impl Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, interval min {:.4} s, max {:.4} s, mean {:.4} s",
            self.frames, self.min, self.max, self.mean
        )
    }
}
