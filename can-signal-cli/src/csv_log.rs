//! Per-run CSV logging
//!
//! One file per run, named after the start timestamp. Every received frame
//! appends one row with the wall-clock time, the frame ID, and the full
//! state snapshot, flushed immediately so an interrupted run keeps
//! everything up to the last frame.

use crate::state::SignalState;
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct CsvLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvLogger {
    /// Create `<log_dir>/decoded_<timestamp>.csv` and write the header row
    pub fn create(log_dir: &Path, state: &SignalState) -> Result<CsvLogger> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("decoded_{}.csv", stamp));
        let file =
            File::create(&path).with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        let mut writer = BufWriter::new(file);

        let mut header = vec!["t".to_string(), "can_id".to_string()];
        header.extend(state.names().map(str::to_string));
        writeln!(writer, "{}", header.join(","))?;
        writer.flush()?;

        log::info!("Logging decoded signals to {:?}", path);
        Ok(CsvLogger { writer, path })
    }

    /// The file this run is writing to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row for a received frame
    pub fn write_row(&mut self, can_id: u32, state: &SignalState) -> Result<()> {
        let now = Utc::now();
        let t = now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;

        let mut row = Vec::with_capacity(2 + state.names().count());
        row.push(format!("{:.6}", t));
        row.push(format!("0x{:x}", can_id));
        row.extend(state.values().map(|value| match value {
            Some(v) => v.to_string(),
            None => String::new(),
        }));

        writeln!(self.writer, "{}", row.join(","))?;
        self.writer.flush()?;
        Ok(())
    }
}
