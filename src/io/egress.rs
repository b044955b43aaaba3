//! Score egress - writes joined score rows to file
//!
//! Rows are written in JSONL format (one JSON object per line) to the file
//! specified in config. Every line carries the run id and franchise name so
//! that successive runs can share one file.

use crate::services::joiner::ScoreRow;
use crate::services::pipeline::{FranchiseReport, Snapshot};
use anyhow::Context;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, error, info};

#[derive(Serialize)]
struct EgressLine<'a> {
    run_id: &'a str,
    franchise_name: &'a str,
    #[serde(flatten)]
    row: &'a ScoreRow,
}

/// Egress writer for score rows
pub struct Egress {
    file_path: String,
}

impl Egress {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "egress_initialized");
        Self { file_path: file_path.to_string() }
    }

    /// Write all rows of one franchise report, returning the row count
    pub fn write_report(&self, run_id: &str, report: &FranchiseReport) -> anyhow::Result<usize> {
        match self.append_rows(run_id, report) {
            Ok(()) => {
                info!(
                    franchise = %report.franchise,
                    rows = report.rows.len(),
                    "report_egressed"
                );
                Ok(report.rows.len())
            }
            Err(e) => {
                error!(franchise = %report.franchise, error = %e, "report_egress_failed");
                Err(e).with_context(|| {
                    format!("Failed to write {} rows to {}", report.franchise, self.file_path)
                })
            }
        }
    }

    /// Write every report of a snapshot; stops at the first failure
    pub fn write_snapshot(&self, snapshot: &Snapshot) -> anyhow::Result<usize> {
        let mut written = 0;
        for report in &snapshot.reports {
            written += self.write_report(&snapshot.run_id, report)?;
        }
        Ok(written)
    }

    fn append_rows(&self, run_id: &str, report: &FranchiseReport) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        let mut bytes = 0;
        for row in &report.rows {
            let line = EgressLine { run_id, franchise_name: &report.name, row };
            let json = serde_json::to_string(&line)?;
            bytes += json.len() + 1;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;
        debug!(file = %self.file_path, bytes = bytes, "egress_written");

        Ok(())
    }
}
