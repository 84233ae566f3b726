//! In-memory loss tracking and file-based training telemetry.

use std::collections::VecDeque;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Losses produced by one learning iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossRecord {
    pub step: usize,
    pub actor_loss: f32,
    pub critic_loss: f32,
}

/// Bounded history of loss records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsTracker {
    records: VecDeque<LossRecord>,
    history_size: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            records: VecDeque::with_capacity(history_size),
            history_size,
        }
    }

    /// Record one learning iteration's losses.
    pub fn record(&mut self, record: LossRecord) {
        if self.records.len() >= self.history_size {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<LossRecord> {
        self.records.back().copied()
    }

    pub fn records(&self) -> impl Iterator<Item = &LossRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Average actor loss over the most recent `window` records.
    pub fn avg_actor_loss(&self, window: usize) -> Option<f32> {
        self.average(window, |r| r.actor_loss)
    }

    /// Average critic loss over the most recent `window` records.
    pub fn avg_critic_loss(&self, window: usize) -> Option<f32> {
        self.average(window, |r| r.critic_loss)
    }

    fn average(&self, window: usize, value: impl Fn(&LossRecord) -> f32) -> Option<f32> {
        if self.records.is_empty() {
            return None;
        }
        let n = window.min(self.records.len());
        let sum: f32 = self.records.iter().rev().take(n).map(value).sum();
        Some(sum / n as f32)
    }

    /// Clear all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Save the history to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a history from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Appends loss records to a CSV file as training runs.
///
/// The file carries one `step,actor_loss,critic_loss,wall_time` row per
/// logged iteration and lives at `<log_dir>/<run_name>/training.csv`.
pub struct TrainingLog {
    path: PathBuf,
    start_time: u64,
    writer: BufWriter<File>,
}

impl TrainingLog {
    pub fn new(log_dir: &Path, run_name: &str) -> std::io::Result<Self> {
        let log_path = log_dir.join(run_name);
        create_dir_all(&log_path)?;

        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let file = File::create(log_path.join("training.csv"))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "step,actor_loss,critic_loss,wall_time")?;
        writer.flush()?;

        Ok(TrainingLog {
            path: log_path,
            start_time,
            writer,
        })
    }

    /// Append one record and flush it to disk.
    pub fn log(&mut self, record: &LossRecord) -> std::io::Result<()> {
        let wall_time = self.wall_time();
        writeln!(
            self.writer,
            "{},{},{},{}",
            record.step, record.actor_loss, record.critic_loss, wall_time
        )?;
        self.writer.flush()
    }

    /// Directory this run logs into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn wall_time(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
            .saturating_sub(self.start_time)
    }
}
