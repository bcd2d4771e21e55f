//! Append-only archive of evaluated configurations
//!
//! Every evaluated configuration is retained, including failed ones, so
//! a run can be audited and replayed from the archive alone given the
//! same seed. The best pointer is maintained on append using the
//! measure's better-direction rule; ties keep the earliest record.


use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::eval::FoldScores;
use crate::measure::Measure;
use crate::space::Config;

/// Outcome of one evaluated configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// At least one fold produced a score
    Completed,
    /// Every fold failed; retained for audit, excluded from best-tracking
    Failed,
}

/// One evaluated configuration with its scores and provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Position in the archive (append order)
    pub id: usize,
    /// The evaluated configuration
    pub config: Config,
    /// Score per resampling fold; `None` where the fold failed
    pub fold_scores: Vec<Option<f64>>,
    /// Mean over non-missing folds; `None` when every fold failed
    pub aggregate: Option<f64>,
    /// Unix timestamp in milliseconds at record creation
    pub timestamp_ms: u64,
    /// Batch the configuration was proposed in
    pub batch: usize,
    /// Completed or failed
    pub status: RecordStatus,
}

impl EvalRecord {
    /// Build a record from an evaluator outcome
    pub fn from_scores(id: usize, config: Config, scores: &FoldScores, batch: usize) -> Self {
        let status = if scores.aggregate.is_some() {
            RecordStatus::Completed
        } else {
            RecordStatus::Failed
        };
        Self {
            id,
            config,
            fold_scores: scores.per_fold.clone(),
            aggregate: scores.aggregate,
            timestamp_ms: unix_millis(),
            batch,
            status,
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Append-only evaluation log with direction-aware best-tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archive {
    measure: Measure,
    records: Vec<EvalRecord>,
    best: Option<usize>,
}

impl Archive {
    /// Create an empty archive for the given measure
    pub fn new(measure: Measure) -> Self {
        Self { measure, records: Vec::new(), best: None }
    }

    /// The measure whose direction rule governs best-tracking
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the archive has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id the next appended record will receive
    pub fn next_id(&self) -> usize {
        self.records.len()
    }

    /// All records in append order
    pub fn records(&self) -> &[EvalRecord] {
        &self.records
    }

    /// Append a record, updating the best pointer
    ///
    /// Failed records never become best; an equal score keeps the
    /// earlier record.
    pub fn push(&mut self, record: EvalRecord) {
        if let Some(score) = record.aggregate {
            let improved = match self.best {
                None => true,
                Some(i) => match self.records[i].aggregate {
                    Some(incumbent) => self.measure.better(score, incumbent),
                    None => true,
                },
            };
            if improved {
                self.best = Some(self.records.len());
            }
        }
        self.records.push(record);
    }

    /// Best record over the whole archive
    pub fn best(&self) -> Option<&EvalRecord> {
        self.best.and_then(|i| self.records.get(i))
    }

    /// Best record considering only the first `n` evaluations
    pub fn best_at(&self, n: usize) -> Option<&EvalRecord> {
        let slice = &self.records[..n.min(self.records.len())];
        let mut best: Option<&EvalRecord> = None;
        for record in slice {
            let score = match record.aggregate {
                Some(s) => s,
                None => continue,
            };
            best = match best {
                None => Some(record),
                Some(b) => match b.aggregate {
                    Some(bs) if !self.measure.better(score, bs) => Some(b),
                    _ => Some(record),
                },
            };
        }
        best
    }

    /// Records whose configuration satisfies a predicate
    pub fn filter<F>(&self, predicate: F) -> Vec<&EvalRecord>
    where
        F: Fn(&Config) -> bool,
    {
        self.records.iter().filter(|r| predicate(&r.config)).collect()
    }

    /// Aggregated scores of successful records, in evaluation order
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.aggregate).collect()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let archive: Archive = serde_json::from_str(json)?;
        if let Some(i) = archive.best {
            if i >= archive.records.len() {
                return Err(Error::Archive(format!(
                    "best index {i} out of range for {} records",
                    archive.records.len()
                )));
            }
        }
        Ok(archive)
    }

    /// Write the archive as JSON to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read an archive from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl fmt::Display for Archive {
    /// Leaderboard-style table in evaluation order, best marked with `*`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:>12}  {:>9}  config", "id", self.measure.name(), "status")?;
        for record in &self.records {
            let marker = if self.best == Some(record.id) { "*" } else { " " };
            let score = match record.aggregate {
                Some(s) => format!("{s:.6}"),
                None => "-".to_string(),
            };
            let mut params: Vec<String> =
                record.config.iter().map(|(k, v)| format!("{k}={v}")).collect();
            params.sort();
            writeln!(
                f,
                "{marker}{:>3}  {score:>12}  {:>9}  {}",
                record.id,
                match record.status {
                    RecordStatus::Completed => "completed",
                    RecordStatus::Failed => "failed",
                },
                params.join(", ")
            )?;
        }
        Ok(())
    }
}
