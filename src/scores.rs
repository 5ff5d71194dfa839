//! Score records emitted at game over, and the file they are appended to
//!
//! One record per line: `name:minutes:seconds:score`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub minutes: u64,
    pub seconds: u64,
    pub score: u32,
}

impl ScoreRecord {
    pub fn to_line(&self) -> String {
        // ':' separates fields, so it cannot appear in the name.
        let name = self.name.replace(':', "_");
        format!("{}:{}:{}:{}", name, self.minutes, self.seconds, self.score)
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.trim().split(':').collect();
        if parts.len() != 4 {
            bail!("expected 4 fields, found {}", parts.len());
        }
        Ok(Self {
            name: parts[0].to_string(),
            minutes: parts[1].parse().context("minutes")?,
            seconds: parts[2].parse().context("seconds")?,
            score: parts[3].parse().context("score")?,
        })
    }
}

// ============================================================================
// Sinks
// ============================================================================

pub trait ScoreSink {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()>;
}

/// Appends records to a leaderboard file, creating it on first use.
pub struct FileScoreSink {
    path: PathBuf,
}

impl FileScoreSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSink for FileScoreSink {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        writeln!(file, "{}", record.to_line())
            .with_context(|| format!("writing {}", self.path.display()))?;
        log::info!("score {} for {} saved", record.score, record.name);
        Ok(())
    }
}

/// Keeps submitted records in memory.
#[derive(Debug, Default)]
pub struct MemoryScoreSink {
    pub records: Vec<ScoreRecord>,
}

impl ScoreSink for MemoryScoreSink {
    fn submit(&mut self, record: &ScoreRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Reads every record in `path`, best score first. A missing file is an
/// empty leaderboard; malformed lines are skipped.
pub fn load_leaderboard(path: &Path) -> Result<Vec<ScoreRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let mut entries = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match ScoreRecord::parse_line(line) {
            Ok(record) => entries.push(record),
            Err(e) => log::warn!("{}:{}: skipping entry: {:#}", path.display(), number + 1, e),
        }
    }
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(entries)
}
