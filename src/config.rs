//! Session parameters chosen before a game starts
//!
//! A [`Difficulty`] preset supplies the starting tick interval and the
//! points awarded per cleared row. [`SessionConfig`] carries those values
//! plus the player name and an optional seed, and can be loaded from JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Elapsed play time between two difficulty steps.
pub const DIFFICULTY_RAMP_SECS: u64 = 30;
/// How much each difficulty step shortens the tick interval.
pub const TICK_STEP_MS: u64 = 50;
/// The tick interval never drops below this.
pub const TICK_FLOOR_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn tick_interval_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 1000,
            Difficulty::Normal => 700,
            Difficulty::Hard => 400,
        }
    }

    pub fn row_reward(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 20,
            Difficulty::Hard => 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Starting gravity interval.
    pub tick_interval_ms: u64,
    /// Points per cleared row.
    pub row_reward: u32,
    /// Fixed randomizer seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn for_difficulty(player_name: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            player_name: player_name.into(),
            difficulty,
            tick_interval_ms: difficulty.tick_interval_ms(),
            row_reward: difficulty.row_reward(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(TICK_FLOOR_MS))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_difficulty("player", Difficulty::default())
    }
}
