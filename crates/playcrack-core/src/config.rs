use crate::error::{PfResult, PlaycrackError};
use crate::key::SquareRules;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationType {
    /// One uniformly random transposition per individual.
    Swap,
    /// With probability `mutation_rate`, reverse a random key slice.
    Inversion,
}

impl std::fmt::Display for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MutationType::Swap => write!(f, "swap"),
            MutationType::Inversion => write!(f, "inversion"),
        }
    }
}

/// Knobs applied every generation.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    #[arg(
        long,
        default_value_t = 200,
        help = "Children produced by crossover per generation"
    )]
    pub num_children: usize,

    #[arg(
        long,
        default_value_t = 20,
        help = "Fresh random keys injected per generation"
    )]
    pub new_random: usize,

    #[arg(
        long,
        default_value_t = 0.2,
        help = "Per-individual inversion probability"
    )]
    pub mutation_rate: f64,

    #[arg(long, value_enum, default_value_t = MutationType::Inversion)]
    pub mutation_type: MutationType,

    #[arg(
        long,
        default_value_t = 50,
        help = "Lowest-scoring members culled before selection"
    )]
    pub kill_worst: usize,

    #[arg(
        long,
        default_value_t = 5,
        help = "Top members carried unchanged into the next generation"
    )]
    pub keep_best: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            num_children: 200,
            new_random: 20,
            mutation_rate: 0.2,
            mutation_type: MutationType::Inversion,
            kill_worst: 50,
            keep_best: 5,
        }
    }
}

impl GenerationParams {
    /// Checks the knobs against the population they are about to shape.
    pub fn validate(&self, population_len: usize) -> PfResult<()> {
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(PlaycrackError::InvalidParameters(format!(
                "mutation rate {} is outside 0.0..=1.0",
                self.mutation_rate
            )));
        }
        if self.keep_best > population_len {
            return Err(PlaycrackError::InvalidParameters(format!(
                "keep_best {} exceeds population size {population_len}",
                self.keep_best
            )));
        }
        if population_len.saturating_sub(self.kill_worst) < 2 {
            return Err(PlaycrackError::InvalidParameters(format!(
                "kill_worst {} leaves fewer than two of {population_len} members for selection",
                self.kill_worst
            )));
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// When the driver stops iterating generations.
#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StopConditions {
    #[arg(long, default_value_t = 2000, help = "Maximum generations to run")]
    pub generations: usize,

    #[arg(long, help = "Stop once the best score reaches this value")]
    pub target_score: Option<u64>,

    #[arg(long, help = "Wall-clock budget in seconds")]
    pub max_seconds: Option<u64>,
}

impl Default for StopConditions {
    fn default() -> Self {
        Self {
            generations: 2000,
            target_score: None,
            max_seconds: None,
        }
    }
}

/// The four special letters as command line arguments.
#[derive(Args, Debug, Clone, Copy)]
pub struct RuleArgs {
    #[arg(long, default_value_t = 'J', help = "Letter merged away from the square")]
    pub omit: char,

    #[arg(long, default_value_t = 'I', help = "Letter substituted for the omitted one")]
    pub replace: char,

    #[arg(long, default_value_t = 'X', help = "Pad inserted between doubled letters")]
    pub double_pad: char,

    #[arg(long, default_value_t = 'X', help = "Pad appended to odd-length text")]
    pub extra_pad: char,
}

impl RuleArgs {
    pub fn to_rules(self) -> SquareRules {
        SquareRules::new(self.omit, self.replace, self.double_pad, self.extra_pad)
    }
}
