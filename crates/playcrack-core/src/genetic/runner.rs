use crate::config::{GenerationParams, StopConditions};
use crate::core_types::Genome;
use crate::error::{PfResult, PlaycrackError};
use crate::fitness::EnglishFitness;
use crate::key::{self, Key, SquareRules};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Per-run settings handed to the [`Cracker`].
#[derive(Debug, Clone)]
pub struct CrackOptions {
    pub population: usize,
    pub keyword: Option<String>,
    pub params: GenerationParams,
    pub stop: StopConditions,
    pub rules: SquareRules,
}

impl Default for CrackOptions {
    fn default() -> Self {
        Self {
            population: 500,
            keyword: None,
            params: GenerationParams::default(),
            stop: StopConditions::default(),
            rules: SquareRules::default(),
        }
    }
}

/// Observer for the generation loop. Returning false stops the search at
/// the next generation boundary.
pub trait ProgressCallback {
    fn on_progress(&mut self, generation: usize, best_score: u64, best: &Genome) -> bool;
}

/// Callback that never reports and never cancels.
pub struct Silent;

impl ProgressCallback for Silent {
    fn on_progress(&mut self, _generation: usize, _best_score: u64, _best: &Genome) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct CrackReport {
    pub key: Key,
    pub score: u64,
    pub plaintext: Vec<u8>,
    pub generations: usize,
}

/// Drives the genetic search: owns the reference fitness and the run
/// options, seeds the RNG once and threads it mutably through every
/// generation.
pub struct Cracker {
    fitness: EnglishFitness,
    options: CrackOptions,
}

impl Cracker {
    pub fn new(fitness: EnglishFitness, options: CrackOptions) -> Self {
        Self { fitness, options }
    }

    pub fn fitness(&self) -> &EnglishFitness {
        &self.fitness
    }

    /// Runs the search over raw ciphertext bytes until a stop condition
    /// hits. The ciphertext is sanitized here; it must contain at least n
    /// letters or there is nothing to score.
    pub fn run<CB: ProgressCallback>(
        &self,
        cipher_raw: &[u8],
        seed: Option<u64>,
        callback: &mut CB,
    ) -> PfResult<CrackReport> {
        let opts = &self.options;
        let cipher = key::sanitize(cipher_raw, &opts.rules);
        if cipher.len() < self.fitness.n() {
            return Err(PlaycrackError::InvalidParameters(format!(
                "ciphertext has {} letters, the {}-gram reference needs at least {}",
                cipher.len(),
                self.fitness.n(),
                self.fitness.n()
            )));
        }
        if opts.population < 2 {
            return Err(PlaycrackError::InvalidParameters(format!(
                "population size {} is too small to select parents",
                opts.population
            )));
        }
        if opts.stop.generations == 0 {
            return Err(PlaycrackError::InvalidParameters(
                "at least one generation is required".into(),
            ));
        }

        let mut rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };

        let mut population = match &opts.keyword {
            Some(word) => super::initialize_seeded(opts.population, word, &opts.rules, &mut rng),
            None => super::initialize_random(opts.population, &opts.rules, &mut rng),
        };

        let started = Instant::now();
        let mut best: Option<(Genome, u64)> = None;
        let mut generations = 0usize;

        for generation in 0..opts.stop.generations {
            let outcome = super::next_generation(
                &mut population,
                &self.fitness,
                &cipher,
                &opts.params,
                &opts.rules,
                &mut rng,
            )?;
            generations = generation + 1;

            if best.map_or(true, |(_, score)| outcome.best_score > score) {
                best = Some((outcome.best, outcome.best_score));
            }
            let (best_genome, best_score) = best.expect("just set");

            if !callback.on_progress(generation, best_score, &best_genome) {
                debug!("search cancelled by the caller at generation {generation}");
                break;
            }
            if let Some(target) = opts.stop.target_score {
                if best_score >= target {
                    info!("target score {target} reached at generation {generation}");
                    break;
                }
            }
            if let Some(secs) = opts.stop.max_seconds {
                if started.elapsed() >= Duration::from_secs(secs) {
                    info!("wall-clock budget spent at generation {generation}");
                    break;
                }
            }
        }

        let (genome, score) = best.expect("the loop ran at least once");
        let key = Key::from_square(&genome, opts.rules)?;
        let plaintext = key.decrypt(&cipher);
        Ok(CrackReport {
            key,
            score,
            plaintext,
            generations,
        })
    }
}
