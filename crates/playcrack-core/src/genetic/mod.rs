pub mod crossover;
pub mod mutation;
pub mod runner;

pub use self::runner::{CrackOptions, CrackReport, Cracker, ProgressCallback, Silent};

use crate::config::GenerationParams;
use crate::core_types::{Genome, Population};
use crate::error::{PfResult, PlaycrackError};
use crate::fitness::EnglishFitness;
use crate::key::{self, Key, SquareRules};
use fastrand::Rng;
use itertools::Itertools;
use rayon::prelude::*;
use tracing::debug;

/// Best member of the generation just scored, before any operator ran.
#[derive(Debug, Clone, Copy)]
pub struct GenerationOutcome {
    pub best: Genome,
    pub best_score: u64,
}

/// True when `genome` holds 25 distinct uppercase letters.
pub fn valid_genome(genome: &Genome) -> bool {
    let mut seen = [false; 26];
    for &c in genome {
        if !c.is_ascii_uppercase() {
            return false;
        }
        let i = (c - b'A') as usize;
        if seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// A uniform random permutation of the reduced alphabet (Fisher-Yates).
pub fn random_genome(rules: &SquareRules, rng: &mut Rng) -> Genome {
    let mut genome = key::reduced_alphabet(rules.omit);
    rng.shuffle(&mut genome);
    genome
}

/// `pop_size` independent uniform random keys.
pub fn initialize_random(pop_size: usize, rules: &SquareRules, rng: &mut Rng) -> Population {
    (0..pop_size).map(|_| random_genome(rules, rng)).collect()
}

/// `pop_size` keys sharing a fixed prefix built from the sanitized,
/// deduplicated seed word; the remaining letters are shuffled independently
/// per individual.
pub fn initialize_seeded(
    pop_size: usize,
    seed: &str,
    rules: &SquareRules,
    rng: &mut Rng,
) -> Population {
    let mut prefix: Vec<u8> = Vec::new();
    let mut used = [false; 26];
    for c in key::sanitize(seed.as_bytes(), rules) {
        let i = (c - b'A') as usize;
        if !used[i] {
            used[i] = true;
            prefix.push(c);
        }
    }
    let rest: Vec<u8> = key::reduced_alphabet(rules.omit)
        .iter()
        .copied()
        .filter(|&c| !used[(c - b'A') as usize])
        .collect();

    (0..pop_size)
        .map(|_| {
            let mut suffix = rest.clone();
            rng.shuffle(&mut suffix);
            let mut genome = [0u8; crate::consts::KEY_LEN];
            genome[..prefix.len()].copy_from_slice(&prefix);
            genome[prefix.len()..].copy_from_slice(&suffix);
            genome
        })
        .collect()
}

/// Scores every member: decrypt the ciphertext with the member's key,
/// collect its n-gram table and compare it to the reference. Members are
/// independent, so the evaluation fans out over rayon; results come back in
/// population order, which keeps seeded runs reproducible.
pub fn score_population(
    fitness: &EnglishFitness,
    population: &[Genome],
    cipher: &[u8],
    rules: &SquareRules,
) -> PfResult<Vec<u64>> {
    population
        .par_iter()
        .map(|genome| {
            let key = Key::from_square(genome, *rules)?;
            fitness.score_text(&key.decrypt(cipher))
        })
        .collect()
}

/// Argmax over the scores; ties go to the earliest index.
pub fn best_member(population: &[Genome], scores: &[u64]) -> Option<(Genome, u64)> {
    let mut best = 0usize;
    if scores.is_empty() {
        return None;
    }
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    Some((population[best], scores[best]))
}

/// Advances the population by one generation:
/// score, snapshot elites, cull the worst, pick two parents by
/// fitness-proportional selection, breed children by uniform crossover,
/// inject fresh random keys, mutate everything built so far and finally
/// reinsert the elites untouched.
pub fn next_generation(
    population: &mut Population,
    fitness: &EnglishFitness,
    cipher: &[u8],
    params: &GenerationParams,
    rules: &SquareRules,
    rng: &mut Rng,
) -> PfResult<GenerationOutcome> {
    params.validate(population.len())?;

    let mut scores = score_population(fitness, population, cipher, rules)?;
    let (best, best_score) = best_member(population, &scores)
        .ok_or_else(|| PlaycrackError::InvalidParameters("population is empty".into()))?;

    let elites = elite_snapshot(population, &scores, params.keep_best);

    cull_worst(population, &mut scores, params.kill_worst);

    let (first, second) = select_parents(&scores, rng)?;
    let parent1 = population[first];
    let parent2 = population[second];
    population.clear();
    population.push(parent1);
    population.push(parent2);

    for _ in 0..params.num_children {
        population.push(crossover::uniform_crossover(&parent1, &parent2, rng)?);
    }

    for _ in 0..params.new_random {
        population.push(random_genome(rules, rng));
    }

    mutation::mutate_population(population, params, rng)?;

    // Elites go in after mutation so they survive the generation unaltered.
    population.extend(elites);

    Ok(GenerationOutcome { best, best_score })
}

fn elite_snapshot(population: &[Genome], scores: &[u64], keep: usize) -> Vec<Genome> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(keep);
    order.into_iter().map(|i| population[i]).collect()
}

fn cull_worst(population: &mut Population, scores: &mut Vec<u64>, kill: usize) {
    for _ in 0..kill {
        // position_min resolves ties to the earliest index.
        if let Some(worst) = scores.iter().position_min() {
            population.remove(worst);
            scores.remove(worst);
        }
    }
}

/// Fitness-proportional selection over scores shifted so the worst survivor
/// weighs zero. The second draw excludes the first winner. When every
/// shifted weight is zero the draw degenerates and selection falls back to
/// uniform.
fn select_parents(scores: &[u64], rng: &mut Rng) -> PfResult<(usize, usize)> {
    let len = scores.len();
    if len < 2 {
        return Err(PlaycrackError::InvalidParameters(
            "selection needs at least two members".into(),
        ));
    }
    let min = scores.iter().copied().min().unwrap_or(0);
    let shifted: Vec<u128> = scores.iter().map(|&s| (s - min) as u128).collect();
    let sum: u128 = shifted.iter().sum();

    let first = if sum == 0 {
        debug!("all scores equal; falling back to uniform parent selection");
        rng.usize(0..len)
    } else {
        weighted_pick(&shifted, sum, None, rng)
    };

    let sum2 = sum - shifted[first];
    let second = if sum2 == 0 {
        let draw = rng.usize(0..len - 1);
        if draw >= first {
            draw + 1
        } else {
            draw
        }
    } else {
        weighted_pick(&shifted, sum2, Some(first), rng)
    };
    debug_assert_ne!(first, second);
    Ok((first, second))
}

fn weighted_pick(weights: &[u128], sum: u128, exclude: Option<usize>, rng: &mut Rng) -> usize {
    let draw = rng.u128(0..sum);
    let mut acc = 0u128;
    let mut last = 0usize;
    for (i, &w) in weights.iter().enumerate() {
        if exclude == Some(i) {
            continue;
        }
        acc += w;
        last = i;
        if acc > draw {
            return i;
        }
    }
    last
}
